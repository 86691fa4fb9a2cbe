//! Subscription repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{
    sea_orm_active_enums::{SubscriptionDuration, SubscriptionStatus},
    subscriptions,
};

/// Partial update for a subscription record.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    /// New email (already lowercased by the caller).
    pub email: Option<String>,
    /// New duration.
    pub duration: Option<SubscriptionDuration>,
    /// New start instant.
    pub day: Option<DateTime<Utc>>,
    /// New status.
    pub status: Option<SubscriptionStatus>,
}

/// Subscription repository for CRUD operations.
#[derive(Debug)]
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct SubscriptionRepository {
    db: DatabaseConnection,
}

impl SubscriptionRepository {
    /// Creates a new subscription repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a subscription record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        email: &str,
        duration: SubscriptionDuration,
        day: DateTime<Utc>,
        status: SubscriptionStatus,
    ) -> Result<subscriptions::Model, DbErr> {
        let now = Utc::now().into();
        let subscription = subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            duration: Set(duration),
            day: Set(day.into()),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        subscription.insert(&self.db).await
    }

    /// Finds a subscription by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<subscriptions::Model>, DbErr> {
        subscriptions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an active subscription for an email, optionally excluding one
    /// record (used when updating that record's own email).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_by_email(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<subscriptions::Model>, DbErr> {
        let mut query = subscriptions::Entity::find()
            .filter(subscriptions::Column::Email.eq(email))
            .filter(subscriptions::Column::Status.eq(SubscriptionStatus::Active));

        if let Some(id) = exclude {
            query = query.filter(subscriptions::Column::Id.ne(id));
        }

        query.one(&self.db).await
    }

    /// Lists subscriptions newest-first with optional status filter and
    /// email search.
    ///
    /// Returns the page of rows and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        status: Option<SubscriptionStatus>,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<subscriptions::Model>, u64), DbErr> {
        let mut query = subscriptions::Entity::find();

        if let Some(status) = status {
            query = query.filter(subscriptions::Column::Status.eq(status));
        }
        if let Some(term) = search {
            query = query.filter(subscriptions::Column::Email.contains(term));
        }

        let paginator = query
            .order_by_desc(subscriptions::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((rows, total))
    }

    /// Applies a partial update.
    ///
    /// Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        update: SubscriptionUpdate,
    ) -> Result<Option<subscriptions::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: subscriptions::ActiveModel = existing.into();
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(duration) = update.duration {
            active.duration = Set(duration);
        }
        if let Some(day) = update.day {
            active.day = Set(day.into());
        }
        if let Some(status) = update.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a subscription by ID. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = subscriptions::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
