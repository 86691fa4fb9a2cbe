//! Admin repository for database operations.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::admins;

/// Aggregate admin counts for the back-office overview.
#[derive(Debug, Clone, Copy)]
pub struct AdminStats {
    /// All admin rows.
    pub total: u64,
    /// Active admins.
    pub active: u64,
    /// Deactivated admins.
    pub inactive: u64,
    /// Admins created within the last 30 days.
    pub recent: u64,
}

/// Fields accepted when creating an admin.
#[derive(Debug, Clone)]
pub struct NewAdmin<'a> {
    /// First name.
    pub first_name: Option<&'a str>,
    /// Last name.
    pub last_name: Option<&'a str>,
    /// Email (already lowercased by the caller).
    pub email: &'a str,
    /// Phone number.
    pub phone: Option<&'a str>,
    /// Argon2id hash of the password.
    pub password_hash: &'a str,
    /// Admin flag.
    pub is_admin: bool,
    /// The admin performing the creation, if any.
    pub created_by: Option<Uuid>,
}

/// Partial update for an admin profile.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Admin repository for CRUD operations.
#[derive(Debug)]
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct AdminRepository {
    db: DatabaseConnection,
}

impl AdminRepository {
    /// Creates a new admin repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an admin by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<admins::Model>, DbErr> {
        admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds an admin by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<admins::Model>, DbErr> {
        admins::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, new: NewAdmin<'_>) -> Result<admins::Model, DbErr> {
        let now = Utc::now().into();
        let admin = admins::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(new.first_name.map(ToString::to_string)),
            last_name: Set(new.last_name.map(ToString::to_string)),
            email: Set(new.email.to_string()),
            phone: Set(new.phone.map(ToString::to_string)),
            password_hash: Set(new.password_hash.to_string()),
            is_admin: Set(new.is_admin),
            is_active: Set(true),
            last_login: Set(None),
            created_by: Set(new.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        admin.insert(&self.db).await
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        update: AdminUpdate,
    ) -> Result<Option<admins::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: admins::ActiveModel = existing.into();
        if let Some(first_name) = update.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = update.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(phone) = update.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(password_hash) = update.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(());
        };

        let now = Utc::now().into();
        let mut active: admins::ActiveModel = existing.into();
        active.last_login = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await?;
        Ok(())
    }

    /// Deletes an admin by ID. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = admins::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Lists admins newest-first with optional name/email search.
    ///
    /// Returns the page of rows and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<admins::Model>, u64), DbErr> {
        let mut query = admins::Entity::find();

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(admins::Column::FirstName.contains(term))
                    .add(admins::Column::LastName.contains(term))
                    .add(admins::Column::Email.contains(term)),
            );
        }

        let paginator = query
            .order_by_desc(admins::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((rows, total))
    }

    /// Computes the admin overview counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn stats(&self) -> Result<AdminStats, DbErr> {
        let total = admins::Entity::find().count(&self.db).await?;
        let active = admins::Entity::find()
            .filter(admins::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        let inactive = admins::Entity::find()
            .filter(admins::Column::IsActive.eq(false))
            .count(&self.db)
            .await?;

        let thirty_days_ago = Utc::now() - Duration::days(30);
        let recent = admins::Entity::find()
            .filter(admins::Column::CreatedAt.gte(thirty_days_ago))
            .count(&self.db)
            .await?;

        Ok(AdminStats {
            total,
            active,
            inactive,
            recent,
        })
    }
}
