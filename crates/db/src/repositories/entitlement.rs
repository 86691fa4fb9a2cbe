//! Entitlement repository: (user, tool) grants with an expiry.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::GrantStatus, tools, user_tools};

/// Entitlement repository for grant operations.
#[derive(Debug)]
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct EntitlementRepository {
    db: DatabaseConnection,
}

impl EntitlementRepository {
    /// Creates a new entitlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assigns a tool to a user: creates the grant, or updates the existing
    /// one in place. Always resets status to active, whatever it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn assign(
        &self,
        user_id: Uuid,
        tool_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<user_tools::Model, DbErr> {
        let now = Utc::now().into();

        if let Some(existing) = self.find_pair(user_id, tool_id).await? {
            let mut active: user_tools::ActiveModel = existing.into();
            active.expires_at = Set(expires_at.into());
            active.status = Set(GrantStatus::Active);
            active.updated_at = Set(now);
            return active.update(&self.db).await;
        }

        let grant = user_tools::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            tool_id: Set(tool_id),
            expires_at: Set(expires_at.into()),
            status: Set(GrantStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        grant.insert(&self.db).await
    }

    /// Removes a grant. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn unassign(&self, user_id: Uuid, tool_id: Uuid) -> Result<bool, DbErr> {
        let Some(existing) = self.find_pair(user_id, tool_id).await? else {
            return Ok(false);
        };
        existing.delete(&self.db).await?;
        Ok(true)
    }

    /// Finds the grant for a (user, tool) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_pair(
        &self,
        user_id: Uuid,
        tool_id: Uuid,
    ) -> Result<Option<user_tools::Model>, DbErr> {
        user_tools::Entity::find()
            .filter(user_tools::Column::UserId.eq(user_id))
            .filter(user_tools::Column::ToolId.eq(tool_id))
            .one(&self.db)
            .await
    }

    /// A user's grants with their tools, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(user_tools::Model, Option<tools::Model>)>, DbErr> {
        user_tools::Entity::find()
            .filter(user_tools::Column::UserId.eq(user_id))
            .find_also_related(tools::Entity)
            .order_by_desc(user_tools::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Every grant with its tool, newest first. Callers group by user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
    ) -> Result<Vec<(user_tools::Model, Option<tools::Model>)>, DbErr> {
        user_tools::Entity::find()
            .find_also_related(tools::Entity)
            .order_by_desc(user_tools::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn grant(
        user_id: Uuid,
        tool_id: Uuid,
        expires_at: chrono::DateTime<Utc>,
    ) -> user_tools::Model {
        let now = Utc::now().into();
        user_tools::Model {
            id: Uuid::new_v4(),
            user_id,
            tool_id,
            expires_at: expires_at.into(),
            status: GrantStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_reassignment_updates_in_place() {
        let user_id = Uuid::new_v4();
        let tool_id = Uuid::new_v4();
        let first_expiry = Utc::now() + Duration::days(10);
        let second_expiry = Utc::now() + Duration::days(30);

        let existing = grant(user_id, tool_id, first_expiry);
        let mut updated = existing.clone();
        updated.expires_at = second_expiry.into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // find_pair hits the existing grant
            .append_query_results([vec![existing]])
            // the update round-trips the row with the new expiry
            .append_query_results([vec![updated]])
            .into_connection();

        let repo = EntitlementRepository::new(db.clone());
        let result = repo.assign(user_id, tool_id, second_expiry).await.unwrap();

        assert_eq!(result.user_id, user_id);
        assert_eq!(result.tool_id, tool_id);
        assert_eq!(result.expires_at.to_utc(), second_expiry);
        assert_eq!(result.status, GrantStatus::Active);

        // The second statement must be an UPDATE of the existing row, not a
        // second INSERT for the pair.
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[0]).contains("SELECT"));
        assert!(format!("{:?}", log[1]).contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_first_assignment_inserts() {
        let user_id = Uuid::new_v4();
        let tool_id = Uuid::new_v4();
        let expiry = Utc::now() + Duration::days(30);
        let inserted = grant(user_id, tool_id, expiry);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // no grant for the pair yet
            .append_query_results([Vec::<user_tools::Model>::new()])
            // the insert round-trips the new row
            .append_query_results([vec![inserted]])
            .into_connection();

        let repo = EntitlementRepository::new(db.clone());
        let result = repo.assign(user_id, tool_id, expiry).await.unwrap();
        assert_eq!(result.status, GrantStatus::Active);

        let log = db.into_transaction_log();
        assert!(format!("{:?}", log[1]).contains("INSERT"));
    }

    #[tokio::test]
    async fn test_unassign_missing_pair_reports_absence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_tools::Model>::new()])
            .into_connection();

        let repo = EntitlementRepository::new(db);
        let removed = repo
            .unassign(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        assert!(!removed);
    }
}
