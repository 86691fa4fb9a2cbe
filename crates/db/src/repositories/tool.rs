//! Tool repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::tools;

/// Tool repository for catalog lookups.
#[derive(Debug)]
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct ToolRepository {
    db: DatabaseConnection,
}

impl ToolRepository {
    /// Creates a new tool repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All active tools, name-ascending (for the admin dropdown).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<tools::Model>, DbErr> {
        tools::Entity::find()
            .filter(tools::Column::Active.eq(true))
            .order_by_asc(tools::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a tool by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<tools::Model>, DbErr> {
        tools::Entity::find()
            .filter(tools::Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    /// Finds a tool by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<tools::Model>, DbErr> {
        tools::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a tool (used by seeding and back-office setup).
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        name: &str,
        slug: &str,
        image: Option<&str>,
        access_url: Option<&str>,
    ) -> Result<tools::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let tool = tools::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            image: Set(image.map(ToString::to_string)),
            access_url: Set(access_url.map(ToString::to_string)),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        tool.insert(&self.db).await
    }
}
