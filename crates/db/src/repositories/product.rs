//! Product repository for catalog CRUD.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::products;

/// Full set of caller-supplied product fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Product name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Display price string.
    pub price: String,
    /// Display pre-discount price string.
    pub original_price: String,
    /// Plan duration label.
    pub duration: String,
    /// Badge label.
    pub badge: String,
    /// Star rating.
    pub rating: Decimal,
    /// Review count.
    pub reviews: i32,
    /// Image asset URL.
    pub image: String,
    /// Whether priced variants exist.
    pub has_variants: bool,
    /// Variant list as JSON.
    pub variants: serde_json::Value,
    /// Feature strings as JSON.
    pub features: serde_json::Value,
    /// Label/value specification pairs as JSON.
    pub specifications: serde_json::Value,
    /// Category label.
    pub category: String,
    /// Visibility flag.
    pub is_active: bool,
}

/// Product repository for CRUD operations.
#[derive(Debug)]
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: ProductInput) -> Result<products::Model, DbErr> {
        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            original_price: Set(input.original_price),
            duration: Set(input.duration),
            badge: Set(input.badge),
            rating: Set(input.rating),
            reviews: Set(input.reviews),
            image: Set(input.image),
            has_variants: Set(input.has_variants),
            variants: Set(input.variants),
            features: Set(input.features),
            specifications: Set(input.specifications),
            category: Set(input.category),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        product.insert(&self.db).await
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists products newest-first with optional search and category filter.
    ///
    /// Returns the page of rows and the total match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        category: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<products::Model>, u64), DbErr> {
        let mut query = products::Entity::find();

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(products::Column::Name.contains(term))
                    .add(products::Column::Description.contains(term)),
            );
        }
        if let Some(category) = category {
            query = query.filter(products::Column::Category.eq(category));
        }

        let paginator = query
            .order_by_desc(products::Column::CreatedAt)
            .paginate(&self.db, limit.max(1));
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((rows, total))
    }

    /// Replaces all caller-supplied fields of a product.
    ///
    /// Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: ProductInput,
    ) -> Result<Option<products::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: products::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(input.price);
        active.original_price = Set(input.original_price);
        active.duration = Set(input.duration);
        active.badge = Set(input.badge);
        active.rating = Set(input.rating);
        active.reviews = Set(input.reviews);
        active.image = Set(input.image);
        active.has_variants = Set(input.has_variants);
        active.variants = Set(input.variants);
        active.features = Set(input.features);
        active.specifications = Set(input.specifications);
        active.category = Set(input.category);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Deletes a product by ID. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = products::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
