//! `SeaORM` Entity for the products table.
//!
//! Display prices are opaque strings (catalog formatting is a frontend
//! concern); only variant `price_number` values inside the JSON are
//! numeric. `image` is an opaque URL to an externally hosted asset.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: String,
    pub original_price: String,
    pub duration: String,
    pub badge: String,
    #[sea_orm(column_type = "Decimal(Some((4, 2)))")]
    pub rating: Decimal,
    pub reviews: i32,
    pub image: String,
    pub has_variants: bool,
    pub variants: Json,
    pub features: Json,
    pub specifications: Json,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
