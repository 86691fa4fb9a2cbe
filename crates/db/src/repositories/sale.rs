//! Sale repository for the Ledger Engine's persistence.
//!
//! Every write takes an already-normalized record; the repository never
//! derives totals itself. Reads surface rows in the order the aggregate
//! queries require: creation order within a day, never value-sorted.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use crate::entities::sales;
use tooldesk_core::ledger::{NormalizedSale, SaleItem};

/// Converts a stored row into the core representation.
///
/// # Errors
///
/// Returns an error when the stored items payload does not decode.
pub fn to_normalized(model: &sales::Model) -> Result<NormalizedSale, DbErr> {
    let items: Vec<SaleItem> = serde_json::from_value(model.items.clone())
        .map_err(|e| DbErr::Custom(format!("corrupt items payload for sale {}: {e}", model.id)))?;

    Ok(NormalizedSale {
        day: model.day,
        items,
        total_sales_amount: model.total_sales_amount,
        total_profit: model.total_profit,
    })
}

/// Sale repository for ledger records.
#[derive(Debug)]
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a normalized sale record (append-only; never merges with an
    /// existing same-day record).
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, sale: &NormalizedSale) -> Result<sales::Model, DbErr> {
        let now = Utc::now().into();
        let record = sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            day: Set(sale.day),
            items: Set(serde_json::to_value(&sale.items)
                .map_err(|e| DbErr::Custom(e.to_string()))?),
            total_sales_amount: Set(sale.total_sales_amount),
            total_profit: Set(sale.total_profit),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record.insert(&self.db).await
    }

    /// Replaces a record with its re-normalized form.
    ///
    /// Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        sale: &NormalizedSale,
    ) -> Result<Option<sales::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: sales::ActiveModel = existing.into();
        active.day = Set(sale.day);
        active.items = Set(serde_json::to_value(&sale.items)
            .map_err(|e| DbErr::Custom(e.to_string()))?);
        active.total_sales_amount = Set(sale.total_sales_amount);
        active.total_profit = Set(sale.total_profit);
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map(Some)
    }

    /// Finds a sale record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<sales::Model>, DbErr> {
        sales::Entity::find_by_id(id).one(&self.db).await
    }

    /// All records of one day, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_day(&self, day: NaiveDate) -> Result<Vec<sales::Model>, DbErr> {
        sales::Entity::find()
            .filter(sales::Column::Day.eq(day))
            .order_by_asc(sales::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// All records with `first <= day < next`, day-ascending then creation
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_in_range(
        &self,
        first: NaiveDate,
        next: NaiveDate,
    ) -> Result<Vec<sales::Model>, DbErr> {
        sales::Entity::find()
            .filter(sales::Column::Day.gte(first))
            .filter(sales::Column::Day.lt(next))
            .order_by_asc(sales::Column::Day)
            .order_by_asc(sales::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// All records, newest day first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<sales::Model>, DbErr> {
        sales::Entity::find()
            .order_by_desc(sales::Column::Day)
            .order_by_desc(sales::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tooldesk_core::ledger::normalize;

    fn pen_sale() -> NormalizedSale {
        normalize(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            vec![SaleItem {
                product_name: "Pen".to_string(),
                selling_price: dec!(100),
                cost_price: dec!(60),
                profit: dec!(0),
            }],
        )
    }

    #[test]
    fn test_stored_row_round_trips_to_core() {
        let sale = pen_sale();
        let now = Utc::now().into();
        let model = sales::Model {
            id: Uuid::new_v4(),
            day: sale.day,
            items: serde_json::to_value(&sale.items).unwrap(),
            total_sales_amount: sale.total_sales_amount,
            total_profit: sale.total_profit,
            created_at: now,
            updated_at: now,
        };

        let restored = to_normalized(&model).unwrap();
        assert_eq!(restored, sale);
        assert_eq!(restored.items[0].profit, dec!(40));
    }

    #[test]
    fn test_corrupt_items_payload_is_an_error() {
        let now = Utc::now().into();
        let model = sales::Model {
            id: Uuid::new_v4(),
            day: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            items: serde_json::json!({"not": "an array"}),
            total_sales_amount: dec!(0),
            total_profit: dec!(0),
            created_at: now,
            updated_at: now,
        };

        assert!(to_normalized(&model).is_err());
    }

    #[tokio::test]
    async fn test_update_unknown_id_reports_absence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sales::Model>::new()])
            .into_connection();

        let repo = SaleRepository::new(db);
        let result = repo.update(Uuid::new_v4(), &pen_sale()).await.unwrap();

        assert!(result.is_none());
    }
}
