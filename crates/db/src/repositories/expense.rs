//! Expense repository for database operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::expenses;
use tooldesk_core::expense::ExpenseEntry;

/// Converts a stored row into the core representation.
#[must_use]
pub fn to_entry(model: &expenses::Model) -> ExpenseEntry {
    ExpenseEntry {
        id: model.id,
        title: model.title.clone(),
        amount: model.amount,
        day: model.day,
        note: model.note.clone(),
        category: model.category.clone(),
    }
}

/// Expense repository for ledger entries.
#[derive(Debug)]
#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts an expense entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        title: &str,
        amount: Decimal,
        day: NaiveDate,
        note: Option<&str>,
        category: &str,
    ) -> Result<expenses::Model, DbErr> {
        let now = Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            amount: Set(amount),
            day: Set(day),
            note: Set(note.map(ToString::to_string)),
            category: Set(category.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        expense.insert(&self.db).await
    }

    /// All expenses, newest day first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<expenses::Model>, DbErr> {
        expenses::Entity::find()
            .order_by_desc(expenses::Column::Day)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Expenses with `first <= day < next`, newest day first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_in_range(
        &self,
        first: NaiveDate,
        next: NaiveDate,
    ) -> Result<Vec<expenses::Model>, DbErr> {
        expenses::Entity::find()
            .filter(expenses::Column::Day.gte(first))
            .filter(expenses::Column::Day.lt(next))
            .order_by_desc(expenses::Column::Day)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes an expense by ID. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = expenses::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
