//! `SeaORM` entity definitions.

pub mod admins;
pub mod expenses;
pub mod products;
pub mod sales;
pub mod sea_orm_active_enums;
pub mod subscriptions;
pub mod tools;
pub mod user_tools;
pub mod users;
