//! Repository abstractions for data access.
//!
//! One repository per aggregate. Each holds its own `DatabaseConnection`
//! handed in at construction.

pub mod admin;
pub mod entitlement;
pub mod expense;
pub mod product;
pub mod sale;
pub mod subscription;
pub mod tool;
pub mod user;

pub use admin::{AdminRepository, AdminStats, AdminUpdate, NewAdmin};
pub use entitlement::EntitlementRepository;
pub use expense::ExpenseRepository;
pub use product::{ProductInput, ProductRepository};
pub use sale::SaleRepository;
pub use subscription::{SubscriptionRepository, SubscriptionUpdate};
pub use tool::ToolRepository;
pub use user::UserRepository;
