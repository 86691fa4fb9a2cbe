//! Database seeder for Tooldesk development and bootstrap.
//!
//! Creates the first admin account (there is no signup path for admins)
//! and a couple of demo tools for the entitlement dropdown.
//!
//! Usage: cargo run --bin seeder
//!
//! Environment:
//!   DATABASE_URL         - Postgres connection string (required)
//!   SEED_ADMIN_EMAIL     - bootstrap admin email (default admin@tooldesk.dev)
//!   SEED_ADMIN_PASSWORD  - bootstrap admin password (default changeme123)

use sea_orm::DatabaseConnection;
use tooldesk_core::auth::hash_password;
use tooldesk_db::repositories::NewAdmin;
use tooldesk_db::{AdminRepository, ToolRepository};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tooldesk_db::connect(&database_url, 5)
        .await
        .expect("Failed to connect to database");

    println!("Seeding bootstrap admin...");
    seed_admin(&db).await;

    println!("Seeding demo tools...");
    seed_tools(&db).await;

    println!("Seeding complete!");
}

/// Seeds the bootstrap admin account.
async fn seed_admin(db: &DatabaseConnection) {
    let email = std::env::var("SEED_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@tooldesk.dev".to_string())
        .to_lowercase();
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "changeme123".to_string());

    let repo = AdminRepository::new(db.clone());

    if repo
        .find_by_email(&email)
        .await
        .expect("Failed to query admins")
        .is_some()
    {
        println!("  Admin {email} already exists, skipping...");
        return;
    }

    let password_hash = hash_password(&password).expect("Failed to hash password");

    let admin = repo
        .create(NewAdmin {
            first_name: Some("Root"),
            last_name: Some("Admin"),
            email: &email,
            phone: None,
            password_hash: &password_hash,
            is_admin: true,
            created_by: None,
        })
        .await
        .expect("Failed to create admin");

    println!("  Created admin {} ({})", admin.email, admin.id);
}

/// Seeds demo tools for local development.
async fn seed_tools(db: &DatabaseConnection) {
    let repo = ToolRepository::new(db.clone());

    let demo_tools = [
        ("Design Studio", "design-studio"),
        ("Keyword Planner", "keyword-planner"),
        ("Stock Library", "stock-library"),
    ];

    for (name, slug) in demo_tools {
        if repo
            .find_by_slug(slug)
            .await
            .expect("Failed to query tools")
            .is_some()
        {
            println!("  Tool {slug} already exists, skipping...");
            continue;
        }

        repo.create(name, slug, None, None)
            .await
            .expect("Failed to create tool");
        println!("  Created tool {slug}");
    }
}
