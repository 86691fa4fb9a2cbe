//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the Tooldesk backend.

use sea_orm_migration::prelude::*;

#[allow(missing_docs)]
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: PRINCIPALS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ADMINS_SQL).await?;

        // ============================================================
        // PART 3: TOOLS & ENTITLEMENTS
        // ============================================================
        db.execute_unprepared(TOOLS_SQL).await?;
        db.execute_unprepared(USER_TOOLS_SQL).await?;

        // ============================================================
        // PART 4: CATALOG
        // ============================================================
        db.execute_unprepared(PRODUCTS_SQL).await?;

        // ============================================================
        // PART 5: LEDGERS
        // ============================================================
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 6: SUBSCRIPTIONS
        // ============================================================
        db.execute_unprepared(SUBSCRIPTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- End-user roles
CREATE TYPE user_role AS ENUM ('user', 'admin');

-- Tool grant status (expiry is derived at read time, never written back)
CREATE TYPE grant_status AS ENUM ('active', 'expired');

-- Subscription lifecycle
CREATE TYPE subscription_status AS ENUM ('active', 'inactive', 'expired');
CREATE TYPE subscription_duration AS ENUM ('six_months', 'one_year');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    username VARCHAR(64) NOT NULL,
    name VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'user',
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX idx_users_username ON users (username);
";

const ADMINS_SQL: &str = r"
CREATE TABLE admins (
    id UUID PRIMARY KEY,
    first_name VARCHAR(255),
    last_name VARCHAR(255),
    email VARCHAR(255) NOT NULL,
    phone VARCHAR(32),
    password_hash VARCHAR(255) NOT NULL,
    is_admin BOOLEAN NOT NULL DEFAULT TRUE,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    last_login TIMESTAMPTZ,
    -- Non-owning back-reference; removing the creator keeps the row.
    created_by UUID REFERENCES admins(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX idx_admins_email ON admins (email);
";

const TOOLS_SQL: &str = r"
CREATE TABLE tools (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    slug VARCHAR(128) NOT NULL,
    image TEXT,
    access_url TEXT,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX idx_tools_slug ON tools (slug);
";

const USER_TOOLS_SQL: &str = r"
CREATE TABLE user_tools (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id),
    tool_id UUID NOT NULL REFERENCES tools(id),
    expires_at TIMESTAMPTZ NOT NULL,
    status grant_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- At most one grant per (user, tool); assignment updates in place.
CREATE UNIQUE INDEX idx_user_tools_pair ON user_tools (user_id, tool_id);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    price VARCHAR(64) NOT NULL,
    original_price VARCHAR(64) NOT NULL,
    duration VARCHAR(64) NOT NULL,
    badge VARCHAR(64) NOT NULL,
    rating NUMERIC(4,2) NOT NULL,
    reviews INTEGER NOT NULL,
    image TEXT NOT NULL,
    has_variants BOOLEAN NOT NULL DEFAULT FALSE,
    variants JSONB NOT NULL DEFAULT '[]',
    features JSONB NOT NULL DEFAULT '[]',
    specifications JSONB NOT NULL DEFAULT '[]',
    category VARCHAR(128) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_products_category ON products (category);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY,
    -- UTC calendar day; multiple records per day are expected.
    day DATE NOT NULL,
    items JSONB NOT NULL DEFAULT '[]',
    total_sales_amount NUMERIC(14,2) NOT NULL DEFAULT 0,
    total_profit NUMERIC(14,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_sales_day ON sales (day);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    amount NUMERIC(14,2) NOT NULL,
    day DATE NOT NULL,
    note TEXT,
    category VARCHAR(128) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_expenses_day ON expenses (day);
";

const SUBSCRIPTIONS_SQL: &str = r"
CREATE TABLE subscriptions (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL,
    duration subscription_duration NOT NULL DEFAULT 'six_months',
    day TIMESTAMPTZ NOT NULL,
    status subscription_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_subscriptions_email ON subscriptions (email);
CREATE INDEX idx_subscriptions_status ON subscriptions (status);
CREATE INDEX idx_subscriptions_day ON subscriptions (day DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS subscriptions;
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS sales;
DROP TABLE IF EXISTS products;
DROP TABLE IF EXISTS user_tools;
DROP TABLE IF EXISTS tools;
DROP TABLE IF EXISTS admins;
DROP TABLE IF EXISTS users;
DROP TYPE IF EXISTS subscription_duration;
DROP TYPE IF EXISTS subscription_status;
DROP TYPE IF EXISTS grant_status;
DROP TYPE IF EXISTS user_role;
";
