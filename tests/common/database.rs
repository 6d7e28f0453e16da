use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};

use sanatorium_api::app::AppState;
use sanatorium_api::auth::Permission;

use super::{serve, TestServer};

static SCHEMAS: AtomicUsize = AtomicUsize::new(0);

const TABLES: &str = r#"
CREATE TABLE roles (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    title TEXT,
    permissions JSONB,
    created_at TIMESTAMP,
    updated_at TIMESTAMP
);
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT,
    password TEXT NOT NULL,
    role_id BIGINT NOT NULL REFERENCES roles (id),
    created_at TIMESTAMP,
    updated_at TIMESTAMP
);
CREATE TABLE objects (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    city TEXT,
    address TEXT,
    description TEXT,
    created_at TIMESTAMP,
    updated_at TIMESTAMP
);
CREATE TABLE reservations (
    id BIGSERIAL PRIMARY KEY,
    object_id BIGINT NOT NULL REFERENCES objects (id),
    user_id BIGINT REFERENCES users (id),
    guest_name TEXT NOT NULL,
    phone TEXT NOT NULL,
    date_from DATE NOT NULL,
    date_to DATE NOT NULL,
    status TEXT NOT NULL,
    created_at TIMESTAMP,
    updated_at TIMESTAMP
);
CREATE TABLE faqs (
    id BIGSERIAL PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    sort_order INT NOT NULL DEFAULT 0,
    created_at TIMESTAMP,
    updated_at TIMESTAMP
);
CREATE TABLE tags (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    created_at TIMESTAMP
);
CREATE TABLE object_tags (
    object_id BIGINT NOT NULL REFERENCES objects (id),
    tag_id BIGINT NOT NULL REFERENCES tags (id)
);
CREATE TABLE feedback (
    id BIGSERIAL PRIMARY KEY,
    object_id BIGINT NOT NULL REFERENCES objects (id),
    user_id BIGINT REFERENCES users (id),
    author_name TEXT NOT NULL,
    text TEXT NOT NULL,
    rating SMALLINT NOT NULL,
    created_at TIMESTAMP
);
"#;

/// Users seeded into every scratch schema
pub const ADMIN: i64 = 1;
/// Holds the `patient` role and has a reservation and a feedback entry
pub const GUEST: i64 = 2;
/// Holds the `patient` role and nothing else
pub const IDLE: i64 = 3;

pub const PATIENT_ROLE: i64 = 2;
pub const SEA_TAG: i64 = 1;

/// Scratch schema in the database named by `DATABASE_URL`, dropped on `teardown`
pub struct TestDatabase {
    admin: PgPool,
    schema: String,
    pub pool: PgPool,
}

impl TestDatabase {
    pub async fn create() -> Result<Self> {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL must name a scratch Postgres database")?;

        let schema = format!(
            "sanatorium_test_{}_{}",
            std::process::id(),
            SCHEMAS.fetch_add(1, Ordering::SeqCst)
        );
        let admin = PgPool::connect(&url).await?;
        admin.execute(format!("CREATE SCHEMA {}", schema).as_str()).await?;

        let options = PgConnectOptions::from_str(&url)?.options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new().max_connections(4).connect_with(options).await?;
        pool.execute(TABLES).await?;

        let db = Self { admin, schema, pool };
        db.seed().await?;
        Ok(db)
    }

    async fn seed(&self) -> Result<()> {
        let all: serde_json::Map<String, serde_json::Value> = Permission::ALL
            .iter()
            .map(|p| (p.slug().to_string(), serde_json::Value::Bool(true)))
            .collect();

        sqlx::query("INSERT INTO roles (id, name, title, permissions) VALUES (1, 'admin', 'Administrator', $1)")
            .bind(serde_json::Value::Object(all))
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "INSERT INTO roles (id, name, title, permissions) \
             VALUES (2, 'patient', 'Patient', '{\"object_read\": true}')",
        )
        .execute(&self.pool)
        .await?;

        self.pool
            .execute(
                r#"
                INSERT INTO users (id, name, email, password, role_id, created_at) VALUES
                    (1, 'Admin', 'admin@example.test', '!', 1, NOW()),
                    (2, 'Guest', 'guest@example.test', '!', 2, NOW()),
                    (3, 'Idle', 'idle@example.test', '!', 2, NOW());
                INSERT INTO objects (id, title, city, created_at) VALUES (1, 'Санаторий им. Фрунзе', 'Сочи', NOW());
                INSERT INTO tags (id, title, created_at) VALUES (1, 'Море', NOW()), (2, 'Горы', NOW());
                INSERT INTO object_tags (object_id, tag_id) VALUES (1, 1);
                INSERT INTO reservations (object_id, user_id, guest_name, phone, date_from, date_to, status, created_at)
                    VALUES (1, 2, 'Guest', '+79990000000', '2024-07-01', '2024-07-14', 'new', NOW());
                INSERT INTO feedback (object_id, user_id, author_name, text, rating, created_at)
                    VALUES (1, 2, 'Guest', 'Quiet and clean', 5, NOW());
                SELECT setval(pg_get_serial_sequence('roles', 'id'), 100);
                SELECT setval(pg_get_serial_sequence('users', 'id'), 100);
                SELECT setval(pg_get_serial_sequence('objects', 'id'), 100);
                SELECT setval(pg_get_serial_sequence('tags', 'id'), 100);
                "#,
            )
            .await?;
        Ok(())
    }

    /// Serve the production state (Postgres seams) over this schema
    pub async fn spawn_app(&self) -> Result<TestServer> {
        serve(AppState::new(self.pool.clone())).await
    }

    pub async fn teardown(self) -> Result<()> {
        self.pool.close().await;
        self.admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await?;
        Ok(())
    }
}
