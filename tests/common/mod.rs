//! Common test utilities for ledger integration tests
//!
//! ## Singleton Pool Pattern
//! All integration tests share a single database connection pool per test
//! binary to avoid exhausting Postgres connections when binaries run in
//! parallel. Migrations are applied once at pool creation so a fresh
//! database works out of the box.
//!
//! Tests skip (pass vacuously) when `DATABASE_URL` is not set, so the unit
//! suites stay runnable without infrastructure.

use rider_ledger_rs::db::init_pool;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

static TEST_POOL: OnceCell<Option<PgPool>> = OnceCell::const_new();

/// Get the shared test pool, or `None` when no database is configured.
pub async fn try_test_pool() -> Option<PgPool> {
    TEST_POOL
        .get_or_init(|| async {
            let Ok(database_url) = std::env::var("DATABASE_URL") else {
                eprintln!("DATABASE_URL not set; skipping database-backed tests");
                return None;
            };

            if std::env::var("DB_MAX_CONNECTIONS").is_err() {
                std::env::set_var("DB_MAX_CONNECTIONS", "5");
            }
            if std::env::var("DB_ACQUIRE_TIMEOUT_SECS").is_err() {
                std::env::set_var("DB_ACQUIRE_TIMEOUT_SECS", "10");
            }

            let pool = init_pool(&database_url)
                .await
                .expect("Failed to initialize test pool");

            sqlx::migrate!("./db/migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            Some(pool)
        })
        .await
        .clone()
}

fn unique_mobile() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("07{}", &hex[..10])
}

/// Create a rider actor with a unique mobile number.
pub async fn create_test_rider(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (name, mobile, role)
        VALUES ($1, $2, 'rider')
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(unique_mobile())
    .fetch_one(pool)
    .await
    .expect("Failed to create test rider")
}

/// Create an admin actor with a unique mobile number.
pub async fn create_test_admin(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (name, mobile, role)
        VALUES ($1, $2, 'admin')
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(unique_mobile())
    .fetch_one(pool)
    .await
    .expect("Failed to create test admin")
}

/// Number of journal entries recorded against a wallet.
pub async fn journal_count(pool: &PgPool, wallet_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM wallet_transactions WHERE wallet_id = $1",
    )
    .bind(wallet_id)
    .fetch_one(pool)
    .await
    .expect("Failed to count journal entries")
}

/// Delete test actors; wallets, journal entries, and sheets cascade.
pub async fn cleanup_users(pool: &PgPool, user_ids: &[i64]) {
    sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(user_ids)
        .execute(pool)
        .await
        .ok();
}
