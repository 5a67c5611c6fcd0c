use log::*;

use crate::SqliteDatabase;

pub const MEMORY_DB_URL: &str = "sqlite::memory:";

/// Loads `.env.test` if there is one and initialises logging. Safe to call from every test.
pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

/// A private, migrated in-memory database. Each call returns a fresh, empty store.
pub async fn memory_db() -> SqliteDatabase {
    prepare_test_env();
    let db = SqliteDatabase::new_with_url(MEMORY_DB_URL, 1).await.expect("Error creating in-memory database");
    db.migrate().await.expect("Error running DB migrations");
    info!("🚀️ In-memory database ready");
    db
}
