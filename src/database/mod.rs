use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::AppConfig;

/// Owns the connection pool. Connections are acquired per statement and go back to the pool
/// when dropped.
#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Creates a lazy pool: nothing connects until the first query acquires a connection.
    pub fn init(config: &AppConfig) -> Self {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let max_cons = if cfg!(test) { 1 } else { 5 };
        let db_config = &config.db_config;

        let db_pool = PgPoolOptions::new()
            .max_connections(max_cons)
            .acquire_timeout(db_config.connect_timeout())
            .connect_lazy_with(db_config.connection_options());

        Self { db: db_pool }
    }

    /// Runs the embedded migrations against the pool.
    pub async fn migrate(&self) -> Result<()> {
        info!("{:<20} - Running migrations", "migrate_db");
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    /// Creates the database named in `config` and migrates it.
    /// Used by the integration tests to get an isolated database per test.
    pub async fn configure_for_test(config: &AppConfig) -> Result<Self> {
        let db_config = &config.db_config;
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;

        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;
        connection.close().await?;

        let dm = Self::init(config);
        dm.migrate().await?;

        Ok(dm)
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
