use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;

use crate::error::AppError;

pub mod models;
pub mod repositories;
pub mod utils;

pub use utils::sql;

/// Cloneable handle over the connection pool. Services hold one and open
/// their units of work through it; plain reads go straight to `pool()`.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Database { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a closure inside a transaction: commit on Ok, roll back on Err.
    pub async fn transaction<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: for<'a> FnOnce(
            &'a mut Transaction<'_, Postgres>,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<T, AppError>> + Send + 'a>,
        >,
        T: Send,
    {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!(
                        "Rollback failed after error (orig: {}, rollback: {})",
                        err,
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}

pub async fn init_database(database_url: &str) -> Result<Database> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(Database::new(pool))
}
