//! Relational Store Adapter (C1): typed operations over products, orders,
//! order items, shipping rates, support tickets, returns, and return items.

mod error;
mod orders;
mod products;
mod returns;
mod shipping;
mod tickets;

pub use error::StoreError;

use sqlx::PgPool;

/// Thin wrapper over a Postgres pool. Every multi-statement write runs in
/// one transaction, scoped to a single operation — matching the single
/// `conn.commit()` boundary in the reference `create_order`/`create_return`.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Liveness probe used by the `/health` handler.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
