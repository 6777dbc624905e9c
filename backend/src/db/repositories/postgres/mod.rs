//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Embedded migration creating `shopping_items` when absent
//! - Connection health monitoring and query counters
//!
//! Diesel is synchronous, so every operation checks out a pooled connection
//! on a blocking thread. Writes are single statements; the row-affected count
//! decides between success and `NotFound`.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::db::repository::{ErrorContext, ItemRepository, RepositoryError, RepositoryResult};
use crate::models::ShoppingItem;

mod models;
mod schema;

use models::*;
use schema::*;

pub use crate::db::config::PostgresConfig;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total queries executed
    pub total_queries: u64,
    /// Queries that failed for reasons other than not-found or conflict
    pub failed_queries: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository backed by a connection pool.
    ///
    /// Building the pool opens `min_pool_size` connections, so an unreachable
    /// database fails here rather than on the first request. This call blocks;
    /// the table itself is created by [`ItemRepository::ensure_schema`].
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the pool cannot connect
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        if !applied.is_empty() {
            log::info!("Applied {} schema migration(s)", applied.len());
        }
        Ok(())
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let timeout = Duration::from_secs(self.config.connection_timeout_sec);
        self.with_conn_timeout(operation, timeout, f).await
    }

    /// Like [`Self::with_conn`], giving up on checkout after `timeout`.
    async fn with_conn_timeout<T, F>(
        &self,
        operation: &'static str,
        timeout: Duration,
        f: F,
    ) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get_timeout(timeout).map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new(operation).with_details("pool_checkout"),
                )
            })?;

            total_queries.fetch_add(1, Ordering::Relaxed);
            let result = f(&mut conn);
            if let Err(e) = &result {
                if !e.is_not_found() && !e.is_conflict() {
                    failed_queries.fetch_add(1, Ordering::Relaxed);
                }
            }
            result
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Get detailed health information.
    ///
    /// Returns a tuple of (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        match self.health_check().await {
            Ok(true) => (true, Some(start.elapsed().as_millis() as u64), None),
            Ok(false) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (
                false,
                Some(start.elapsed().as_millis() as u64),
                Some(e.to_string()),
            ),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error, context: ErrorContext) -> RepositoryError {
    RepositoryError::from(err).with_context(context)
}

#[async_trait]
impl ItemRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        // Answer quickly when the database is down instead of waiting out
        // the full checkout timeout.
        let timeout = Duration::from_secs(self.config.health_check_timeout_sec);
        self.with_conn_timeout("health_check", timeout, |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(|e| map_diesel_error(e, ErrorContext::new("health_check")))
        })
        .await
    }

    async fn ensure_schema(&self) -> RepositoryResult<()> {
        self.with_conn("ensure_schema", Self::run_migrations).await
    }

    async fn get_item(&self, name: &str) -> RepositoryResult<ShoppingItem> {
        let name = name.to_string();
        self.with_conn("get_item", move |conn| {
            shopping_items::table
                .filter(shopping_items::name.eq(&name))
                .select(ShoppingItemRow::as_select())
                .first::<ShoppingItemRow>(conn)
                .map(ShoppingItem::from)
                .map_err(|e| map_diesel_error(e, ErrorContext::item("get_item", &name)))
        })
        .await
    }

    async fn list_items(&self) -> RepositoryResult<Vec<ShoppingItem>> {
        self.with_conn("list_items", |conn| {
            let rows = shopping_items::table
                .select(ShoppingItemRow::as_select())
                .load::<ShoppingItemRow>(conn)
                .map_err(|e| map_diesel_error(e, ErrorContext::new("list_items")))?;

            Ok(rows.into_iter().map(ShoppingItem::from).collect())
        })
        .await
    }

    async fn create_item(&self, item: &ShoppingItem) -> RepositoryResult<ShoppingItem> {
        let item = item.clone();
        self.with_conn("create_item", move |conn| {
            diesel::insert_into(shopping_items::table)
                .values(NewShoppingItemRow::from(&item))
                .returning(ShoppingItemRow::as_returning())
                .get_result::<ShoppingItemRow>(conn)
                .map(ShoppingItem::from)
                .map_err(|e| map_diesel_error(e, ErrorContext::item("create_item", &item.name)))
        })
        .await
    }

    async fn update_item(
        &self,
        name: &str,
        item: &ShoppingItem,
    ) -> RepositoryResult<ShoppingItem> {
        let name = name.to_string();
        let item = item.clone();
        self.with_conn("update_item", move |conn| {
            // A changed name is applied in the same statement; the primary key
            // rejects it if another row already owns that name.
            let affected =
                diesel::update(shopping_items::table.filter(shopping_items::name.eq(&name)))
                    .set((
                        shopping_items::name.eq(&item.name),
                        shopping_items::amount.eq(item.amount),
                    ))
                    .execute(conn)
                    .map_err(|e| map_diesel_error(e, ErrorContext::item("update_item", &name)))?;

            if affected == 0 {
                return Err(RepositoryError::not_found_with_context(
                    "Item not found",
                    ErrorContext::item("update_item", &name),
                ));
            }
            Ok(item)
        })
        .await
    }

    async fn delete_item(&self, name: &str) -> RepositoryResult<()> {
        let name = name.to_string();
        self.with_conn("delete_item", move |conn| {
            let affected =
                diesel::delete(shopping_items::table.filter(shopping_items::name.eq(&name)))
                    .execute(conn)
                    .map_err(|e| map_diesel_error(e, ErrorContext::item("delete_item", &name)))?;

            if affected == 0 {
                return Err(RepositoryError::not_found_with_context(
                    "Item not found",
                    ErrorContext::item("delete_item", &name),
                ));
            }
            Ok(())
        })
        .await
    }
}
