//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db::Store;
use crate::services::invoice::{HtmlInvoiceGenerator, InvoiceGenerator};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the configuration, the
/// data store, and the invoice generator.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    store: Store,
    invoices: HtmlInvoiceGenerator,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let invoices = HtmlInvoiceGenerator::new(config.invoice_dir.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: Store::new(pool),
                invoices,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the data store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        self.inner.store.pool()
    }

    /// Get the invoice generator.
    #[must_use]
    pub fn invoices(&self) -> &dyn InvoiceGenerator {
        &self.inner.invoices
    }
}
