//! Shared application state.

use std::sync::Arc;

use crate::{
    config::Config,
    db::DbPool,
    services::code_generator::BatchRequest,
    store::postgres::PgCodeStore,
};

/// State passed to every handler via axum `State`.
///
/// Built once in `main` before the server starts accepting requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn code_store(&self) -> PgCodeStore {
        PgCodeStore::new(self.pool.clone())
    }

    /// Batch size and validity window for operator-triggered generation.
    pub fn batch_request(&self) -> BatchRequest {
        BatchRequest {
            count: self.config.code_batch_size,
            ttl: self.config.code_ttl(),
        }
    }
}
