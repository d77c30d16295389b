pub mod brands;
pub mod categories;
pub mod common;
pub mod products;

use crate::db::DbPool;
use crate::services::{LookupService, ProductCatalogService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub product_catalog: Arc<ProductCatalogService>,
    pub lookup: Arc<LookupService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            product_catalog: Arc::new(ProductCatalogService::new(db_pool.clone())),
            lookup: Arc::new(LookupService::new(db_pool)),
        }
    }
}
