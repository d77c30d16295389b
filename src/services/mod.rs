pub mod lookup_service;
pub mod product_catalog_service;
pub mod product_filter;

pub use lookup_service::LookupService;
pub use product_catalog_service::{ProductCatalogService, ProductInput};
pub use product_filter::{ProductFilter, ProductFilterParams, SortSpec};
