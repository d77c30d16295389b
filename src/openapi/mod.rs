use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Catalog API",
        version = "1.0.0",
        description = r#"
# Storefront Catalog API

Product catalog backend for an e-commerce storefront.

## Features

- **Product Listing**: filter by brand, price ceiling, gender, discount range, occasion and category
- **Product Management**: create, update and delete products with their category links
- **Lookups**: brands, categories and batch id-to-name resolution

## Listing parameters

All listing parameters are optional strings:
- `page`: page number (default: 1)
- `pageSize`: items per page (default: 20, capped by configuration)
- `sortBy`: `column-direction`, e.g. `price-desc` (unknown keys sort by `id-asc`)
- `brand`, `category`: comma-separated ids
- `priceRangeTo`: inclusive price ceiling (default: 2000)
- `gender`: `men`, `women`, `boy` or `girl`
- `discount`: inclusive range `lo-hi`
- `occasion`: comma-separated tags

## Error Handling

Errors share one body format:

```json
{
  "error": "Bad Request",
  "message": "Invalid input: invalid discount range '6'",
  "request_id": "6f1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product listing and management endpoints"),
        (name = "Brands", description = "Brand lookup endpoints"),
        (name = "Categories", description = "Category lookup endpoints")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::get_product_categories,
        crate::handlers::products::get_all_product_categories,

        // Lookups
        crate::handlers::brands::list_brands,
        crate::handlers::brands::map_brand_ids_to_names,
        crate::handlers::categories::list_categories,
    ),
    components(
        schemas(
            crate::handlers::products::ProductRequest,
            crate::handlers::products::ProductResponse,
            crate::handlers::products::ProductListResponse,
            crate::handlers::products::ProductCategoryNames,
            crate::handlers::brands::BrandResponse,
            crate::handlers::brands::BrandName,
            crate::handlers::categories::CategoryResponse,
            crate::entities::product::Gender,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
