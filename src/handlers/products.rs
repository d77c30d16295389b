use crate::db::{membership, Page, PageRequest};
use crate::entities::product::{self, Gender};
use crate::handlers::common::{
    created_response, map_service_error, no_content_response, parse_positive, success_response,
    ApiJson, ApiPath, IdsQuery,
};
use crate::{
    errors::ApiError,
    services::{ProductFilter, ProductFilterParams, ProductInput},
    AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

fn normalize_optional_string(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .and_then(|v| if v.is_empty() { None } else { Some(v) })
}

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/categories", get(get_all_product_categories))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/categories", get(get_product_categories))
}

/// List products with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Products retrieved", body = crate::ApiResponse<ProductListResponse>),
        (status = 400, description = "Malformed filter or pagination parameter", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page = parse_positive(query.page.as_deref(), "page", 1)?;
    let page_size = parse_positive(
        query.page_size.as_deref(),
        "pageSize",
        state.config.api_default_page_size,
    )?
    .min(state.config.api_max_page_size);
    let page = PageRequest::new(page, page_size).map_err(map_service_error)?;

    let filter = ProductFilter::parse(
        query.filter_params(),
        Decimal::from(state.config.default_price_ceiling),
    )
    .map_err(map_service_error)?;

    let products = state
        .services
        .product_catalog
        .list_products(&filter, page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductListResponse::from(products)))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = crate::ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ProductRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let input = ProductInput::from(payload);

    let product = state
        .services
        .product_catalog
        .save_product(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(ProductResponse::from(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product retrieved", body = crate::ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .product_catalog
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductResponse::from(product)))
}

/// Replace a product's fields and categories
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = crate::ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ProductRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let input = ProductInput::from(payload);

    let product = state
        .services
        .product_catalog
        .update_product(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductResponse::from(product)))
}

/// Delete a product with its category links, reviews and comments
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .product_catalog
        .delete_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Categories linked to a product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/categories",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Categories retrieved", body = crate::ApiResponse<Vec<crate::handlers::categories::CategoryResponse>>),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_product_categories(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .product_catalog
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    let categories = state
        .services
        .lookup
        .get_product_categories(id)
        .await
        .map_err(map_service_error)?;

    let categories: Vec<crate::handlers::categories::CategoryResponse> =
        categories.into_iter().map(Into::into).collect();
    Ok(success_response(categories))
}

/// Category names for several products at once
#[utoipa::path(
    get,
    path = "/api/v1/products/categories",
    params(IdsQuery),
    responses(
        (status = 200, description = "Category names per product", body = crate::ApiResponse<Vec<ProductCategoryNames>>),
        (status = 400, description = "Malformed id list", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn get_all_product_categories(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product_ids = query.parse("product")?;

    let mut by_product = state
        .services
        .lookup
        .get_all_product_categories(&product_ids)
        .await
        .map_err(map_service_error)?;

    let entries: Vec<ProductCategoryNames> = product_ids
        .into_iter()
        .map(|product_id| ProductCategoryNames {
            product_id,
            categories: by_product.remove(&product_id).unwrap_or_default(),
        })
        .collect();

    Ok(success_response(entries))
}

/// Listing query string. Every value arrives as text and is parsed server-side.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Items per page (default 20, capped by configuration)
    pub page_size: Option<String>,
    /// `column-direction`, e.g. `price-asc`, `created_at-desc`
    pub sort_by: Option<String>,
    /// Comma-separated brand ids
    pub brand: Option<String>,
    /// Inclusive price ceiling (default 2000)
    pub price_range_to: Option<String>,
    /// men, women, boy or girl
    pub gender: Option<String>,
    /// Inclusive discount range `lo-hi`, e.g. `6-10`
    pub discount: Option<String>,
    /// Comma-separated occasion tags
    pub occasion: Option<String>,
    /// Comma-separated category ids
    pub category: Option<String>,
}

impl ListProductsQuery {
    fn filter_params(&self) -> ProductFilterParams<'_> {
        ProductFilterParams {
            sort_by: self.sort_by.as_deref(),
            brand: self.brand.as_deref(),
            price_range_to: self.price_range_to.as_deref(),
            gender: self.gender.as_deref(),
            discount: self.discount.as_deref(),
            occasion: self.occasion.as_deref(),
            category: self.category.as_deref(),
        }
    }
}

/// Product payload for create and update. `price` is derived from
/// `old_price` and `discount` and cannot be supplied. Field rules are
/// enforced by the catalog service.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String, example = "120.00")]
    pub old_price: Decimal,
    #[serde(default)]
    pub discount: i32,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub colors: Vec<String>,
    pub gender: Gender,
    pub image_url: Option<String>,
    #[serde(default)]
    pub brands: Vec<i32>,
    #[serde(default)]
    pub occasion: Vec<String>,
    #[serde(default)]
    pub categories: Vec<i32>,
}

impl From<ProductRequest> for ProductInput {
    fn from(request: ProductRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            description: request.description,
            old_price: request.old_price,
            discount: request.discount,
            rating: request.rating,
            colors: request.colors,
            gender: request.gender,
            image_url: normalize_optional_string(request.image_url),
            brands: request.brands,
            occasion: request.occasion,
            categories: request.categories,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "108.00")]
    pub price: Decimal,
    #[schema(value_type = String, example = "120.00")]
    pub old_price: Decimal,
    pub discount: i32,
    pub rating: i32,
    pub colors: Vec<String>,
    pub gender: Gender,
    pub image_url: Option<String>,
    pub brands: Vec<i32>,
    pub occasion: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        let brands = membership::decode_ids(&model.brands).unwrap_or_else(|err| {
            warn!(product_id = model.id, error = %err, "Stored brand list is malformed");
            Vec::new()
        });

        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            old_price: model.old_price,
            discount: model.discount,
            rating: model.rating,
            colors: membership::decode_tags(&model.colors),
            gender: model.gender,
            image_url: model.image_url,
            brands,
            occasion: membership::decode_tags(&model.occasion),
            created_at: model.created_at,
        }
    }
}

/// One page of products plus the totals the pager needs
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    /// Total matches across all pages
    pub count: u64,
    pub last_page: u64,
    pub num_of_results_on_cur_page: u64,
    pub page: u64,
    pub page_size: u64,
}

impl From<Page<product::Model>> for ProductListResponse {
    fn from(page: Page<product::Model>) -> Self {
        let page = page.map(ProductResponse::from);
        Self {
            products: page.items,
            count: page.count,
            last_page: page.last_page,
            num_of_results_on_cur_page: page.num_of_results_on_cur_page,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductCategoryNames {
    pub product_id: i32,
    pub categories: Vec<String>,
}
