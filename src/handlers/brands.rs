use crate::entities::brand;
use crate::handlers::common::{map_service_error, success_response, IdsQuery};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn brands_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands))
        .route("/names", get(map_brand_ids_to_names))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BrandResponse {
    pub id: i32,
    pub name: String,
}

impl From<brand::Model> for BrandResponse {
    fn from(model: brand::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// A requested brand id and its name, absent when the id is unknown
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BrandName {
    pub id: i32,
    pub name: Option<String>,
}

/// List every brand
#[utoipa::path(
    get,
    path = "/api/v1/brands",
    responses(
        (status = 200, description = "Brands retrieved", body = crate::ApiResponse<Vec<BrandResponse>>)
    ),
    tag = "Brands"
)]
pub async fn list_brands(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let brands = state
        .services
        .lookup
        .list_brands()
        .await
        .map_err(map_service_error)?;

    let brands: Vec<BrandResponse> = brands.into_iter().map(Into::into).collect();
    Ok(success_response(brands))
}

/// Resolve brand ids to names
#[utoipa::path(
    get,
    path = "/api/v1/brands/names",
    params(IdsQuery),
    responses(
        (status = 200, description = "Names per requested id", body = crate::ApiResponse<Vec<BrandName>>),
        (status = 400, description = "Malformed id list", body = crate::errors::ErrorResponse)
    ),
    tag = "Brands"
)]
pub async fn map_brand_ids_to_names(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let ids = query.parse("brand")?;

    let names = state
        .services
        .lookup
        .map_brand_ids_to_names(&ids)
        .await
        .map_err(map_service_error)?;

    let names: Vec<BrandName> = names
        .into_iter()
        .map(|(id, name)| BrandName { id, name })
        .collect();
    Ok(success_response(names))
}
