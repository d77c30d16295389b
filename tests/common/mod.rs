#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, NotSet, Set};
use serde_json::Value;
use storefront_catalog::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::{brand, category, comment, product, review},
    services::ProductInput,
    AppState,
};
use tower::ServiceExt;

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "development".to_string(),
        );

        let pool = db::establish_connection_with_config(&DbConfig::in_memory_sqlite())
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = storefront_catalog::app_router(state.clone()).expect("test router");

        Self { router, state }
    }

    /// Send a request against the full router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends a request and decodes the JSON body (`Value::Null` when empty).
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        decode(response).await
    }

    /// Sends `body` verbatim as `application/json` and decodes the reply.
    pub async fn raw_json(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");
        decode(response).await
    }

    pub async fn seed_brand(&self, name: &str) -> brand::Model {
        brand::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed brand")
    }

    pub async fn seed_category(&self, name: &str) -> category::Model {
        category::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed category")
    }

    pub async fn seed_product(&self, input: ProductInput) -> product::Model {
        self.state
            .services
            .product_catalog
            .save_product(input)
            .await
            .expect("seed product")
    }

    pub async fn seed_review(&self, product_id: i32) -> review::Model {
        review::ActiveModel {
            id: NotSet,
            product_id: Set(product_id),
            rating: Set(4),
            body: Set("Fits well".to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed review")
    }

    pub async fn seed_comment(&self, product_id: i32) -> comment::Model {
        comment::ActiveModel {
            id: NotSet,
            product_id: Set(product_id),
            body: Set("Does it run small?".to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed comment")
    }
}

/// A valid product with no brands, occasions or categories.
pub fn product_input(name: &str, old_price: i64, discount: i32) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: format!("{name} description"),
        old_price: Decimal::from(old_price),
        discount,
        rating: 4,
        colors: vec!["black".to_string()],
        gender: product::Gender::Women,
        image_url: None,
        brands: Vec::new(),
        occasion: Vec::new(),
        categories: Vec::new(),
    }
}

/// Names of the products in a listing response, in order.
pub fn listed_names(body: &Value) -> Vec<String> {
    body["data"]["products"]
        .as_array()
        .expect("products array")
        .iter()
        .map(|p| p["name"].as_str().expect("product name").to_string())
        .collect()
}

async fn decode(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&bytes).expect("response body is json");
    (status, value)
}
