mod common;

use axum::http::{Method, StatusCode};
use common::{product_input, TestApp};
use serde_json::json;

#[tokio::test]
async fn brands_and_categories_are_listed_by_name() {
    let app = TestApp::new().await;
    let zara = app.seed_brand("Zara").await;
    let acme = app.seed_brand("Acme").await;
    let tops = app.seed_category("Tops").await;
    let bags = app.seed_category("Bags").await;

    let (status, brands) = app.json(Method::GET, "/api/v1/brands", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        brands["data"],
        json!([
            { "id": acme.id, "name": "Acme" },
            { "id": zara.id, "name": "Zara" }
        ])
    );

    let (status, categories) = app.json(Method::GET, "/api/v1/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        categories["data"],
        json!([
            { "id": bags.id, "name": "Bags" },
            { "id": tops.id, "name": "Tops" }
        ])
    );
}

#[tokio::test]
async fn brand_names_resolve_known_and_unknown_ids() {
    let app = TestApp::new().await;
    let acme = app.seed_brand("Acme").await;
    let zara = app.seed_brand("Zara").await;

    let (status, body) = app
        .json(
            Method::GET,
            &format!("/api/v1/brands/names?ids={},999,{}", zara.id, acme.id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = vec![
        json!({ "id": acme.id, "name": "Acme" }),
        json!({ "id": zara.id, "name": "Zara" }),
        json!({ "id": 999, "name": null }),
    ];
    expected.sort_by_key(|entry| entry["id"].as_i64());
    assert_eq!(body["data"], json!(expected));

    let (status, empty) = app.json(Method::GET, "/api/v1/brands/names", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["data"], json!([]));

    let (status, _) = app
        .json(Method::GET, "/api/v1/brands/names?ids=1,two", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn category_names_for_many_products() {
    let app = TestApp::new().await;
    let tops = app.seed_category("Tops").await;
    let sale = app.seed_category("Sale").await;

    let mut tee = product_input("tee", 20, 0);
    tee.categories = vec![tops.id, sale.id];
    let tee = app.seed_product(tee).await;
    let bare = app.seed_product(product_input("bare", 20, 0)).await;

    let service_view = app
        .state
        .services
        .lookup
        .get_all_product_categories(&[tee.id, bare.id, 777])
        .await
        .unwrap();
    assert_eq!(service_view[&tee.id], vec!["Sale", "Tops"]);
    assert!(service_view[&bare.id].is_empty());
    assert!(service_view[&777].is_empty());

    let (status, body) = app
        .json(
            Method::GET,
            &format!("/api/v1/products/categories?ids={},{}", bare.id, tee.id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "product_id": bare.id, "categories": [] },
            { "product_id": tee.id, "categories": ["Sale", "Tops"] }
        ])
    );
}

#[tokio::test]
async fn health_and_request_ids() {
    let app = TestApp::new().await;

    let (status, health) = app.json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "up");

    let (status, ready) = app.json(Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["ready"], true);
    assert_eq!(ready["checks"]["database"], "up");

    let response = app.request(Method::GET, "/api/v1/brands", None).await;
    let header = response
        .headers()
        .get(storefront_catalog::middleware_helpers::REQUEST_ID_HEADER)
        .expect("request id header")
        .to_str()
        .unwrap()
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["meta"]["request_id"], header.as_str());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, doc) = app.json(Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/products"].is_object());
}
