mod common;

use axum::http::{Method, StatusCode};
use common::{product_input, TestApp};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use std::str::FromStr;
use storefront_catalog::entities::{comment, product, product_category, review};
use storefront_catalog::errors::ServiceError;

fn decimal(value: &serde_json::Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal string")).expect("valid decimal")
}

#[tokio::test]
async fn create_then_get_round_trips_fields() {
    let app = TestApp::new().await;
    let dresses = app.seed_category("Dresses").await;

    let (status, created) = app
        .json(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "  Summer Dress ",
                "description": "Light cotton",
                "old_price": "100",
                "discount": 10,
                "rating": 5,
                "colors": ["yellow", "white"],
                "gender": "women",
                "image_url": "https://cdn.example.com/dress.png",
                "brands": [7, 3, 7],
                "occasion": ["party", "beach"],
                "categories": [dresses.id]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["success"], true);
    let id = created["data"]["id"].as_i64().expect("id");

    let (status, fetched) = app
        .json(Method::GET, &format!("/api/v1/products/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &fetched["data"];
    assert_eq!(data["name"], "Summer Dress");
    assert_eq!(decimal(&data["price"]), Decimal::from(90));
    assert_eq!(decimal(&data["old_price"]), Decimal::from(100));
    assert_eq!(data["brands"], json!([3, 7]));
    assert_eq!(data["occasion"], json!(["party", "beach"]));
    assert_eq!(data["colors"], json!(["yellow", "white"]));
    assert_eq!(data["image_url"], "https://cdn.example.com/dress.png");

    let (_, categories) = app
        .json(Method::GET, &format!("/api/v1/products/{id}/categories"), None)
        .await;
    assert_eq!(categories["data"], json!([{ "id": dresses.id, "name": "Dresses" }]));
}

#[tokio::test]
async fn client_supplied_price_is_ignored() {
    let app = TestApp::new().await;
    let (status, created) = app
        .json(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Scarf",
                "old_price": "40",
                "discount": 50,
                "price": "1",
                "gender": "girl"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(decimal(&created["data"]["price"]), Decimal::from(20));
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = TestApp::new().await;
    let base = json!({
        "name": "Hat",
        "old_price": "25",
        "discount": 0,
        "gender": "boy"
    });

    let mut bad_discount = base.clone();
    bad_discount["discount"] = json!(101);
    let mut blank_name = base.clone();
    blank_name["name"] = json!("   ");
    let mut negative_price = base.clone();
    negative_price["old_price"] = json!("-5");
    let mut bad_tag = base.clone();
    bad_tag["occasion"] = json!(["50% off"]);
    let mut unknown_category = base.clone();
    unknown_category["categories"] = json!([404]);

    for payload in [bad_discount, blank_name, negative_price, bad_tag, unknown_category] {
        let (status, body) = app
            .json(Method::POST, "/api/v1/products", Some(payload.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload} -> {body}");
    }

    let count = product::Entity::find()
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 0, "rejected payloads must not leave rows behind");
}

#[tokio::test]
async fn update_replaces_fields_and_categories() {
    let app = TestApp::new().await;
    let shoes = app.seed_category("Shoes").await;
    let sale = app.seed_category("Sale").await;
    let boots = app.seed_category("Boots").await;

    let mut input = product_input("Ankle Boot", 200, 0);
    input.categories = vec![shoes.id, sale.id];
    let created = app.seed_product(input).await;

    let (status, updated) = app
        .json(
            Method::PUT,
            &format!("/api/v1/products/{}", created.id),
            Some(json!({
                "name": "Ankle Boot",
                "old_price": "200",
                "discount": 25,
                "gender": "women",
                "categories": [boots.id, shoes.id]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(decimal(&updated["data"]["price"]), Decimal::from(150));
    assert_eq!(updated["data"]["id"], created.id);

    let names: Vec<String> = app
        .state
        .services
        .lookup
        .get_product_categories(created.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Boots", "Shoes"]);
}

#[tokio::test]
async fn failed_update_leaves_product_untouched() {
    let app = TestApp::new().await;
    let shoes = app.seed_category("Shoes").await;
    let mut input = product_input("Loafer", 80, 0);
    input.categories = vec![shoes.id];
    let created = app.seed_product(input).await;

    let mut update = product_input("Renamed", 80, 10);
    update.categories = vec![shoes.id, 999];
    let err = app
        .state
        .services
        .product_catalog
        .update_product(created.id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let stored = app
        .state
        .services
        .product_catalog
        .get_product(created.id)
        .await
        .unwrap();
    assert_eq!(stored.name, "Loafer");
    let links = product_category::Entity::find()
        .filter(product_category::Column::ProductId.eq(created.id))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(links, 1);
}

#[tokio::test]
async fn delete_removes_product_and_dependents() {
    let app = TestApp::new().await;
    let shoes = app.seed_category("Shoes").await;
    let mut input = product_input("Sandal", 30, 0);
    input.categories = vec![shoes.id];
    let doomed = app.seed_product(input).await;
    let survivor = app.seed_product(product_input("Clog", 30, 0)).await;
    app.seed_review(doomed.id).await;
    app.seed_comment(doomed.id).await;
    app.seed_review(survivor.id).await;

    let response = app
        .request(Method::DELETE, &format!("/api/v1/products/{}", doomed.id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let db = &*app.state.db;
    assert!(product::Entity::find_by_id(doomed.id)
        .one(db)
        .await
        .unwrap()
        .is_none());
    let reviews = review::Entity::find().all(db).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].product_id, survivor.id);
    assert_eq!(comment::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(product_category::Entity::find().count(db).await.unwrap(), 0);

    let (status, _) = app
        .json(Method::GET, &format!("/api/v1/products/{}", doomed.id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_products_are_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::GET, "/api/v1/products/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found: Product 4242 not found");

    let (status, _) = app
        .json(
            Method::PUT,
            "/api/v1/products/4242",
            Some(json!({ "name": "Ghost", "old_price": "1", "gender": "men" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = app
        .request(Method::DELETE, "/api/v1/products/4242", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (status, _) = app
        .json(Method::GET, "/api/v1/products/4242/categories", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn assert_error_body(body: &serde_json::Value, code: &str) {
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["details"], code);
    assert!(body["message"].is_string());
    assert!(body["request_id"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unreadable_bodies_get_json_errors() {
    let app = TestApp::new().await;
    let product = app.seed_product(product_input("kept", 20, 0)).await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Odd", "old_price": "10", "gender": "unisex" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, "INVALID_BODY");

    let (status, body) = app
        .raw_json(Method::POST, "/api/v1/products", "{\"name\": \"Broken\"")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, "INVALID_BODY");

    let (status, body) = app
        .raw_json(
            Method::PUT,
            &format!("/api/v1/products/{}", product.id),
            "{\"name\": \"No price\", \"gender\": \"men\"}",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_body(&body, "INVALID_BODY");

    let stored = product::Entity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn non_numeric_ids_get_json_errors() {
    let app = TestApp::new().await;

    for (method, uri) in [
        (Method::GET, "/api/v1/products/abc"),
        (Method::DELETE, "/api/v1/products/abc"),
        (Method::GET, "/api/v1/products/1x/categories"),
    ] {
        let (status, body) = app.json(method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_error_body(&body, "INVALID_PATH");
    }
}
