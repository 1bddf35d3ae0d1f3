//! Integration tests for cuisine, allergen and ingredient endpoints

mod common;

use axum::http::StatusCode;
use common::{recipe_body, unique, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_lookup_crud() {
    let app = TestApp::new().await;
    let author = app.register_author().await;

    for collection in ["cuisines", "allergens", "ingredients"] {
        let name = unique(collection);
        let (status, created) = app
            .post(&format!("/api/v1/{}", collection), &author.token, json!({"name": name}))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();
        let path = format!("/api/v1/{}/{}", collection, id);

        let (status, fetched) = app.get(&path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], name.as_str());

        let renamed = unique(collection);
        let (status, updated) = app
            .put(&path, &author.token, json!({"name": renamed}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], renamed.as_str());

        let (status, listed) = app.get(&format!("/api/v1/{}", collection)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(listed
            .as_array()
            .unwrap()
            .iter()
            .any(|item| item["id"] == id));

        let (status, _) = app.delete(&path, &author.token).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.get(&path).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_name_is_conflict() {
    let app = TestApp::new().await;
    let author = app.register_author().await;
    let name = unique("cuisine");

    let (status, _) = app
        .post("/api/v1/cuisines", &author.token, json!({"name": name}))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post("/api/v1/cuisines", &author.token, json!({"name": name}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_blank_name_is_rejected() {
    let app = TestApp::new().await;
    let author = app.register_author().await;

    let (status, _) = app
        .post("/api/v1/allergens", &author.token, json!({"name": "  "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_referenced_rows_cannot_be_deleted() {
    let app = TestApp::new().await;
    let author = app.register_author().await;
    let cuisine = app.create_lookup("cuisines", &author.token).await;
    let allergen = app.create_lookup("allergens", &author.token).await;
    let ingredient = app.create_lookup("ingredients", &author.token).await;

    let mut body = recipe_body("Referencing", cuisine);
    body["allergenIds"] = json!([allergen]);
    body["ingredients"] = json!([{"ingredientId": ingredient, "quantity": 1, "measurement": "GRAMS"}]);
    app.create_recipe(&author.token, body).await;

    for (collection, id) in [
        ("cuisines", cuisine),
        ("allergens", allergen),
        ("ingredients", ingredient),
    ] {
        let path = format!("/api/v1/{}/{}", collection, id);
        let (status, _) = app.delete(&path, &author.token).await;
        assert_eq!(status, StatusCode::CONFLICT, "{} should be protected", collection);

        let (status, _) = app.get(&path).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_missing_row_is_not_found() {
    let app = TestApp::new().await;
    let author = app.register_author().await;
    let path = format!("/api/v1/ingredients/{}", i32::MAX);

    let (status, _) = app.delete(&path, &author.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .put(&path, &author.token, json!({"name": unique("x")}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
