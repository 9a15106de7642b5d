//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use recipe_store::{InMemoryRecipeStore, RecipeStore};
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const EPSILON: f64 = 1e-9;

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> Router {
    setup_with_store().0
}

fn setup_with_store() -> (Router, InMemoryRecipeStore) {
    let store = InMemoryRecipeStore::new();
    let state = api::create_default_state(store.clone());
    (api::create_app(state, get_metrics_handle()), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_recipe(app: &Router, name: &str) -> Value {
    let (status, json) = send(app, "POST", "/recipe", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    json["recipe"].clone()
}

async fn add_ingredient(app: &Router, recipe_id: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", &format!("/recipe/{recipe_id}"), Some(body)).await
}

fn assert_close(actual: &Value, expected: f64) {
    let actual = actual.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_ping() {
    let app = setup();

    let response = app
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"pong");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    create_recipe(&app, "Metered").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn test_create_recipe() {
    let app = setup();

    let recipe = create_recipe(&app, "Cake").await;

    assert_eq!(recipe["name"], "Cake");
    assert_close(&recipe["total"], 0.0);
    assert!(recipe["id"].as_str().is_some());
    assert!(recipe.get("ingredients").is_none());
}

#[tokio::test]
async fn test_list_recipes_without_ingredients() {
    let app = setup();
    let cake = create_recipe(&app, "Cake").await;
    create_recipe(&app, "Bread").await;
    add_ingredient(
        &app,
        cake["id"].as_str().unwrap(),
        json!({ "name": "Flour", "quantity": 2, "pricePerKg": 3 }),
    )
    .await;

    let (status, json) = send(&app, "GET", "/recipe", None).await;

    assert_eq!(status, StatusCode::OK);
    let recipes = json["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 2);
    assert!(recipes.iter().all(|r| r.get("ingredients").is_none()));
    let names: Vec<&str> = recipes.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"Cake"));
    assert!(names.contains(&"Bread"));
}

#[tokio::test]
async fn test_list_recipes_empty() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/recipe", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "recipes": [] }));
}

#[tokio::test]
async fn test_get_recipe_with_ingredients() {
    let app = setup();
    let recipe = create_recipe(&app, "Cake").await;
    let id = recipe["id"].as_str().unwrap();

    let (status, json) = send(&app, "GET", &format!("/recipe/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id);
    assert_eq!(json["ingredients"], json!([]));
}

#[tokio::test]
async fn test_cake_example_total() {
    let app = setup();
    let recipe = create_recipe(&app, "Cake").await;
    let id = recipe["id"].as_str().unwrap();

    let (status, json) = add_ingredient(
        &app,
        id,
        json!({ "name": "Flour", "quantity": 2, "pricePerKg": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let updated = &json["recipe"];
    assert_close(&updated["total"], 6.0);

    let flour = &updated["ingredients"][0];
    assert_eq!(flour["name"], "Flour");
    assert_eq!(flour["recipeId"], id);
    assert_close(&flour["quantity"], 2.0);
    assert_close(&flour["pricePerKg"], 3.0);

    let flour_id = flour["id"].as_str().unwrap();
    let (status, json) = send(
        &app,
        "DELETE",
        &format!("/recipe/{id}/ingredient/{flour_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_close(&json["recipe"]["total"], 0.0);
    assert_eq!(json["recipe"]["ingredients"], json!([]));
}

#[tokio::test]
async fn test_total_accumulates_and_accepts_numeric_strings() {
    let app = setup();
    let recipe = create_recipe(&app, "Stew").await;
    let id = recipe["id"].as_str().unwrap();

    add_ingredient(
        &app,
        id,
        json!({ "name": "Beef", "quantity": 0.5, "pricePerKg": 12.4 }),
    )
    .await;
    let (status, json) = add_ingredient(
        &app,
        id,
        json!({ "name": "Carrot", "quantity": "1.25", "pricePerKg": " 2 " }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_close(&json["recipe"]["total"], 0.5 * 12.4 + 1.25 * 2.0);
    assert_eq!(json["recipe"]["ingredients"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_recipe_removes_ingredients() {
    let (app, store) = setup_with_store();
    let recipe = create_recipe(&app, "Cake").await;
    let id = recipe["id"].as_str().unwrap();
    add_ingredient(
        &app,
        id,
        json!({ "name": "Flour", "quantity": 1, "pricePerKg": 1 }),
    )
    .await;

    let (status, json) = send(&app, "DELETE", &format!("/recipe/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "deletedRecipe": "Cake" }));
    assert_eq!(store.ingredient_count().await, 0);
    assert!(store.list_recipes().await.unwrap().is_empty());

    let (status, _) = send(&app, "GET", &format!("/recipe/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn duplicate_recipe_name_is_400() {
        let (app, store) = setup_with_store();
        create_recipe(&app, "Cake").await;

        let (status, json) = send(&app, "POST", "/recipe", Some(json!({ "name": "Cake" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Couldn't create recipe. The name 'Cake' is already being used."
        );
        assert_eq!(store.recipe_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_ingredient_name_is_400() {
        let app = setup();
        let recipe = create_recipe(&app, "Cake").await;
        let id = recipe["id"].as_str().unwrap();
        let flour = json!({ "name": "Flour", "quantity": 2, "pricePerKg": 3 });
        add_ingredient(&app, id, flour.clone()).await;

        let (status, _) = add_ingredient(&app, id, flour).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, json) = send(&app, "GET", &format!("/recipe/{id}"), None).await;
        assert_close(&json["total"], 6.0);
    }

    #[tokio::test]
    async fn cost_overflow_is_400_and_leaves_recipe_untouched() {
        let (app, store) = setup_with_store();
        let recipe = create_recipe(&app, "Cake").await;
        let id = recipe["id"].as_str().unwrap();
        add_ingredient(
            &app,
            id,
            json!({ "name": "Flour", "quantity": 2, "pricePerKg": 3 }),
        )
        .await;

        let (status, json) = add_ingredient(
            &app,
            id,
            json!({ "name": "Huge", "quantity": 1e200, "pricePerKg": 1e200 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("total"));
        assert_eq!(store.ingredient_count().await, 1);

        let (_, json) = send(&app, "GET", &format!("/recipe/{id}"), None).await;
        assert_close(&json["total"], 6.0);
        assert_eq!(json["ingredients"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn total_overflow_across_ingredients_is_400() {
        let app = setup();
        let recipe = create_recipe(&app, "Gold Leaf Cake").await;
        let id = recipe["id"].as_str().unwrap();

        let (status, json) = add_ingredient(
            &app,
            id,
            json!({ "name": "Gold", "quantity": 1e154, "pricePerKg": 1e154 }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let total_before = json["recipe"]["total"].as_f64().unwrap();
        assert!(total_before.is_finite());

        let (status, _) = add_ingredient(
            &app,
            id,
            json!({ "name": "More Gold", "quantity": 1e154, "pricePerKg": 1e154 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, json) = send(&app, "GET", &format!("/recipe/{id}"), None).await;
        assert_eq!(json["total"].as_f64(), Some(total_before));
    }

    #[tokio::test]
    async fn unknown_recipe_is_404() {
        let app = setup();
        let id = common::RecipeId::new();

        let (status, json) = send(&app, "GET", &format!("/recipe/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], format!("Couldn't find recipe {id}."));

        let (status, _) = send(&app, "DELETE", &format!("/recipe/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = add_ingredient(
            &app,
            &id.to_string(),
            json!({ "name": "Flour", "quantity": 1, "pricePerKg": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_ingredient_is_404() {
        let app = setup();
        let recipe = create_recipe(&app, "Cake").await;
        let id = recipe["id"].as_str().unwrap();
        let missing = common::IngredientId::new();

        let (status, json) = send(
            &app,
            "DELETE",
            &format!("/recipe/{id}/ingredient/{missing}"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["message"].as_str().unwrap().contains("Couldn't find ingredient"));
    }

    #[tokio::test]
    async fn malformed_ids_are_400() {
        let app = setup();

        let (status, json) = send(&app, "GET", "/recipe/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Invalid data: recipeId must be a valid UUID");

        let recipe = create_recipe(&app, "Cake").await;
        let id = recipe["id"].as_str().unwrap();
        let (status, json) = send(&app, "DELETE", &format!("/recipe/{id}/ingredient/123"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Invalid data: ingredientId must be a valid UUID"
        );
    }

    #[tokio::test]
    async fn invalid_recipe_names_are_400() {
        let app = setup();

        let (status, _) = send(&app, "POST", "/recipe", Some(json!({ "name": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let long = "x".repeat(81);
        let (status, json) = send(&app, "POST", "/recipe", Some(json!({ "name": long }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Invalid data: recipe name must be at most 80 characters"
        );

        let (status, json) = send(&app, "POST", "/recipe", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().starts_with("Invalid data"));
    }

    #[tokio::test]
    async fn invalid_ingredient_bodies_are_400() {
        let (app, store) = setup_with_store();
        let recipe = create_recipe(&app, "Cake").await;
        let id = recipe["id"].as_str().unwrap();

        let bodies = [
            json!({ "name": "Flour", "quantity": 0, "pricePerKg": 3 }),
            json!({ "name": "Flour", "quantity": -1, "pricePerKg": 3 }),
            json!({ "name": "Flour", "quantity": 2, "pricePerKg": "cheap" }),
            json!({ "name": "Flour", "quantity": true, "pricePerKg": 3 }),
            json!({ "name": "", "quantity": 2, "pricePerKg": 3 }),
            json!({ "name": "x".repeat(51), "quantity": 2, "pricePerKg": 3 }),
            json!({ "quantity": 2, "pricePerKg": 3 }),
        ];
        for body in bodies {
            let (status, json) = add_ingredient(&app, id, body.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert!(json["message"].as_str().unwrap().starts_with("Invalid data"));
        }

        assert_eq!(store.ingredient_count().await, 0);
    }

    #[tokio::test]
    async fn body_that_is_not_json_is_400() {
        let app = setup();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/recipe")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_404_json() {
        let app = setup();

        let (status, json) = send(&app, "GET", "/nope", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Route not found");
    }
}
