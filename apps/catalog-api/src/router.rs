//! # Router
//!
//! Routes are built per resource type by [`resource_routes`], so exposing a
//! new entity is one `merge` call with explicit type parameterization.

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use catalog_core::Product;

use crate::handlers::{self, Resource};
use crate::AppState;

/// The five CRUD routes for one resource type.
pub fn resource_routes<T: Resource>() -> Router<AppState> {
    let item_path = format!("{}/{{id}}", T::PATH);

    Router::new()
        .route(
            T::PATH,
            get(handlers::list::<T>).post(handlers::create::<T>),
        )
        .route(
            &item_path,
            get(handlers::get_one::<T>)
                .put(handlers::update::<T>)
                .delete(handlers::delete::<T>),
        )
}

/// The full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(resource_routes::<Product>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// HTTP Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use catalog_db::{Database, DbConfig, Repository};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn setup_app() -> (Router, AppState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db);
        (build_router(state.clone()), state)
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_product(app: &Router, name: &str, price: f64) -> Value {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products",
                &json!({ "name": name, "price": price }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_end_to_end_create_get_delete() {
        let (app, _) = setup_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products",
                &json!({ "name": "A", "price": 1.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let created = body_json(response).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(location, format!("/api/products/{}", id));

        let response = app.clone().oneshot(empty_request("GET", &location)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["name"], "A");
        assert_eq!(fetched["price"], 1.0);

        let response = app.clone().oneshot(empty_request("DELETE", &location)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.clone().oneshot(empty_request("GET", &location)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_post_ignores_body_id() {
        let (app, _) = setup_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products",
                &json!({ "id": 99, "name": "A", "price": 1.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/products/1"
        );
        assert_eq!(body_json(response).await["id"], 1);

        let response = app
            .oneshot(empty_request("GET", "/api/products/99"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_returns_everything() {
        let (app, _) = setup_app().await;
        create_product(&app, "A", 1.0).await;
        create_product(&app, "B", 2.5).await;

        let response = app.oneshot(empty_request("GET", "/api/products")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let list = body_json(response).await;
        let names: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_get_and_delete_unknown_id_are_not_found() {
        let (app, _) = setup_app().await;

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/products/404"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(empty_request("DELETE", "/api/products/404"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_put_with_mismatched_ids_is_bad_request() {
        let (app, state) = setup_app().await;
        let created = create_product(&app, "A", 1.0).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/products/{}", id),
                &json!({ "id": id + 1, "name": "Changed", "price": 9.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

        // No mutation happened
        let ctx = state.db.context();
        let stored = ctx.set::<Product>().find(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "A");
    }

    #[tokio::test]
    async fn test_put_replaces_entity() {
        let (app, _) = setup_app().await;
        let created = create_product(&app, "A", 1.0).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/products/{}", id),
                &json!({ "id": id, "name": "B", "price": 2.25 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/products/{}", id)))
            .await
            .unwrap();
        let fetched = body_json(response).await;
        assert_eq!(fetched["name"], "B");
        assert_eq!(fetched["price"], 2.25);
        assert_eq!(fetched["createdAt"], created["createdAt"]);
    }

    #[tokio::test]
    async fn test_put_unknown_id_is_not_found() {
        let (app, _) = setup_app().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/products/77",
                &json!({ "id": 77, "name": "Ghost", "price": 1.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_payloads_are_rejected() {
        let (app, state) = setup_app().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products",
                &json!({ "name": "  ", "price": 1.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/products",
                &json!({ "name": "Negative", "price": -1.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/products", &json!({ "price": 1.0 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

        let response = app
            .oneshot(empty_request("GET", "/api/products/not-a-number"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let ctx = state.db.context();
        assert!(ctx.set::<Product>().all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, state) = setup_app().await;

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");

        state.db.close().await;
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
