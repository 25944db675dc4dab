use axum::{
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, objects};
use crate::AppState;

/// Build the service router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/objects/:bucket/*key",
            get(objects::download_object).put(objects::upload_object),
        )
        .route("/files/:bucket/:name", get(objects::download_by_name))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{memory::MemoryStore, ObjectAccessor, ObjectStore};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(store: Arc<MemoryStore>) -> Router {
        let store: Arc<dyn ObjectStore> = store;
        router(AppState {
            accessor: Arc::new(ObjectAccessor::new(store)),
        })
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Storage Service is healthy");
    }

    #[tokio::test]
    async fn test_upload_stores_body() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/objects/uploads/reports/q1.csv")
                    .body(Body::from("a,b\n1,2\n"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(created["key"], "reports/q1.csv");
        assert_eq!(created["size"], 8);
        assert_eq!(
            store.object("uploads", "reports/q1.csv").await.as_deref(),
            Some(&b"a,b\n1,2\n"[..])
        );
    }

    #[tokio::test]
    async fn test_download_uses_requested_name() {
        let store =
            Arc::new(MemoryStore::with_objects("uploads", &[("a1b2c3.bin", &b"payload"[..])]).await);
        let app = app_with(store);

        let response = app
            .oneshot(
                Request::get("/objects/uploads/a1b2c3.bin?name=contract.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"contract.pdf\""
        );
        assert_eq!(body_string(response).await, "payload");
    }

    #[tokio::test]
    async fn test_download_with_unencodable_name_is_bad_request() {
        let store =
            Arc::new(MemoryStore::with_objects("uploads", &[("a1b2c3.bin", &b"payload"[..])]).await);
        let app = app_with(store);

        let response = app
            .oneshot(
                Request::get("/objects/uploads/a1b2c3.bin?name=a%0Ab")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_download_missing_object() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(
                Request::get("/objects/uploads/nothing.bin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_string(response).await.contains("payload"));
    }

    #[tokio::test]
    async fn test_download_by_logical_name() {
        let store = Arc::new(
            MemoryStore::with_objects(
                "invoices",
                &[("invoice.pdf", &b"%PDF"[..]), ("report.csv", &b"x"[..])],
            )
            .await,
        );
        let app = app_with(store);

        let response = app
            .oneshot(Request::get("/files/invoices/invoice").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"invoice.pdf\""
        );
        assert_eq!(body_string(response).await, "%PDF");
    }

    #[tokio::test]
    async fn test_download_by_unknown_name_is_not_found() {
        let store =
            Arc::new(MemoryStore::with_objects("invoices", &[("invoice123.pdf", &b"%PDF"[..])]).await);
        let app = app_with(store);

        let response = app
            .oneshot(Request::get("/files/invoices/invoice").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
