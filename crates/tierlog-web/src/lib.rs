//! tierlog admin endpoint
//!
//! Serves `/log/level` for reading and changing a logger's threshold while
//! the process runs.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tierlog_core::{Severity, Threshold};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Body of a successful request
#[derive(Debug, Serialize)]
pub struct LevelResponse {
    pub level: Severity,
}

/// Body of a level change
#[derive(Debug, Deserialize)]
pub struct LevelRequest {
    pub level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    InvalidLevel(#[from] tierlog_core::Error),
}

impl IntoResponse for LevelError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl From<JsonRejection> for LevelError {
    fn from(rejection: JsonRejection) -> Self {
        LevelError::InvalidBody(rejection.body_text())
    }
}

/// Router serving `GET` and `PUT` on `/log/level`
pub fn level_router(threshold: Threshold) -> Router {
    Router::new()
        .route("/log/level", get(get_level).put(put_level))
        .with_state(threshold)
}

/// Serve the level endpoint on `bind_addr` until the process ends
pub async fn serve(bind_addr: &str, threshold: Threshold) -> std::io::Result<()> {
    serve_until(bind_addr, threshold, std::future::pending()).await
}

/// Serve the level endpoint until `shutdown` completes
pub async fn serve_until<F>(bind_addr: &str, threshold: Threshold, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = level_router(threshold).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Serving log level endpoint on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn get_level(State(threshold): State<Threshold>) -> Json<LevelResponse> {
    Json(LevelResponse {
        level: threshold.level(),
    })
}

async fn put_level(
    State(threshold): State<Threshold>,
    payload: Result<Json<LevelRequest>, JsonRejection>,
) -> Result<Json<LevelResponse>, LevelError> {
    let Json(request) = payload?;
    let level: Severity = request.level.parse()?;

    let previous = threshold.level();
    threshold.set_level(level);
    info!("Log level changed from {} to {}", previous, level);

    Ok(Json(LevelResponse { level }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    async fn call(router: Router, method: Method, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri("/log/level");
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = router.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_get_reports_current_level() {
        let threshold = Threshold::new(Severity::Warn);
        let (status, body) = call(level_router(threshold), Method::GET, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "level": "warn" }));
    }

    #[tokio::test]
    async fn test_put_changes_shared_threshold() {
        let threshold = Threshold::new(Severity::Info);
        let router = level_router(threshold.clone());

        let (status, body) = call(router.clone(), Method::PUT, Some(r#"{"level":"ERROR"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"], "error");
        assert_eq!(threshold.level(), Severity::Error);

        let (_, body) = call(router, Method::GET, None).await;
        assert_eq!(body["level"], "error");
    }

    #[tokio::test]
    async fn test_put_unknown_level_is_rejected() {
        let threshold = Threshold::new(Severity::Info);
        let (status, body) = call(
            level_router(threshold.clone()),
            Method::PUT,
            Some(r#"{"level":"verbose"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("verbose"));
        assert_eq!(threshold.level(), Severity::Info);
    }

    #[tokio::test]
    async fn test_put_malformed_body_is_rejected() {
        let threshold = Threshold::new(Severity::Info);
        let (status, body) = call(level_router(threshold), Method::PUT, Some("level=debug")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_other_methods_not_allowed() {
        let threshold = Threshold::new(Severity::Info);
        let (status, _) = call(level_router(threshold), Method::DELETE, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_serve_until_shutdown() {
        let threshold = Threshold::new(Severity::Info);
        let result = serve_until("127.0.0.1:0", threshold, async {}).await;
        assert!(result.is_ok());
    }
}
