use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use copilot_common::encode_json_array;
use serde::Deserialize;

use crate::{response::AppError, GlobalState};

pub fn copilot_routes() -> Router<GlobalState> {
    Router::new()
        .route("/copilot",
            get(copilot)
        )
}

#[derive(Debug, Deserialize)]
pub struct CopilotQuery { pub question: String }

/// Streams the answer as a JSON array of strings. Failures before the first
/// fragment become an error response; later ones cut the body short.
async fn copilot(
    State(state): State<GlobalState>,
    Query(query): Query<CopilotQuery>,
) -> Result<Response, AppError> {
    tracing::debug!("[copilot] Question: {:?}", query.question);

    let fragments = state.copilot.answer(&query.question).await
        .map_err(AppError::upstream)?;

    let body = Body::from_stream(encode_json_array(fragments));
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
        ],
        body
    ).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use axum::http::{Request, StatusCode};
    use copilot_runtime::{Copilot, EchoCopilot, FragmentStream};
    use futures::{stream, StreamExt};
    use tower::ServiceExt;

    use super::*;

    struct FailingCopilot;

    #[async_trait::async_trait]
    impl Copilot for FailingCopilot {
        async fn answer(&self, _question: &str) -> Result<FragmentStream> {
            Err(anyhow!("embedding provider unavailable"))
        }
    }

    struct BrokenStreamCopilot;

    #[async_trait::async_trait]
    impl Copilot for BrokenStreamCopilot {
        async fn answer(&self, _question: &str) -> Result<FragmentStream> {
            Ok(stream::iter(vec![Ok("partial ".to_string()), Err(anyhow!("completion dropped"))]).boxed())
        }
    }

    fn app(copilot: Arc<dyn Copilot>) -> Router {
        copilot_routes().with_state(GlobalState::new(copilot))
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_streams_json_array_in_order() {
        let app = app(Arc::new(EchoCopilot::new(Duration::from_millis(10))));
        let response = send_get(app, "/copilot?question=hello%20world").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let fragments: Vec<String> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(fragments, vec!["hello ", "world "]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_question_is_accepted() {
        let app = app(Arc::new(EchoCopilot::default()));
        let response = send_get(app, "/copilot?question=").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn test_missing_question_is_rejected() {
        let response = send_get(app(Arc::new(EchoCopilot::default())), "/copilot").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_sends_no_fragments() {
        let response = send_get(app(Arc::new(FailingCopilot)), "/copilot?question=anything").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.is_object());
        assert!(body["message"].as_str().unwrap().contains("embedding provider unavailable"));
    }

    #[tokio::test]
    async fn test_midstream_failure_truncates_body() {
        let response = send_get(app(Arc::new(BrokenStreamCopilot)), "/copilot?question=x").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(axum::body::to_bytes(response.into_body(), usize::MAX).await.is_err());
    }
}
