use crate::config::Config;
use crate::dispatch::{process_events, ReplyOutcome};
use crate::line::ReplyDelivery;
use crate::signature::verify_signature;
use crate::types::{ErrorResponse, HealthResponse, WebhookRequest};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared per-process state: configuration and the reply client, both
/// read-only across concurrent requests.
pub struct AppState {
    pub config: Config,
    pub client: Arc<dyn ReplyDelivery>,
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    status: &'static str,
    results: Vec<ReplyOutcome>,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/webhook", get(health_check).post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health payload. Reports whether the secrets are configured, never
/// their values. Also answers GET /webhook for the LINE console's
/// reachability check.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health_response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        channel_secret_configured: !state.config.channel_secret.is_empty(),
        channel_access_token_configured: !state.config.channel_access_token.is_empty(),
    };

    (StatusCode::OK, Json(health_response))
}

/// Webhook entry point: verify the signature against the raw body,
/// parse the event batch, dispatch concurrently, acknowledge. Any
/// authenticated delivery gets a success-range status regardless of
/// processing outcome, so the platform never redelivers the batch.
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("x-line-signature")
        .and_then(|h| h.to_str().ok());

    let signature_valid = signature
        .map(|sig| verify_signature(&body, sig, &state.config.channel_secret))
        .unwrap_or(false);

    if !signature_valid {
        error!("Invalid or missing webhook signature");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                message: "Unauthorized".to_string(),
                error: "invalid signature".to_string(),
            }),
        )
            .into_response();
    }

    let webhook_request: WebhookRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse webhook request: {}", e);
            return (StatusCode::OK, Json(json!({ "status": "error" }))).into_response();
        }
    };

    if webhook_request.events.is_empty() {
        return (StatusCode::OK, "OK").into_response();
    }

    info!("Processing {} webhook event(s)", webhook_request.events.len());

    let results = process_events(state.client.as_ref(), &webhook_request.events).await;

    (
        StatusCode::OK,
        Json(BatchResponse {
            status: "success",
            results,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReplyReceipt;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use base64::{engine::general_purpose, Engine as _};
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockDelivery {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReplyDelivery for MockDelivery {
        async fn reply(&self, reply_token: &str, _text: &str) -> Result<ReplyReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if reply_token.contains("fail") {
                return Err(anyhow!("delivery rejected"));
            }
            Ok(ReplyReceipt::default())
        }
    }

    fn test_state() -> (Arc<AppState>, Arc<MockDelivery>) {
        let client = Arc::new(MockDelivery {
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(AppState {
            config: Config {
                channel_secret: "test_channel_secret".to_string(),
                channel_access_token: "test_access_token".to_string(),
                port: 3000,
            },
            client: client.clone(),
        });
        (state, client)
    }

    fn sign(body: &[u8], secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }

    fn signed_headers(body: &[u8], secret: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-line-signature", sign(body, secret).parse().unwrap());
        headers
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthenticated_request_is_rejected_without_dispatch() {
        let (state, client) = test_state();
        let body = Bytes::from(r#"{"events":[{"type":"message","replyToken":"t","message":{"type":"text","text":"hi"}}]}"#);

        // No signature header at all
        let response = webhook_handler(State(state.clone()), HeaderMap::new(), body.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Signature computed with the wrong secret
        let headers = signed_headers(&body, "wrong_secret");
        let response = webhook_handler(State(state), headers, body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert!(json.get("message").is_some());
        assert!(json.get("error").is_some());

        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_events_acknowledged_without_dispatch() {
        let (state, client) = test_state();

        for raw in [r#"{"events":[]}"#, r#"{"destination":"xyz"}"#] {
            let body = Bytes::from(raw);
            let headers = signed_headers(&body, "test_channel_secret");
            let response = webhook_handler(State(state.clone()), headers, body).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unparseable_body_is_acknowledged_with_error_status() {
        let (state, client) = test_state();
        let body = Bytes::from("not json at all");
        let headers = signed_headers(&body, "test_channel_secret");

        let response = webhook_handler(State(state), headers, body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batch_with_one_failure_still_succeeds() {
        let (state, client) = test_state();
        let body = Bytes::from(
            r#"{"events":[
                {"type":"message","replyToken":"t1","message":{"type":"text","text":"one"}},
                {"type":"message","replyToken":"t-fail","message":{"type":"text","text":"two"}},
                {"type":"follow","replyToken":"t3"}
            ]}"#,
        );
        let headers = signed_headers(&body, "test_channel_secret");

        let response = webhook_handler(State(state), headers, body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "success");
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_object());
        assert!(results[1].is_null());
        assert!(results[2].is_null());
        // follow event is skipped, so only two delivery attempts
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn health_reports_configured_secrets_as_booleans() {
        let (state, _client) = test_state();

        let response = health_check(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["channel_secret_configured"], true);
        assert_eq!(json["channel_access_token_configured"], true);
        assert!(json["version"].is_string());
        // Never the secret values themselves
        assert!(!json.to_string().contains("test_channel_secret"));
        assert!(!json.to_string().contains("test_access_token"));
    }
}
