//! HTTP route handlers.
//!
//! Every failure leaves the process as one of the generic `ErrorCode`s.
//! Stage-level detail is logged, never returned.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use seedgate_common::error::ErrorCode;
use seedgate_crypto::seed::decrypt_seed;
use seedgate_crypto::totp::DEFAULT_WINDOW;

use crate::protocol::{
    DecryptSeedRequest, GenerateResponse, StatusResponse, VerifyRequest, VerifyResponse,
};
use crate::state::AppState;

/// Build the API router.
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/decrypt-seed", post(decrypt_seed_handler))
        .route("/generate-2fa", get(generate_handler))
        .route("/verify-2fa", post(verify_handler))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// POST /decrypt-seed: Decrypt, validate and store a provisioned seed.
async fn decrypt_seed_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DecryptSeedRequest>, JsonRejection>,
) -> Response {
    let request = match parse_payload(payload) {
        Ok(request) => request,
        Err(resp) => return resp,
    };

    let key = match state.keys.get().await {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!(error = %e, kind = ?e.kind(), "Private key unavailable");
            return error_response(ErrorCode::DecryptionFailed);
        }
    };

    let seed = match decrypt_seed(&request.encrypted_seed, &key) {
        Ok(seed) => seed,
        Err(e) => {
            tracing::warn!(error = %e, kind = ?e.kind(), "Seed rejected");
            return error_response(ErrorCode::DecryptionFailed);
        }
    };

    if let Err(e) = state.store.store(seed.as_str()) {
        tracing::warn!(error = %e, "Failed to save seed");
        return error_response(ErrorCode::DecryptionFailed);
    }

    tracing::info!("Seed provisioned");
    (StatusCode::OK, Json(StatusResponse::ok())).into_response()
}

/// GET /generate-2fa: Current code and its remaining validity.
async fn generate_handler(State(state): State<Arc<AppState>>) -> Response {
    let seed = match state.store.load() {
        Ok(seed) => seed,
        Err(e) => {
            tracing::debug!(error = %e, "Seed not available");
            return error_response(ErrorCode::SeedUnavailable);
        }
    };

    match state.totp.generate(&seed) {
        Ok(code) => (StatusCode::OK, Json(GenerateResponse::from(code))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, kind = ?e.kind(), "Stored seed is invalid");
            error_response(ErrorCode::SeedUnavailable)
        }
    }
}

/// POST /verify-2fa: Check a code with ±1 step tolerance.
async fn verify_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Response {
    let request = match parse_payload(payload) {
        Ok(request) => request,
        Err(resp) => return resp,
    };

    let code = match request.code.as_deref() {
        Some(code) if !code.is_empty() => code,
        _ => return error_response(ErrorCode::MissingCode),
    };

    let seed = match state.store.load() {
        Ok(seed) => seed,
        Err(e) => {
            tracing::debug!(error = %e, "Seed not available");
            return error_response(ErrorCode::SeedUnavailable);
        }
    };

    match state.totp.verify(&seed, code, DEFAULT_WINDOW) {
        Ok(valid) => (StatusCode::OK, Json(VerifyResponse { valid })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, kind = ?e.kind(), "Stored seed is invalid");
            error_response(ErrorCode::SeedUnavailable)
        }
    }
}

/// Unwrap a JSON body, turning axum's rejection into `invalid_payload`.
fn parse_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            Err(error_response(ErrorCode::InvalidPayload))
        }
    }
}

fn error_response(code: ErrorCode) -> Response {
    let status =
        StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::json!({
        "error": code,
        "message": code.message(),
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use axum::body::Body;
    use axum::http::Request;
    use seedgate_common::persist::{FileSeedStore, SeedStore};
    use seedgate_crypto::totp::{code_at, counter_at};
    use seedgate_crypto::{Clock, SystemClock};
    use tower::ServiceExt;

    use crate::state::KeyCache;

    const SEED: &str = "9f3c1a7e5b2d4680ace13579bdf02468a1b2c3d4e5f60718293a4b5c6d7e8f90";

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../seedgate-crypto/tests/fixtures")
            .join(name)
    }

    fn temp_seed_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("seedgate-http-{name}-{nanos}"))
            .join("seed.txt")
    }

    fn test_state(name: &str, key: &str) -> (Arc<AppState>, Arc<FileSeedStore>) {
        let store = Arc::new(FileSeedStore::new(temp_seed_path(name)));
        let state = AppState::new(KeyCache::new(fixture(key)), store.clone());
        (Arc::new(state), store)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn encrypted_seed() -> String {
        std::fs::read_to_string(fixture("encrypted_seed.b64"))
            .unwrap()
            .trim()
            .to_string()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (state, _) = test_state("health", "signer_private.pem");
        let req = Request::get("/healthz").body(Body::empty()).unwrap();
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn decrypt_seed_stores_seed() {
        let (state, store) = test_state("decrypt", "signer_private.pem");
        let req = post_json(
            "/decrypt-seed",
            serde_json::json!({ "encrypted_seed": encrypted_seed() }),
        );
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({ "status": "ok" }));
        assert_eq!(store.load().unwrap(), SEED);
    }

    #[tokio::test]
    async fn decrypt_failures_are_indistinguishable() {
        let cases = [
            ("signer_private.pem", "%%% not base64 %%%".to_string()),
            ("recipient_private.pem", encrypted_seed()),
            ("missing_key.pem", encrypted_seed()),
        ];
        for (key, payload) in cases {
            let (state, store) = test_state("decrypt-fail", key);
            let req = post_json(
                "/decrypt-seed",
                serde_json::json!({ "encrypted_seed": payload }),
            );
            let resp = routes(state).oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{key}");
            assert_eq!(
                body_json(resp).await,
                serde_json::json!({ "error": "decryption_failed", "message": "Decryption failed" })
            );
            assert!(store.load().is_err());
        }
    }

    #[tokio::test]
    async fn generate_without_seed_is_unavailable() {
        let (state, _) = test_state("generate-missing", "signer_private.pem");
        let req = Request::get("/generate-2fa").body(Body::empty()).unwrap();
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "seed_unavailable");
        assert_eq!(json["message"], "Seed not decrypted yet");
    }

    #[tokio::test]
    async fn generate_with_corrupt_seed_is_unavailable() {
        let (state, store) = test_state("generate-corrupt", "signer_private.pem");
        store.store("garbage").unwrap();
        let req = Request::get("/generate-2fa").body(Body::empty()).unwrap();
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "seed_unavailable");
    }

    #[tokio::test]
    async fn generate_returns_code_and_validity() {
        let (state, store) = test_state("generate", "signer_private.pem");
        store.store(SEED).unwrap();

        let req = Request::get("/generate-2fa").body(Body::empty()).unwrap();
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body: GenerateResponse = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(body.code.len(), 6);
        assert!((1..=30).contains(&body.valid_for));
    }

    #[tokio::test]
    async fn verify_accepts_current_code() {
        let (state, store) = test_state("verify", "signer_private.pem");
        store.store(SEED).unwrap();

        let code = code_at(SEED, counter_at(SystemClock.unix_secs())).unwrap();
        let req = post_json("/verify-2fa", serde_json::json!({ "code": code }));
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({ "valid": true }));
    }

    #[tokio::test]
    async fn verify_rejects_malformed_code() {
        let (state, store) = test_state("verify-malformed", "signer_private.pem");
        store.store(SEED).unwrap();

        let req = post_json("/verify-2fa", serde_json::json!({ "code": "12ab56" }));
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({ "valid": false }));
    }

    #[tokio::test]
    async fn verify_missing_code_is_bad_request() {
        for body in [serde_json::json!({}), serde_json::json!({ "code": "" })] {
            let (state, _) = test_state("verify-missing", "signer_private.pem");
            let resp = routes(state)
                .oneshot(post_json("/verify-2fa", body))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(resp).await["error"], "missing_code");
        }
    }

    #[tokio::test]
    async fn verify_without_seed_is_unavailable() {
        let (state, _) = test_state("verify-noseed", "signer_private.pem");
        let req = post_json("/verify-2fa", serde_json::json!({ "code": "123456" }));
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "seed_unavailable");
    }

    #[tokio::test]
    async fn provision_then_generate_then_verify() {
        let (state, _) = test_state("flow", "signer_private.pem");
        let app = routes(state);

        let resp = app
            .clone()
            .oneshot(post_json(
                "/decrypt-seed",
                serde_json::json!({ "encrypted_seed": encrypted_seed() }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(Request::get("/generate-2fa").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let generated: GenerateResponse = serde_json::from_value(body_json(resp).await).unwrap();

        let resp = app
            .oneshot(post_json(
                "/verify-2fa",
                serde_json::json!({ "code": generated.code }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!({ "valid": true }));
    }

    fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_bodies_are_invalid_payload() {
        let cases = [
            post_raw("/decrypt-seed", "{}"),
            post_raw("/decrypt-seed", "not json"),
            post_raw("/verify-2fa", "not json"),
            post_json("/verify-2fa", serde_json::json!({ "code": 123456 })),
            Request::post("/decrypt-seed")
                .body(Body::from("{\"encrypted_seed\":\"x\"}"))
                .unwrap(),
        ];
        for req in cases {
            let uri = req.uri().to_string();
            let (state, _) = test_state("invalid-payload", "signer_private.pem");
            let resp = routes(state).oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                body_json(resp).await,
                serde_json::json!({
                    "error": "invalid_payload",
                    "message": "Invalid request payload",
                }),
                "{uri}"
            );
        }
    }

    #[tokio::test]
    async fn nonexistent_route_returns_404() {
        let (state, _) = test_state("404", "signer_private.pem");
        let req = Request::get("/nonexistent").body(Body::empty()).unwrap();
        let resp = routes(state).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
