//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    GenerateKeyRequest, GenerateKeyResponse, HealthResponse,
};
use common::ServiceError;
use tracing::warn;

use super::state::AppState;
use crate::crypto::cipher::{self, CipherError};

/// Upper bound on a single generate-key request. An allocation guard at the
/// boundary, not a cipher constraint.
const MAX_GENERATED_KEY_BYTES: usize = 1024;

/// `POST /generate-key` — produce random key bytes.
///
/// Returns the key as standard-alphabet base64 text. Any length in
/// `1..=1024` is accepted here; lengths other than 16, 24, or 32 will be
/// rejected later by `/encrypt` and `/decrypt`.
pub async fn generate_key(
    State(state): State<AppState>,
    Json(req): Json<GenerateKeyRequest>,
) -> Response {
    if req.length == 0 || req.length > MAX_GENERATED_KEY_BYTES {
        let err = ServiceError::BadRequest(format!(
            "length must be between 1 and {MAX_GENERATED_KEY_BYTES}, got {}",
            req.length
        ));
        return service_error_response(&err);
    }

    match cipher::generate_key(state.rng.as_ref(), req.length) {
        Ok(key) => (
            StatusCode::OK,
            Json(GenerateKeyResponse {
                key: cipher::encode_key(&key),
            }),
        )
            .into_response(),
        Err(e) => cipher_error_response(&e),
    }
}

/// `POST /encrypt` — encrypt a message under the supplied key.
///
/// The key arrives as standard base64; the ciphertext is returned as URL-safe
/// base64 with the IV at the front of the decoded payload.
pub async fn encrypt(
    State(state): State<AppState>,
    Json(req): Json<EncryptRequest>,
) -> Response {
    let key = match cipher::decode_key(&req.key) {
        Ok(k) => k,
        Err(_) => {
            let err = ServiceError::BadRequest("key is not valid standard base64".into());
            return service_error_response(&err);
        }
    };

    match cipher::encrypt_message(state.rng.as_ref(), &key, req.plaintext.as_bytes()) {
        Ok(ciphertext) => (StatusCode::OK, Json(EncryptResponse { ciphertext })).into_response(),
        Err(e) => cipher_error_response(&e),
    }
}

/// `POST /decrypt` — recover the message from a ciphertext produced by
/// `/encrypt`.
///
/// There is no integrity check: a wrong key or tampered payload yields
/// garbage, which is coerced to text lossily rather than rejected.
pub async fn decrypt(Json(req): Json<DecryptRequest>) -> Response {
    let key = match cipher::decode_key(&req.key) {
        Ok(k) => k,
        Err(_) => {
            let err = ServiceError::BadRequest("key is not valid standard base64".into());
            return service_error_response(&err);
        }
    };

    match cipher::decrypt_message(&key, &req.ciphertext) {
        Ok(bytes) => (
            StatusCode::OK,
            Json(DecryptResponse {
                plaintext: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        )
            .into_response(),
        Err(e) => cipher_error_response(&e),
    }
}

/// `GET /health` — liveness and readiness check.
///
/// Probes the random source with a one-byte read. Returns `200 OK` when the
/// probe succeeds and `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let mut probe = [0u8; 1];
    let random_ready = state.rng.fill(&mut probe).is_ok();

    let (status_code, status_str) = if random_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        random_ready,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Map a cipher-layer error to its HTTP response.
///
/// Each [`CipherError`] variant keeps its own machine-readable code so callers
/// can distinguish a bad key from a malformed or truncated ciphertext.
fn cipher_error_response(err: &CipherError) -> Response {
    let (status, code) = match err {
        CipherError::InvalidKeyLength(_) => (StatusCode::BAD_REQUEST, "invalid_key_length"),
        CipherError::Encoding(_) => (StatusCode::BAD_REQUEST, "encoding_error"),
        CipherError::TruncatedCiphertext(_) => (StatusCode::BAD_REQUEST, "truncated_ciphertext"),
        CipherError::RandomSource(_) => {
            warn!(error = %err, "random source failed");
            (StatusCode::SERVICE_UNAVAILABLE, "random_source_error")
        }
    };
    (status, Json(ErrorResponse::new(code, err.to_string()))).into_response()
}

/// Map a boundary [`ServiceError`] to its HTTP response.
fn service_error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.code(), err.to_string()))).into_response()
}
