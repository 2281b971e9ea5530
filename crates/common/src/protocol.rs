//! Request and response types exchanged between the service and its callers.
//!
//! These types are serialised as JSON over the public HTTP API. Key material
//! always crosses the boundary as standard-alphabet base64 text; ciphertext
//! always crosses as URL-safe base64 text.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Generate-key endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /generate-key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateKeyRequest {
    /// Number of random key bytes to produce. Must be positive. Lengths other
    /// than 16, 24, or 32 are accepted here but will be rejected by
    /// `/encrypt` and `/decrypt` at cipher-setup time.
    pub length: usize,
}

/// Successful response body for `POST /generate-key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateKeyResponse {
    /// The generated key bytes, standard-alphabet base64 encoded.
    pub key: String,
}

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// AES key, standard-alphabet base64 encoded. Must decode to 16, 24, or
    /// 32 bytes.
    pub key: String,
    /// Message to encrypt. May be empty.
    pub plaintext: String,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// `IV || ciphertext body`, URL-safe base64 encoded.
    pub ciphertext: String,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// AES key, standard-alphabet base64 encoded. Must decode to 16, 24, or
    /// 32 bytes.
    pub key: String,
    /// Ciphertext produced by `/encrypt`, URL-safe base64 encoded.
    pub ciphertext: String,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// The recovered message.
    pub plaintext: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"invalid_key_length"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether the OS random source answered the readiness probe.
    pub random_ready: bool,
}
