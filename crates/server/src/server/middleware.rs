//! Axum middleware constants applied to the router.
//!
//! Request tracing and response compression are layered in the router. There
//! is no request-timeout layer: an encrypt or generate-key call may block
//! briefly on the OS entropy pool and must be allowed to finish. The body-size
//! cap below bounds request cost instead.

/// Maximum accepted request body size in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
