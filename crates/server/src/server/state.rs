//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::{OsRandom, RandomSource};

/// Application state shared across all request handlers.
///
/// Holds the injected random-byte provider behind an `Arc` so that Axum can
/// clone the state for each request cheaply. There is no other shared state:
/// every cipher operation allocates its own buffers and key schedule.
#[derive(Clone)]
pub struct AppState {
    /// Provider of cryptographically secure random bytes (keys and IVs).
    pub rng: Arc<dyn RandomSource>,
}

impl AppState {
    /// Create a new [`AppState`] around the provided random source.
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] backed by the OS CSPRNG.
    fn default() -> Self {
        Self::new(Arc::new(OsRandom))
    }
}
