//! The injected randomness capability.
//!
//! The process-wide random source is modelled as an explicit dependency
//! ([`RandomSource`]) rather than an ambient global, so handlers and tests can
//! substitute their own provider.

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// The random source failed or was short-read. Fatal to the calling
/// operation; never retried internally.
#[derive(Debug, Error)]
#[error("random source failure: {0}")]
pub struct RngError(pub String);

/// A supplier of cryptographically secure random bytes.
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send + Sync {
    /// Fill `buf` completely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RngError`] if the source cannot supply the requested number
    /// of bytes. On error the buffer contents are unspecified and must not be
    /// used as key or IV material.
    fn fill(&self, buf: &mut [u8]) -> Result<(), RngError>;
}

/// Production [`RandomSource`] backed by the operating system CSPRNG.
///
/// A read may block briefly while the kernel gathers entropy; callers must
/// tolerate that wait rather than time it out.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RngError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| RngError(e.to_string()))
    }
}
