//! AES-CFB message encryption primitives and the randomness capability.
//!
//! This module is intentionally free of HTTP and configuration dependencies.
//! It provides the key-generation, encrypt, and decrypt operations used by the
//! HTTP layer.

pub mod cipher;
pub mod rng;

pub use cipher::BLOCK_SIZE;
pub use rng::{OsRandom, RandomSource};
