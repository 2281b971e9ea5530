//! AES-CFB encryption and decryption of text messages.
//!
//! **Algorithm choice:** AES in CFB mode (full-block segments) turns the block
//! cipher into a stream cipher: the ciphertext body has exactly the length of
//! the plaintext and no padding is applied. CFB provides confidentiality only:
//! there is no integrity tag, so tampered ciphertext decrypts to garbage bytes
//! rather than failing.
//!
//! # Payload format
//!
//! ```text
//! base64url( IV[16] || keystream-XORed plaintext )
//! ```
//!
//! The IV is drawn fresh from the injected [`RandomSource`] on every encrypt
//! call and must never repeat under the same key. It is not secret; it rides
//! at the front of the payload. Key material crossing the API boundary uses
//! the standard base64 alphabet instead ([`encode_key`] / [`decode_key`]).

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use thiserror::Error;

use super::rng::{RandomSource, RngError};

/// Byte length of an AES block, and of the IV at the front of every payload.
pub const BLOCK_SIZE: usize = 16;

/// Key lengths accepted by the cipher: AES-128, AES-192, AES-256.
pub const KEY_LENGTHS: [usize; 3] = [16, 24, 32];

type Aes128CfbEnc = cfb_mode::Encryptor<aes::Aes128>;
type Aes128CfbDec = cfb_mode::Decryptor<aes::Aes128>;
type Aes192CfbEnc = cfb_mode::Encryptor<aes::Aes192>;
type Aes192CfbDec = cfb_mode::Decryptor<aes::Aes192>;
type Aes256CfbEnc = cfb_mode::Encryptor<aes::Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<aes::Aes256>;

/// Errors produced by the cipher layer.
///
/// Each variant is a distinct, inspectable value; no operation retries
/// internally or returns a partial result.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key has an unsupported length.
    #[error("invalid key length: {0} bytes (expected 16, 24, or 32)")]
    InvalidKeyLength(usize),

    /// The random source failed or was short-read.
    #[error(transparent)]
    RandomSource(#[from] RngError),

    /// The ciphertext is not valid URL-safe base64.
    #[error("ciphertext is not valid url-safe base64")]
    Encoding(#[source] base64::DecodeError),

    /// The decoded payload is shorter than one block and cannot contain an IV.
    #[error("ciphertext is {0} bytes, shorter than the {BLOCK_SIZE}-byte iv")]
    TruncatedCiphertext(usize),
}

/// Produce `length` cryptographically random key bytes.
///
/// No length validation happens here: a non-standard length is accepted and
/// fails later at cipher-setup time, matching the contract of the encrypt and
/// decrypt operations.
///
/// # Errors
///
/// Returns [`CipherError::RandomSource`] if the source cannot supply the
/// requested bytes; partial key material is never returned.
pub fn generate_key(rng: &dyn RandomSource, length: usize) -> Result<Vec<u8>, CipherError> {
    let mut key = vec![0u8; length];
    rng.fill(&mut key)?;
    Ok(key)
}

/// Encrypt `plaintext` under `key`, returning URL-safe base64 text.
///
/// A fresh IV is drawn per call, so encrypting the same message twice under
/// the same key yields different outputs.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not 16, 24, or 32
/// bytes (checked before the random source is touched), and
/// [`CipherError::RandomSource`] if the IV cannot be drawn.
pub fn encrypt_message(
    rng: &dyn RandomSource,
    key: &[u8],
    plaintext: &[u8],
) -> Result<String, CipherError> {
    check_key_length(key)?;

    let mut payload = vec![0u8; BLOCK_SIZE + plaintext.len()];
    rng.fill(&mut payload[..BLOCK_SIZE])?;
    payload[BLOCK_SIZE..].copy_from_slice(plaintext);

    let (iv, body) = payload.split_at_mut(BLOCK_SIZE);
    cfb_encrypt(key, iv, body)?;

    Ok(URL_SAFE.encode(&payload))
}

/// Decrypt a URL-safe base64 ciphertext produced by [`encrypt_message`].
///
/// Returns the recovered plaintext bytes; the caller decides how to interpret
/// them as text. A payload of exactly one block decrypts to an empty message.
///
/// # Errors
///
/// Returns [`CipherError::Encoding`] on malformed base64,
/// [`CipherError::InvalidKeyLength`] for an unsupported key size, and
/// [`CipherError::TruncatedCiphertext`] if the decoded payload is too short to
/// contain an IV. There is no integrity check: a wrong key or tampered payload
/// yields garbage bytes, not an error.
pub fn decrypt_message(key: &[u8], encoded: &str) -> Result<Vec<u8>, CipherError> {
    let payload = URL_SAFE.decode(encoded).map_err(CipherError::Encoding)?;

    check_key_length(key)?;

    if payload.len() < BLOCK_SIZE {
        return Err(CipherError::TruncatedCiphertext(payload.len()));
    }
    let (iv, body) = payload.split_at(BLOCK_SIZE);

    let mut plaintext = body.to_vec();
    cfb_decrypt(key, iv, &mut plaintext)?;
    Ok(plaintext)
}

/// Encode key bytes for the API boundary (standard base64 alphabet).
pub fn encode_key(key: &[u8]) -> String {
    STANDARD.encode(key)
}

/// Decode a standard-base64 key from the API boundary.
///
/// # Errors
///
/// Returns the underlying decode error on malformed input; length validation
/// is left to the cipher operations.
pub fn decode_key(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}

fn check_key_length(key: &[u8]) -> Result<(), CipherError> {
    if KEY_LENGTHS.contains(&key.len()) {
        Ok(())
    } else {
        Err(CipherError::InvalidKeyLength(key.len()))
    }
}

fn cfb_encrypt(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CipherError> {
    // The key length was validated by the caller; `new_from_slices` can only
    // fail if that validation was bypassed.
    match key.len() {
        16 => Aes128CfbEnc::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .encrypt(buf),
        24 => Aes192CfbEnc::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .encrypt(buf),
        32 => Aes256CfbEnc::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .encrypt(buf),
        n => return Err(CipherError::InvalidKeyLength(n)),
    }
    Ok(())
}

fn cfb_decrypt(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CipherError> {
    match key.len() {
        16 => Aes128CfbDec::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .decrypt(buf),
        24 => Aes192CfbDec::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .decrypt(buf),
        32 => Aes256CfbDec::new_from_slices(key, iv)
            .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
            .decrypt(buf),
        n => return Err(CipherError::InvalidKeyLength(n)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rng::{MockRandomSource, OsRandom};
    use std::collections::HashSet;

    fn random_key(len: usize) -> Vec<u8> {
        generate_key(&OsRandom, len).unwrap()
    }

    #[test]
    fn round_trip_all_key_lengths() {
        for len in KEY_LENGTHS {
            let key = random_key(len);
            let encoded = encrypt_message(&OsRandom, &key, b"hello world").unwrap();
            let decrypted = decrypt_message(&key, &encoded).unwrap();
            assert_eq!(decrypted, b"hello world", "key length {len}");
        }
    }

    #[test]
    fn round_trip_empty_plaintext() {
        let key = random_key(32);
        let encoded = encrypt_message(&OsRandom, &key, b"").unwrap();
        // An empty message encrypts to an IV-only payload.
        assert_eq!(URL_SAFE.decode(&encoded).unwrap().len(), BLOCK_SIZE);
        assert_eq!(decrypt_message(&key, &encoded).unwrap(), b"");
    }

    #[test]
    fn round_trip_arbitrary_bytes() {
        let key = random_key(24);
        let plaintext = [0x00, 0xFF, 0x9F, 0x92, 0x96, 0x0A, 0x80];
        let encoded = encrypt_message(&OsRandom, &key, &plaintext).unwrap();
        assert_eq!(decrypt_message(&key, &encoded).unwrap(), plaintext);
    }

    #[test]
    fn fresh_iv_makes_output_nondeterministic() {
        let key = random_key(16);
        let a = encrypt_message(&OsRandom, &key, b"same message").unwrap();
        let b = encrypt_message(&OsRandom, &key, b"same message").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn length_is_preserved() {
        // 16-byte IV + 11-byte body = 27 raw bytes = 36 base64 characters.
        let key = random_key(32);
        let encoded = encrypt_message(&OsRandom, &key, b"hello world").unwrap();
        assert_eq!(encoded.len(), 36);
        let payload = URL_SAFE.decode(&encoded).unwrap();
        assert_eq!(payload.len(), BLOCK_SIZE + b"hello world".len());
    }

    #[test]
    fn rejects_invalid_key_lengths() {
        let well_formed = URL_SAFE.encode([0u8; BLOCK_SIZE]);
        for len in [0usize, 1, 15, 17, 23, 25, 31, 33, 64] {
            let key = vec![0u8; len];
            let err = encrypt_message(&OsRandom, &key, b"x").unwrap_err();
            assert!(
                matches!(err, CipherError::InvalidKeyLength(n) if n == len),
                "encrypt accepted key length {len}"
            );
            let err = decrypt_message(&key, &well_formed).unwrap_err();
            assert!(
                matches!(err, CipherError::InvalidKeyLength(n) if n == len),
                "decrypt accepted key length {len}"
            );
        }
    }

    #[test]
    fn truncated_ciphertext_rejected() {
        let key = random_key(16);
        let short = URL_SAFE.encode([0u8; BLOCK_SIZE - 1]);
        let err = decrypt_message(&key, &short).unwrap_err();
        assert!(matches!(err, CipherError::TruncatedCiphertext(15)));

        let err = decrypt_message(&key, "").unwrap_err();
        assert!(matches!(err, CipherError::TruncatedCiphertext(0)));
    }

    #[test]
    fn malformed_encoding_rejected() {
        let key = random_key(16);
        for bad in ["not@base64!", "+/+/", "AAA=A"] {
            let err = decrypt_message(&key, bad).unwrap_err();
            assert!(
                matches!(err, CipherError::Encoding(_)),
                "accepted malformed input {bad:?}"
            );
        }
    }

    #[test]
    fn encoding_error_precedes_key_validation() {
        // A malformed ciphertext reports the decode failure even when the key
        // is also invalid.
        let err = decrypt_message(&[0u8; 5], "@@@@").unwrap_err();
        assert!(matches!(err, CipherError::Encoding(_)));
    }

    #[test]
    fn iv_rides_at_the_front_of_the_payload() {
        let mut rng = MockRandomSource::new();
        rng.expect_fill().returning(|buf| {
            buf.fill(0x5A);
            Ok(())
        });

        let key = [7u8; 16];
        let encoded = encrypt_message(&rng, &key, b"hello").unwrap();
        let payload = URL_SAFE.decode(&encoded).unwrap();
        assert_eq!(&payload[..BLOCK_SIZE], &[0x5A; BLOCK_SIZE]);
        assert_eq!(payload.len(), BLOCK_SIZE + b"hello".len());
        assert_eq!(decrypt_message(&key, &encoded).unwrap(), b"hello");
    }

    #[test]
    fn rng_failure_is_fatal() {
        let mut rng = MockRandomSource::new();
        rng.expect_fill()
            .returning(|_| Err(RngError("entropy source closed".into())));

        let err = encrypt_message(&rng, &[0u8; 16], b"x").unwrap_err();
        assert!(matches!(err, CipherError::RandomSource(_)));

        let err = generate_key(&rng, 16).unwrap_err();
        assert!(matches!(err, CipherError::RandomSource(_)));
    }

    #[test]
    fn key_length_checked_before_random_source() {
        // A bad key must be rejected without consuming entropy.
        let mut rng = MockRandomSource::new();
        rng.expect_fill().times(0);
        let err = encrypt_message(&rng, &[0u8; 17], b"x").unwrap_err();
        assert!(matches!(err, CipherError::InvalidKeyLength(17)));
    }

    #[test]
    fn generated_keys_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let key = generate_key(&OsRandom, 16).unwrap();
            assert_eq!(key.len(), 16);
            assert!(seen.insert(key), "duplicate 16-byte key generated");
        }
    }

    #[test]
    fn nonstandard_key_length_fails_at_cipher_setup() {
        // generate_key places no constraint on length; the cipher does.
        let key = generate_key(&OsRandom, 10).unwrap();
        assert_eq!(key.len(), 10);
        let err = encrypt_message(&OsRandom, &key, b"x").unwrap_err();
        assert!(matches!(err, CipherError::InvalidKeyLength(10)));
    }

    #[test]
    fn key_base64_helpers_round_trip() {
        let key = random_key(24);
        let encoded = encode_key(&key);
        assert_eq!(decode_key(&encoded).unwrap(), key);
        assert!(decode_key("!!!").is_err());
    }

    #[test]
    fn wrong_key_yields_garbage_not_an_error() {
        let encoded = encrypt_message(&OsRandom, &random_key(32), b"tamper me").unwrap();
        let recovered = decrypt_message(&random_key(32), &encoded).unwrap();
        // No integrity tag: decryption succeeds but the bytes are wrong.
        assert_ne!(recovered, b"tamper me");
    }
}
