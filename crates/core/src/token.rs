//! One-time-token generation and hashing.
//!
//! Email verification uses a short numeric OTP the user types in; password
//! reset uses a long random hex token embedded in a link. Both are stored
//! server-side only as a SHA-256 hex digest, so a database leak does not
//! expose live tokens.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Number of digits in an email-verification OTP.
pub const OTP_LENGTH: usize = 6;

/// Number of random bytes in a password-reset token (hex-encoded on the wire).
const RESET_TOKEN_BYTES: usize = 30;

/// Generate a numeric one-time password of [`OTP_LENGTH`] digits.
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    (0..OTP_LENGTH)
        .map(|_| char::from_digit(rng.random_range(0..10), 10).unwrap())
        .collect()
}

/// Generate a random password-reset token as a hex string.
pub fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..RESET_TOKEN_BYTES).map(|_| rng.random()).collect();
    hex_encode(&bytes)
}

/// SHA-256 hex digest of a token. This is what gets persisted.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
