use actix_web::HttpRequest;
use sha2::{Digest, Sha256};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// The header wins over the body field when a reader sends both.
pub fn presented_key<'a>(req: &'a HttpRequest, body_key: Option<&'a str>) -> Option<&'a str> {
    req.headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .or(body_key)
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

/// Compares fixed-size digests so the check does not leak the key length
/// or a matching prefix through timing.
pub fn key_matches(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
