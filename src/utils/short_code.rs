//! Deterministic short code derivation.
//!
//! A code is the URL-safe base64 (no padding) encoding of the MD5 digest of
//! the submitted bytes, truncated to [`SHORT_CODE_LEN`] characters. The same
//! input always yields the same code, which is what lets storage backends
//! deduplicate by content.

use base64::Engine as _;
use md5::{Digest, Md5};

/// Default code length, about 42 bits of the digest.
pub const SHORT_CODE_LEN: usize = 7;

/// Length of the full encoded digest; codes are never longer than this.
pub const MAX_SHORT_CODE_LEN: usize = 22;

/// Encodes `content` into a [`SHORT_CODE_LEN`]-character code.
///
/// Total over any input, including empty input; rejecting empty URLs is the
/// caller's job.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(encode(b"https://practicum.yandex.ru/"), "DdGYF42");
/// ```
pub fn encode(content: &[u8]) -> String {
    encode_with_len(content, SHORT_CODE_LEN)
}

/// Encodes `content` keeping `len` characters of the digest.
///
/// `len` is clamped to `1..=MAX_SHORT_CODE_LEN`. A longer code is always an
/// extension of a shorter one for the same input, which is how collisions
/// are resolved: keep widening until the code is free.
pub fn encode_with_len(content: &[u8], len: usize) -> String {
    let digest = Md5::digest(content);
    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(len.clamp(1, MAX_SHORT_CODE_LEN));
    encoded
}
