use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::prelude::*;

impl RustyGnap {
    /// Length of the nonces sent in `interact.finish` and in signature parameters
    pub const NONCE_LEN: usize = 22;
    const NONCE_ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

    /// Random string made of URL-safe characters (RFC 3986 unreserved set)
    pub fn create_nonce() -> String {
        let mut rng = rand::thread_rng();
        (0..Self::NONCE_LEN)
            .map(|_| Self::NONCE_ALPHABET[rng.gen_range(0..Self::NONCE_ALPHABET.len())] as char)
            .collect()
    }

    /// `content-digest` header value of `body`
    /// see [RFC 9530 Section 2](https://www.rfc-editor.org/rfc/rfc9530.html#section-2)
    pub fn content_digest(body: &[u8]) -> String {
        let digest = Sha256::digest(body);
        format!("sha-256=:{}:", base64::prelude::BASE64_STANDARD.encode(digest))
    }

    /// Drops one trailing slash so that paths can be appended
    pub fn url_fix(url: &str) -> &str {
        url.strip_suffix('/').unwrap_or(url)
    }
}
