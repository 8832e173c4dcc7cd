//! SHA-256 based mixing of integers into 64-bit values.
//!
//! The hash is used purely for its avalanche behaviour, not for any
//! security property. The construction is fixed by the reference
//! implementation: hash the decimal rendering of the input, reverse the
//! lowercase hex digest and parse its leading `hex_chars` characters as
//! base-16.

use sha2::{Digest, Sha256};

/// Widest reversed-digest prefix that still fits a `u64`.
pub const MAX_HEX_CHARS: usize = 16;

/// Prefix width used for the event-seed bootstrap step.
pub const BOOTSTRAP_HEX_CHARS: usize = 14;

/// Prefix width used everywhere else.
pub const SEED_HEX_CHARS: usize = 16;

const DIGEST_HEX_LEN: usize = 64;

/// Mixes `value` into a 64-bit integer with strong avalanche behaviour.
///
/// Equivalent to rendering the SHA-256 digest of the decimal text of
/// `value` as 64 lowercase hex characters, reversing that string and
/// parsing its first `hex_chars` characters as base-16.
pub fn digest_to_u64(value: u64, hex_chars: usize) -> u64 {
    assert!(
        hex_chars >= 1 && hex_chars <= MAX_HEX_CHARS,
        "hex_chars must lie in 1..={MAX_HEX_CHARS}"
    );
    let digest = Sha256::digest(value.to_string().as_bytes());
    let mut out = 0u64;
    // Walk the trailing hex characters of the digest from the end inward;
    // the last character is the most significant digit of the reversed
    // rendering.
    for position in ((DIGEST_HEX_LEN - hex_chars)..DIGEST_HEX_LEN).rev() {
        let byte = digest[position / 2];
        let nibble = if position % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0f
        };
        out = (out << 4) | u64::from(nibble);
    }
    out
}
