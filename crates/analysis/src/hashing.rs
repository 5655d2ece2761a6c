//! Content digest of a program.

use subvm_common::Code;

/// Hex-encoded blake3 digest of the raw code bytes.
pub fn code_digest(code: &Code) -> String {
    blake3::hash(code.as_bytes()).to_hex().to_string()
}
