use sha2::{Digest, Sha256};

/// C2: lowercase hex SHA-256, no keyed hashing, no domain separation tag
/// (compatibility with existing artifacts, §4.2).
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}

/// Combines two hex-encoded hashes by hashing their hex *text*
/// concatenation, not their raw bytes — this must match exactly to
/// preserve compatibility with the existing verification contract
/// (§4.3).
pub fn sha256_hex_concat(left: &str, right: &str) -> String {
    let mut buf = String::with_capacity(left.len() + right.len());
    buf.push_str(left);
    buf.push_str(right);
    sha256_hex(buf.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_concat_hashes_text_not_bytes() {
        let a = sha256_hex(b"a");
        let b = sha256_hex(b"b");
        let expected = sha256_hex(format!("{a}{b}").as_bytes());
        assert_eq!(sha256_hex_concat(&a, &b), expected);
    }
}
