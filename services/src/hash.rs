use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a string (64 chars).
pub fn sha256_hex(s: &str) -> String {
    let mut h = Sha256::new();
    h.update(s.as_bytes());
    format!("{:x}", h.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn differs_only_when_text_differs() {
        let a = sha256_hex("Carry-on bags must fit under the seat.");
        assert_eq!(a, sha256_hex("Carry-on bags must fit under the seat."));
        assert_ne!(a, sha256_hex("Carry-on bags must fit under the seat!"));
        assert_eq!(a.len(), 64);
    }
}
