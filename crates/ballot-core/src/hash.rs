use crate::Hash;
use sha2::{Digest, Sha256};

pub fn sha256(bytes: &[u8]) -> Hash {
    Sha256::digest(bytes).into()
}

/// Lowercase hex SHA-256 digest, always `HASH_HEX_SIZE` characters long.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha256(bytes))
}

/// Number of leading `'0'` characters in a hex digest.
pub fn leading_zero_chars(hex_digest: &str) -> usize {
    hex_digest.bytes().take_while(|b| *b == b'0').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HASH_HEX_SIZE;

    #[test]
    fn sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_hex_is_fixed_length() {
        for input in [&b""[..], b"a", b"a much longer input than the others"] {
            assert_eq!(sha256_hex(input).len(), HASH_HEX_SIZE);
        }
    }

    #[test]
    fn sha256_matches_hex_form() {
        assert_eq!(hex::encode(sha256(b"vote")), sha256_hex(b"vote"));
    }

    #[test]
    fn leading_zero_chars_examples() {
        assert_eq!(leading_zero_chars("00ab"), 2);
        assert_eq!(leading_zero_chars("0000"), 4);
        assert_eq!(leading_zero_chars("a000"), 0);
        assert_eq!(leading_zero_chars(""), 0);
    }
}
