use ballot_core::sha256_hex;

pub const VOTER_ID_SALT: &str = "SecureVoteChain2025";

/// Deterministic voter identifier for a verified phone number.
pub fn derive_voter_id(phone: &str) -> String {
    let mut input = String::with_capacity(phone.len() + VOTER_ID_SALT.len());
    input.push_str(phone);
    input.push_str(VOTER_ID_SALT);
    sha256_hex(input.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_phone_same_id() {
        assert_eq!(derive_voter_id("5551234567"), derive_voter_id("5551234567"));
    }

    #[test]
    fn different_phones_differ() {
        assert_ne!(derive_voter_id("5551234567"), derive_voter_id("5551234568"));
    }

    #[test]
    fn id_is_salted_digest() {
        assert_eq!(
            derive_voter_id("5551234567"),
            sha256_hex(b"5551234567SecureVoteChain2025")
        );
        assert_ne!(derive_voter_id("5551234567"), sha256_hex(b"5551234567"));
        assert_eq!(derive_voter_id("5551234567").len(), 64);
    }
}
