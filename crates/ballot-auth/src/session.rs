use std::{
    collections::HashSet,
    sync::{PoisonError, RwLock},
};

/// Voter ids that completed passcode verification in this process.
#[derive(Debug, Default)]
pub struct VerifiedVoters {
    ids: RwLock<HashSet<String>>,
}

impl VerifiedVoters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, voter_id: impl Into<String>) {
        self.ids
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(voter_id.into());
    }

    pub fn contains(&self, voter_id: &str) -> bool {
        self.ids
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(voter_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_contains() {
        let voters = VerifiedVoters::new();
        assert!(!voters.contains("abc"));
        voters.insert("abc");
        assert!(voters.contains("abc"));
    }
}
