use crate::{
    block::{genesis_block, now_millis, Block, UnsealedBlock, Vote},
    constants::DEFAULT_DIFFICULTY,
    pow::Sealer,
    tally::Tally,
    verify::{verify_chain, IntegrityViolation, Validation},
    LedgerError,
};
use std::{
    collections::{BTreeMap, HashSet},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::{info, warn};

/// Result of a vote submission that did not hit an internal failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    Accepted(Block),
    AlreadyVoted,
}

impl VoteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, VoteOutcome::Accepted(_))
    }

    pub fn block(&self) -> Option<&Block> {
        match self {
            VoteOutcome::Accepted(block) => Some(block),
            VoteOutcome::AlreadyVoted => None,
        }
    }
}

struct LedgerState {
    chain: Vec<Block>,
    voters: HashSet<String>,
}

impl LedgerState {
    fn head(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger chain always starts with genesis")
    }
}

/// Append-only vote chain plus the set of voters that have already voted.
///
/// Both live behind one lock. Submissions hold the write guard from the
/// uniqueness check until the voter is registered, so two submitters can never
/// seal against the same head.
pub struct Ledger {
    state: RwLock<LedgerState>,
    sealer: Sealer,
}

impl Ledger {
    pub fn new(difficulty: usize) -> Self {
        Self::with_sealer(Sealer::new(difficulty))
    }

    pub fn with_sealer(sealer: Sealer) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                chain: vec![genesis_block()],
                voters: HashSet::new(),
            }),
            sealer,
        }
    }

    pub fn difficulty(&self) -> usize {
        self.sealer.difficulty()
    }

    // State is only touched after sealing succeeds, so a poisoned lock still
    // guards a consistent chain.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seal a vote onto the chain unless `voter_id` has voted before.
    pub fn submit_vote(&self, voter_id: &str, candidate_id: &str) -> Result<VoteOutcome, LedgerError> {
        let mut state = self.write();
        if state.voters.contains(voter_id) {
            warn!(voter_id, "rejected vote: voter already voted");
            return Ok(VoteOutcome::AlreadyVoted);
        }

        let head = state.head();
        let now = now_millis();
        let candidate = UnsealedBlock::new(
            head.index() + 1,
            head.hash(),
            Vote::new(voter_id, candidate_id, now),
            now,
        );
        let block = self.sealer.seal(candidate)?;

        state.chain.push(block.clone());
        state.voters.insert(voter_id.to_owned());
        info!(index = block.index(), candidate_id, "vote accepted");
        Ok(VoteOutcome::Accepted(block))
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.read().voters.contains(voter_id)
    }

    pub fn head(&self) -> Block {
        self.read().head().clone()
    }

    pub fn height(&self) -> u64 {
        self.read().head().index()
    }

    /// Owned copy of the chain; changes to it never reach the ledger.
    pub fn get_chain(&self) -> Vec<Block> {
        self.read().chain.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_with(Validation::Full)
    }

    pub fn is_valid_with(&self, mode: Validation) -> bool {
        self.verify(mode).is_ok()
    }

    pub fn verify(&self, mode: Validation) -> Result<(), IntegrityViolation> {
        let state = self.read();
        verify_chain(&state.chain, self.difficulty(), mode).inspect_err(|violation| {
            warn!(%violation, "chain integrity check failed");
        })
    }

    pub fn get_total_votes(&self) -> usize {
        self.read().chain.len() - 1
    }

    pub fn get_candidate_votes(&self, candidate_id: &str) -> usize {
        self.read()
            .chain
            .iter()
            .filter(|b| !b.is_genesis() && b.vote().candidate_id == candidate_id)
            .count()
    }

    pub fn get_all_votes(&self) -> BTreeMap<String, usize> {
        self.tally().into_counts()
    }

    /// Counts and total taken from one snapshot of the chain.
    pub fn tally(&self) -> Tally {
        Tally::from_blocks(&self.read().chain)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GENESIS_HASH;

    #[test]
    fn fresh_ledger() {
        let ledger = Ledger::default();
        assert_eq!(ledger.get_total_votes(), 0);
        assert!(ledger.get_all_votes().is_empty());
        assert!(ledger.is_valid());
        assert_eq!(ledger.height(), 0);
        assert_eq!(ledger.head().hash(), GENESIS_HASH);
    }

    #[test]
    fn accepted_vote_links_to_head() {
        let ledger = Ledger::default();
        let outcome = ledger.submit_vote("v1", "cA").unwrap();
        assert!(outcome.is_accepted());
        let block = outcome.block().unwrap();
        assert_eq!(block.index(), 1);
        assert_eq!(block.previous_hash(), GENESIS_HASH);
        assert_eq!(block.vote().voter_id, "v1");
        assert_eq!(block.vote().candidate_id, "cA");
        assert_eq!(block.vote().timestamp, block.timestamp());
        assert!(block.hash().starts_with("00"));
        assert_eq!(ledger.head(), *block);
        assert!(ledger.has_voted("v1"));
    }

    #[test]
    fn second_vote_is_rejected() {
        let ledger = Ledger::default();
        ledger.submit_vote("v1", "cA").unwrap();
        let outcome = ledger.submit_vote("v1", "cB").unwrap();
        assert_eq!(outcome, VoteOutcome::AlreadyVoted);
        assert!(!outcome.is_accepted());
        assert_eq!(ledger.get_total_votes(), 1);
        assert_eq!(ledger.get_candidate_votes("cA"), 1);
        assert_eq!(ledger.get_candidate_votes("cB"), 0);
    }

    #[test]
    fn sealing_failure_leaves_state_untouched() {
        let ledger = Ledger::with_sealer(Sealer::new(16).with_max_nonce(10));
        let err = ledger.submit_vote("v1", "cA").unwrap_err();
        assert!(matches!(err, LedgerError::Sealing(_)));
        assert_eq!(ledger.get_chain().len(), 1);
        assert!(!ledger.has_voted("v1"));
    }

    #[test]
    fn get_chain_is_a_copy() {
        let ledger = Ledger::default();
        ledger.submit_vote("v1", "cA").unwrap();
        let mut chain = ledger.get_chain();
        chain.clear();
        assert_eq!(ledger.get_chain().len(), 2);
    }

    #[test]
    fn both_validation_modes_accept_a_sealed_chain() {
        let ledger = Ledger::default();
        for voter in ["v1", "v2", "v3"] {
            ledger.submit_vote(voter, "cA").unwrap();
        }
        assert!(ledger.is_valid_with(Validation::LinkageOnly));
        assert!(ledger.is_valid_with(Validation::Full));
        assert_eq!(ledger.verify(Validation::Full), Ok(()));
    }
}
