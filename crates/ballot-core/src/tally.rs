use crate::block::Block;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-candidate counts derived from a block sequence. Genesis is skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl Tally {
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut tally = Tally::default();
        for block in blocks.iter().filter(|b| !b.is_genesis()) {
            *tally
                .counts
                .entry(block.vote().candidate_id.clone())
                .or_insert(0) += 1;
            tally.total += 1;
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn votes_for(&self, candidate_id: &str) -> usize {
        self.counts.get(candidate_id).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn into_counts(self) -> BTreeMap<String, usize> {
        self.counts
    }

    /// Share of all votes in percent; 0 when nothing has been cast.
    pub fn percent(&self, candidate_id: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.votes_for(candidate_id) as f64 * 100.0 / self.total as f64
    }
}
