use crate::{
    block::{digest_with_nonce, hash_prefix, Block, UnsealedBlock},
    constants::{DEFAULT_MAX_NONCE, HASH_HEX_SIZE},
    hash::leading_zero_chars,
    SealError,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// True when `hash` starts with at least `difficulty` `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    leading_zero_chars(hash) >= difficulty
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SealStrategy {
    #[default]
    Sequential,
    /// Splits the nonce range across the rayon pool. Still yields the smallest nonce.
    Parallel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sealer {
    difficulty: usize,
    max_nonce: u64,
    strategy: SealStrategy,
}

impl Sealer {
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty,
            max_nonce: DEFAULT_MAX_NONCE,
            strategy: SealStrategy::default(),
        }
    }

    pub fn with_max_nonce(mut self, max_nonce: u64) -> Self {
        self.max_nonce = max_nonce;
        self
    }

    pub fn with_strategy(mut self, strategy: SealStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn max_nonce(&self) -> u64 {
        self.max_nonce
    }

    pub fn strategy(&self) -> SealStrategy {
        self.strategy
    }

    /// Search nonces from 0 upward until the block digest has `difficulty`
    /// leading zero characters, then freeze the block with that nonce and hash.
    pub fn seal(&self, mut candidate: UnsealedBlock) -> Result<Block, SealError> {
        if self.difficulty > HASH_HEX_SIZE {
            return Err(SealError::DifficultyTooHigh {
                difficulty: self.difficulty,
                max: HASH_HEX_SIZE,
            });
        }

        let prefix = hash_prefix(&candidate.header, &candidate.vote);
        let found = match self.strategy {
            SealStrategy::Sequential => self.search_sequential(&prefix),
            SealStrategy::Parallel => self.search_parallel(&prefix),
        };
        let (nonce, hash) = found.ok_or(SealError::NonceExhausted {
            difficulty: self.difficulty,
            max_nonce: self.max_nonce,
        })?;

        candidate.header.nonce = nonce;
        info!(
            "Sealed block {} with nonce {} and hash {}",
            candidate.header.index, nonce, hash
        );
        Ok(Block::sealed(candidate, hash))
    }

    fn search_sequential(&self, prefix: &[u8]) -> Option<(u64, String)> {
        for nonce in 0..=self.max_nonce {
            let hash = digest_with_nonce(prefix, nonce);
            if meets_difficulty(&hash, self.difficulty) {
                return Some((nonce, hash));
            }
        }
        None
    }

    fn search_parallel(&self, prefix: &[u8]) -> Option<(u64, String)> {
        // find_first keeps the lowest qualifying nonce, same as the sequential walk.
        let nonce = (0..=self.max_nonce)
            .into_par_iter()
            .find_first(|nonce| meets_difficulty(&digest_with_nonce(prefix, *nonce), self.difficulty))?;
        Some((nonce, digest_with_nonce(prefix, nonce)))
    }
}

impl Default for Sealer {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_DIFFICULTY)
    }
}
