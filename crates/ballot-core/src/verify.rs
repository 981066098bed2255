use crate::{block::Block, constants::GENESIS_HASH, pow::meets_difficulty};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// How thoroughly a chain is checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Only `previous_hash` linkage between neighbours.
    LinkageOnly,
    /// Linkage plus genesis shape, indices, recomputed digests, proof-of-work
    /// and voter uniqueness.
    #[default]
    Full,
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    #[error("chain has no genesis block")]
    MissingGenesis,
    #[error("genesis block does not carry the sentinel index and hashes")]
    BadGenesis,
    #[error("expected index {expected}, found {found}")]
    IndexGap { expected: u64, found: u64 },
    #[error("previous_hash {found} does not match preceding hash {expected}")]
    BrokenLink { expected: String, found: String },
    #[error("stored hash {found} does not match recomputed {expected}")]
    HashMismatch { expected: String, found: String },
    #[error("hash lacks {difficulty} leading zeros")]
    InsufficientWork { difficulty: usize },
    #[error("voter {voter_id} already appears earlier in the chain")]
    DuplicateVoter { voter_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("block at position {position}: {kind}")]
pub struct IntegrityViolation {
    pub position: usize,
    pub kind: ViolationKind,
}

impl IntegrityViolation {
    fn new(position: usize, kind: ViolationKind) -> Self {
        Self { position, kind }
    }
}

/// Every violation in chain order. Empty means the chain is sound.
pub fn audit_chain(blocks: &[Block], difficulty: usize, mode: Validation) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();
    let full = mode == Validation::Full;

    if full {
        match blocks.first() {
            None => violations.push(IntegrityViolation::new(0, ViolationKind::MissingGenesis)),
            Some(genesis)
                if genesis.index() != 0
                    || genesis.hash() != GENESIS_HASH
                    || genesis.previous_hash() != GENESIS_HASH =>
            {
                violations.push(IntegrityViolation::new(0, ViolationKind::BadGenesis))
            }
            Some(_) => {}
        }
    }

    let mut voters = HashSet::new();
    for (position, pair) in blocks.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let position = position + 1;

        if current.previous_hash() != previous.hash() {
            violations.push(IntegrityViolation::new(
                position,
                ViolationKind::BrokenLink {
                    expected: previous.hash().to_string(),
                    found: current.previous_hash().to_string(),
                },
            ));
        }
        if !full {
            continue;
        }

        if current.index() != position as u64 {
            violations.push(IntegrityViolation::new(
                position,
                ViolationKind::IndexGap {
                    expected: position as u64,
                    found: current.index(),
                },
            ));
        }
        let recomputed = current.compute_hash();
        if recomputed != current.hash() {
            violations.push(IntegrityViolation::new(
                position,
                ViolationKind::HashMismatch {
                    expected: recomputed,
                    found: current.hash().to_string(),
                },
            ));
        }
        if !meets_difficulty(current.hash(), difficulty) {
            violations.push(IntegrityViolation::new(
                position,
                ViolationKind::InsufficientWork { difficulty },
            ));
        }
        if !voters.insert(current.vote().voter_id.as_str()) {
            violations.push(IntegrityViolation::new(
                position,
                ViolationKind::DuplicateVoter {
                    voter_id: current.vote().voter_id.clone(),
                },
            ));
        }
    }
    violations
}

/// Reports the earliest violation only.
pub fn verify_chain(blocks: &[Block], difficulty: usize, mode: Validation) -> Result<(), IntegrityViolation> {
    match audit_chain(blocks, difficulty, mode).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}
