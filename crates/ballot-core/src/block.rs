use crate::constants::{GENESIS_HASH, GENESIS_PLACEHOLDER_ID};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. A clock set before 1970 reads as 0.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn put_str(bytes: &mut Vec<u8>, s: &str) {
    bytes.extend_from_slice(&(s.len() as u64).to_le_bytes());
    bytes.extend_from_slice(s.as_bytes());
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: String,
    pub candidate_id: String,
    pub timestamp: u64,
}

impl Vote {
    pub fn new(voter_id: impl Into<String>, candidate_id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            voter_id: voter_id.into(),
            candidate_id: candidate_id.into(),
            timestamp,
        }
    }

    pub fn hash_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.voter_id.len() + 8 + self.candidate_id.len() + 8);
        put_str(&mut bytes, &self.voter_id);
        put_str(&mut bytes, &self.candidate_id);
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub index: u64,
    pub previous_hash: String,
    pub timestamp: u64,
    pub nonce: u64,
}

impl BlockHeader {
    pub fn new(index: u64, previous_hash: impl Into<String>, timestamp: u64) -> Self {
        Self {
            index,
            previous_hash: previous_hash.into(),
            timestamp,
            nonce: 0,
        }
    }
}

/// Canonical bytes of a block up to, but excluding, the nonce.
///
/// The nonce is always the trailing 8 bytes of the hashed message, so sealing
/// can build this prefix once and only append the nonce on each trial.
pub fn hash_prefix(header: &BlockHeader, vote: &Vote) -> Vec<u8> {
    let vote_bytes = vote.hash_bytes();
    let mut bytes = Vec::with_capacity(8 + 8 + header.previous_hash.len() + 8 + vote_bytes.len());
    bytes.extend_from_slice(&header.index.to_le_bytes());
    put_str(&mut bytes, &header.previous_hash);
    bytes.extend_from_slice(&header.timestamp.to_le_bytes());
    bytes.extend_from_slice(&vote_bytes);
    bytes
}

/// Hex digest of `prefix || nonce`.
pub fn digest_with_nonce(prefix: &[u8], nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prefix);
    hasher.update(nonce.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// A block that has not been sealed yet. Only the sealer moves its nonce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsealedBlock {
    pub header: BlockHeader,
    pub vote: Vote,
}

impl UnsealedBlock {
    pub fn new(index: u64, previous_hash: impl Into<String>, vote: Vote, timestamp: u64) -> Self {
        Self {
            header: BlockHeader::new(index, previous_hash, timestamp),
            vote,
        }
    }

    pub fn digest(&self) -> String {
        digest_with_nonce(&hash_prefix(&self.header, &self.vote), self.header.nonce)
    }
}

/// A sealed block as stored on the chain. Fields are read-only once sealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    header: BlockHeader,
    vote: Vote,
    hash: String,
}

impl Block {
    pub(crate) fn sealed(candidate: UnsealedBlock, hash: String) -> Self {
        Self {
            header: candidate.header,
            vote: candidate.vote,
            hash,
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    pub fn previous_hash(&self) -> &str {
        &self.header.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.header.nonce
    }

    pub fn vote(&self) -> &Vote {
        &self.vote
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.header.index == 0
    }

    /// Recompute the digest from the block's own fields.
    pub fn compute_hash(&self) -> String {
        digest_with_nonce(&hash_prefix(&self.header, &self.vote), self.header.nonce)
    }
}

/// Index 0, sentinel hashes, placeholder vote.
pub fn genesis_block() -> Block {
    let now = now_millis();
    Block {
        header: BlockHeader::new(0, GENESIS_HASH, now),
        vote: Vote::new(GENESIS_PLACEHOLDER_ID, GENESIS_PLACEHOLDER_ID, now),
        hash: GENESIS_HASH.to_string(),
    }
}
