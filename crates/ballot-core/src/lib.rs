pub mod block;
pub mod constants;
mod error;
pub mod hash;
pub mod ledger;
pub mod pow;
pub mod tally;
pub mod verify;

pub use block::{genesis_block, Block, BlockHeader, UnsealedBlock, Vote};
pub use error::{LedgerError, SealError};
pub use hash::{sha256, sha256_hex};
pub use ledger::{Ledger, VoteOutcome};
pub use pow::{SealStrategy, Sealer};
pub use tally::Tally;
pub use verify::{audit_chain, verify_chain, IntegrityViolation, Validation, ViolationKind};

pub type Hash = [u8; 32];
