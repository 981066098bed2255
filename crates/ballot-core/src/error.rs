use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealError {
    #[error("difficulty {difficulty} exceeds the {max} hex characters of a digest")]
    DifficultyTooHigh { difficulty: usize, max: usize },

    #[error("no nonce up to {max_nonce} satisfies difficulty {difficulty}")]
    NonceExhausted { difficulty: usize, max_nonce: u64 },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("sealing failed: {0}")]
    Sealing(#[from] SealError),
}
