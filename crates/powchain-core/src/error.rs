use thiserror::Error;

/// Errors surfaced by [`crate::Chain`] operations. All of them leave the chain unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("invalid block index {index}: only blocks 1..{len} can be modified")]
    InvalidBlockIndex { index: usize, len: usize },

    /// Genesis is created in the constructor, so this only fires on a broken invariant.
    #[error("chain has no blocks")]
    EmptyChain,

    #[error("difficulty {requested} is out of range (max {max})")]
    InvalidDifficulty { requested: u32, max: u32 },

    #[error(transparent)]
    Mining(#[from] MineError),
}

/// Reasons a proof-of-work search stopped without sealing a block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MineError {
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    #[error("no qualifying nonce found within {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },

    #[error("nonce space exhausted")]
    NonceSpaceExhausted,
}

/// First integrity failure found while walking the chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("block {index} was tampered with after sealing")]
    Tampered { index: u64 },

    #[error("block {index} hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch {
        index: u64,
        stored: String,
        computed: String,
    },

    #[error("block {index} does not link to its predecessor: expected {expected}, found {found}")]
    BrokenLink {
        index: u64,
        expected: String,
        found: String,
    },
}

impl ValidationError {
    /// Index of the block that failed validation.
    pub fn index(&self) -> u64 {
        match self {
            ValidationError::Tampered { index } => *index,
            ValidationError::HashMismatch { index, .. } => *index,
            ValidationError::BrokenLink { index, .. } => *index,
        }
    }
}
