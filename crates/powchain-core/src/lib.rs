//! Chain integrity engine for a single-process proof-of-work ledger:
//! block hashing, nonce mining and chain validation.

pub mod block;
pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod pow;

pub use block::{block_hash, Block, BlockHeader, Candidate, Payload};
pub use chain::{genesis_block, Chain};
pub use config::ChainConfig;
pub use error::{ChainError, MineError, ValidationError};
pub use pow::{CancelFlag, MineControl, MiningReport};
