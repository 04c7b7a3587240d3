use crate::{
    constants::{DEFAULT_DIFFICULTY, GENESIS_PAYLOAD, MAX_DIFFICULTY},
    error::ChainError,
};
use serde::{Deserialize, Serialize};

/// Settings a [`crate::Chain`] is created with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Leading zero hex digits required of every mined block.
    pub difficulty: u32,
    /// Single item carried by the genesis block.
    pub genesis_payload: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            genesis_payload: GENESIS_PAYLOAD.to_string(),
        }
    }
}

impl ChainConfig {
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        check_difficulty(self.difficulty)
    }
}

pub(crate) fn check_difficulty(difficulty: u32) -> Result<(), ChainError> {
    if difficulty > MAX_DIFFICULTY {
        return Err(ChainError::InvalidDifficulty {
            requested: difficulty,
            max: MAX_DIFFICULTY,
        });
    }
    Ok(())
}
