use crate::{
    block::{Block, Candidate, Payload},
    config::{check_difficulty, ChainConfig},
    constants::GENESIS_PREVIOUS_HASH,
    error::{ChainError, ValidationError},
    pow::{self, MineControl, MiningReport},
};
use tracing::{info, warn};

/// In-memory, append-only chain of proof-of-work blocks.
#[derive(Clone, Debug)]
pub struct Chain {
    blocks: Vec<Block>,
    difficulty: u32,
}

impl Default for Chain {
    fn default() -> Self {
        let config = ChainConfig::default();
        Self::with_genesis(config.difficulty, Payload::from(config.genesis_payload))
    }
}

impl Chain {
    pub fn new(config: &ChainConfig) -> Result<Self, ChainError> {
        config.validate()?;
        Ok(Self::with_genesis(
            config.difficulty,
            Payload::from(config.genesis_payload.as_str()),
        ))
    }

    fn with_genesis(difficulty: u32, genesis_payload: Payload) -> Self {
        let mut chain = Self {
            blocks: Vec::new(),
            difficulty,
        };
        chain.create_genesis_block(genesis_payload);
        chain
    }

    /// Genesis is sealed as created; it is exempt from proof-of-work.
    fn create_genesis_block(&mut self, payload: Payload) {
        self.blocks.push(genesis_block(payload));
    }

    pub fn latest_block(&self) -> Result<&Block, ChainError> {
        self.blocks.last().ok_or(ChainError::EmptyChain)
    }

    /// Mine a block carrying `payload` and append it. Blocks until a nonce is found.
    pub fn add_block(&mut self, payload: impl Into<Payload>) -> Result<&Block, ChainError> {
        self.add_block_with(payload, &MineControl::unbounded())
    }

    pub fn add_block_with(
        &mut self,
        payload: impl Into<Payload>,
        control: &MineControl,
    ) -> Result<&Block, ChainError> {
        self.add_block_with_report(payload, control)
            .map(|(block, _)| block)
    }

    /// Like [`Chain::add_block_with`], also returning how much work the search took.
    /// On error the chain is left unchanged.
    pub fn add_block_with_report(
        &mut self,
        payload: impl Into<Payload>,
        control: &MineControl,
    ) -> Result<(&Block, MiningReport), ChainError> {
        let previous = self.latest_block()?;
        let candidate = Candidate::new(
            self.blocks.len() as u64,
            payload.into(),
            previous.hash().to_string(),
        );
        let (block, report) = pow::mine(candidate, self.difficulty, control)?;
        info!(
            "Mined block {} with nonce {} and hash {} after {} attempts",
            block.index(),
            block.nonce(),
            block.hash(),
            report.attempts
        );
        self.blocks.push(block);
        Ok((self.latest_block()?, report))
    }

    /// Walk blocks 1.. and report the first one that was tampered with, whose stored
    /// hash is stale or whose link to its predecessor is broken. Genesis is the root
    /// of trust.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for pair in self.blocks.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);

            // A replacement payload can serialize to the same bytes as the original.
            if current.is_tampered() {
                let err = ValidationError::Tampered {
                    index: current.index(),
                };
                warn!("Chain validation failed: {err}");
                return Err(err);
            }

            let computed = current.compute_hash();
            if current.hash() != computed {
                let err = ValidationError::HashMismatch {
                    index: current.index(),
                    stored: current.hash().to_string(),
                    computed,
                };
                warn!("Chain validation failed: {err}");
                return Err(err);
            }

            if current.previous_hash() != previous.hash() {
                let err = ValidationError::BrokenLink {
                    index: current.index(),
                    expected: previous.hash().to_string(),
                    found: current.previous_hash().to_string(),
                };
                warn!("Chain validation failed: {err}");
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn is_chain_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Replace the payload of block `index` without rehashing or re-mining.
    /// Genesis and out-of-range indices are refused.
    pub fn tamper_block(
        &mut self,
        index: usize,
        payload: impl Into<Payload>,
    ) -> Result<(), ChainError> {
        let len = self.blocks.len();
        if index < 1 || index >= len {
            return Err(ChainError::InvalidBlockIndex { index, len });
        }
        let tampered = self.blocks[index].tampered(payload.into());
        self.blocks[index] = tampered;
        warn!("Block {index} has been tampered");
        Ok(())
    }

    /// Owned copy of every block, in order, for rendering.
    pub fn display_blockchain(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: genesis exists from construction.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Applies to blocks mined from now on. Existing blocks are not re-checked.
    pub fn set_difficulty(&mut self, difficulty: u32) -> Result<(), ChainError> {
        check_difficulty(difficulty)?;
        self.difficulty = difficulty;
        Ok(())
    }
}

/// Unmined block 0 carrying `payload` and the `"0"` sentinel previous hash.
pub fn genesis_block(payload: Payload) -> Block {
    Candidate::new(0, payload, GENESIS_PREVIOUS_HASH.to_string()).seal()
}
