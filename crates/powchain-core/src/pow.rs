//! Proof-of-work: a nonce search until the hex hash starts with `difficulty` zero digits.

use crate::{
    block::{Block, Candidate},
    error::MineError,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::debug;

/// Count of leading `'0'` characters in a hex digest.
pub fn leading_zero_digits(hash: &str) -> u32 {
    hash.bytes().take_while(|b| *b == b'0').count() as u32
}

pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    leading_zero_digits(hash) >= difficulty
}

/// Shared flag a miner polls between attempts. Once triggered it stays set.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Limits on a single nonce search. The default searches until a nonce is found.
#[derive(Clone, Debug, Default)]
pub struct MineControl {
    pub max_attempts: Option<u64>,
    pub cancel: Option<CancelFlag>,
}

impl MineControl {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_triggered)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MiningReport {
    /// Hashes checked against the target, the winning one included.
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Mine `candidate` by incrementing its nonce until the hash has at least
/// `difficulty` leading zero hex digits, then seal it.
pub fn mine(
    mut candidate: Candidate,
    difficulty: u32,
    control: &MineControl,
) -> Result<(Block, MiningReport), MineError> {
    debug!(
        "Mining block {} at difficulty {}",
        candidate.header().index,
        difficulty
    );
    let started = Instant::now();
    let mut attempts = 0u64;
    loop {
        if control.is_cancelled() {
            return Err(MineError::Cancelled { attempts });
        }
        attempts = attempts.saturating_add(1);
        if meets_difficulty(candidate.hash(), difficulty) {
            break;
        }
        if control.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(MineError::AttemptsExhausted { attempts });
        }
        candidate
            .advance_nonce()
            .ok_or(MineError::NonceSpaceExhausted)?;
    }

    let report = MiningReport {
        attempts,
        elapsed: started.elapsed(),
    };
    Ok((candidate.seal(), report))
}
