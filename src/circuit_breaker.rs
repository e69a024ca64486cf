//! # Circuit Breaker Module
//!
//! Stops calling Tesseract for a while after repeated failures, so a broken
//! OCR install answers every photo with the failure notice immediately
//! instead of hanging on each one.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::ocr_config::RecoveryConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure: Option<Instant>,
}

/// Circuit breaker for OCR operations
///
/// - **Closed**: failures below the threshold, calls pass through
/// - **Open**: threshold reached, calls fail fast until the reset timeout
/// - After the reset timeout the breaker closes again and the next call is tried
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    threshold: u32,
    reset_after: Duration,
}

impl CircuitBreaker {
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            threshold: config.circuit_breaker_threshold,
            reset_after: Duration::from_secs(config.circuit_breaker_reset_secs),
        }
    }

    // The state is two plain counters, so a poisoned lock is still usable.
    fn state(&self) -> MutexGuard<'_, BreakerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `true` while calls should be rejected without trying OCR
    pub fn is_open(&self) -> bool {
        let mut state = self.state();
        if state.failure_count < self.threshold {
            return false;
        }
        match state.last_failure {
            Some(at) if at.elapsed() < self.reset_after => true,
            _ => {
                *state = BreakerState::default();
                false
            }
        }
    }

    pub fn record_failure(&self) {
        let mut state = self.state();
        state.failure_count = state.failure_count.saturating_add(1);
        state.last_failure = Some(Instant::now());
    }

    pub fn record_success(&self) {
        *self.state() = BreakerState::default();
    }

    pub fn failure_count(&self) -> u32 {
        self.state().failure_count
    }
}
