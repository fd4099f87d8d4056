//! Reconnect budget tracking

use crate::config::RetryPolicy;

/// Last reconnect attempt paired with a fixed timeout budget
///
/// Timestamps are milliseconds from a free-running `u32` counter;
/// elapsed time uses wrapping arithmetic so counter rollover is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReconnectTimer {
    last_attempt_ms: u32,
    budget_ms: u32,
    timed_out_at_ms: Option<u32>,
}

impl ReconnectTimer {
    /// Create a timer armed at `now_ms`
    pub const fn new(budget_ms: u32, now_ms: u32) -> Self {
        Self {
            last_attempt_ms: now_ms,
            budget_ms,
            timed_out_at_ms: None,
        }
    }

    /// Record an attempt at `now_ms`
    pub fn restart(&mut self, now_ms: u32) {
        self.last_attempt_ms = now_ms;
        self.timed_out_at_ms = None;
    }

    /// Check if the budget since the last attempt is used up
    pub fn expired(&self, now_ms: u32) -> bool {
        self.elapsed(now_ms) >= self.budget_ms
    }

    /// Time since the last attempt
    pub fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_attempt_ms)
    }

    /// Record that the budget ran out at `now_ms`
    pub fn mark_timed_out(&mut self, now_ms: u32) {
        self.timed_out_at_ms = Some(now_ms);
    }

    /// Check if a timed-out channel may be retried under `policy`
    pub fn retry_allowed(&self, policy: RetryPolicy, now_ms: u32) -> bool {
        match (policy, self.timed_out_at_ms) {
            (RetryPolicy::Terminal, _) => false,
            (RetryPolicy::Cooldown { after_ms }, Some(at)) => {
                now_ms.wrapping_sub(at) >= after_ms
            }
            // Timed out without a recorded time: retry right away
            (RetryPolicy::Cooldown { .. }, None) => true,
        }
    }

    pub fn last_attempt(&self) -> u32 {
        self.last_attempt_ms
    }

    pub fn timed_out_at(&self) -> Option<u32> {
        self.timed_out_at_ms
    }
}
