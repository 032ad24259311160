use std::time::{Duration, Instant};

/// Wall-clock allowance for one top-level search.
///
/// Expiry is only ever polled; nothing interrupts a search already in flight.
#[derive(Debug, Clone, Copy)]
pub struct SearchBudget {
    start_time: Instant, // When we started thinking
    max_thinking_time: Option<Duration>, // How long we can think, `None` for no limit
}

impl SearchBudget {
    pub fn new(max_thinking_time: Option<Duration>) -> Self {
        Self {
            start_time: Instant::now(),
            max_thinking_time,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Restarts the clock; done once at the start of every root search.
    pub fn reset(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn max_thinking_time(&self) -> Option<Duration> {
        self.max_thinking_time
    }

    pub fn set_max_thinking_time(&mut self, max_thinking_time: Option<Duration>) {
        self.max_thinking_time = max_thinking_time;
    }

    pub fn is_expired(&self) -> bool {
        match self.max_thinking_time {
            Some(limit) => self.start_time.elapsed() >= limit,
            None => false,
        }
    }

    // Returns how long we've been thinking
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.max_thinking_time
            .map(|limit| limit.saturating_sub(self.start_time.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_expired_immediately() {
        let budget = SearchBudget::new(Some(Duration::ZERO));
        assert!(budget.is_expired());
        assert_eq!(budget.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn unlimited_budget_never_expires() {
        let budget = SearchBudget::unlimited();
        assert!(!budget.is_expired());
        assert_eq!(budget.remaining(), None);
    }

    #[test]
    fn reset_restarts_the_clock() {
        let mut budget = SearchBudget::new(Some(Duration::from_millis(200)));
        std::thread::sleep(Duration::from_millis(250));
        assert!(budget.is_expired());
        budget.reset();
        assert!(!budget.is_expired());
        budget.set_max_thinking_time(None);
        assert!(!budget.is_expired());
    }
}
