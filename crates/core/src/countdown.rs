use std::time::Duration;

/// Progress-bar view of a countdown, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownProgress {
    pub max_secs: u64,
    pub remaining_secs: u64,
}

impl CountdownProgress {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }
}

/// Remaining time for the question on screen.
///
/// Holds no timer of its own; a scheduler reports ticks and the countdown keeps
/// the latest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
    remaining: Duration,
}

impl Countdown {
    #[must_use]
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Record a tick; values above the total are clamped.
    pub fn tick(&mut self, remaining: Duration) -> CountdownProgress {
        self.remaining = remaining.min(self.total);
        self.progress()
    }

    pub fn expire(&mut self) -> CountdownProgress {
        self.remaining = Duration::ZERO;
        self.progress()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    #[must_use]
    pub fn progress(&self) -> CountdownProgress {
        CountdownProgress {
            max_secs: ceil_secs(self.total),
            remaining_secs: ceil_secs(self.remaining),
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
