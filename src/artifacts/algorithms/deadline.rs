use std::cell::Cell;
use std::time::{Duration, Instant};

/// Number of `is_valid` calls between two clock reads
pub const DEADLINE_POLL_INTERVAL: u32 = 64;

/// Cooperative time budget for a diff computation
///
/// The algorithms call `is_valid` from their inner loops, so reading the clock
/// on every call would dominate small diffs. The clock is read on the first call
/// and then once every `DEADLINE_POLL_INTERVAL` calls. Once expired, the deadline
/// stays expired.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Option<Instant>,
    polls: Cell<u32>,
    expired: Cell<bool>,
}

impl Deadline {
    pub fn infinite() -> Self {
        Self {
            expires_at: None,
            polls: Cell::new(0),
            expired: Cell::new(false),
        }
    }

    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + budget),
            ..Self::infinite()
        }
    }

    /// `0` means no time limit
    pub fn from_millis(millis: u32) -> Self {
        match millis {
            0 => Self::infinite(),
            millis => Self::after(Duration::from_millis(u64::from(millis))),
        }
    }

    pub fn is_valid(&self) -> bool {
        if self.expired.get() {
            return false;
        }
        let Some(expires_at) = self.expires_at else {
            return true;
        };

        let polls = self.polls.get();
        self.polls.set(polls.wrapping_add(1));

        if polls % DEADLINE_POLL_INTERVAL == 0 && Instant::now() >= expires_at {
            self.expired.set(true);
            return false;
        }

        true
    }

    pub fn has_expired(&self) -> bool {
        self.expired.get()
    }

    #[cfg(test)]
    pub(crate) fn polls(&self) -> u32 {
        self.polls.get()
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::infinite()
    }
}
