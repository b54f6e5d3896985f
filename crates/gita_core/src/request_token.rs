//! crates/gita_core/src/request_token.rs
//!
//! Tokens for telling a current request apart from a superseded one. A slot
//! (for example "the chapter being read") issues a new token for every
//! request; when a response arrives it is only applied if its token is still
//! the latest one issued for that slot.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token that supersedes every earlier one.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }

    /// The most recently issued token, if any.
    pub fn current(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::Acquire) {
            0 => None,
            id => Some(RequestToken(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_supersedes_older() {
        let tracker = RequestTracker::new();
        let first = tracker.issue();
        assert!(tracker.is_current(first));

        let second = tracker.issue();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert_eq!(tracker.current(), Some(second));
    }

    #[test]
    fn fresh_tracker_has_no_current_token() {
        assert_eq!(RequestTracker::new().current(), None);
    }
}
