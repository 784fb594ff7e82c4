//! Request versioning for coaching calls
//!
//! Every coaching request for a target takes a token from a single
//! monotonically increasing counter. A response is accepted only while its
//! token is still the newest one issued for that target, so a later request
//! always wins regardless of which reply arrives first. Dismissing a target
//! forgets its token and any late reply is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::ai::{CoachingResult, ContentIdea, GoalStrategy};

/// What a coaching result belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoachTarget {
    /// General or recognition review of the whole budget
    Overview,
    /// Strategy for a goal id
    Goal(String),
    /// Intervention on a transaction id
    Transaction(String),
    ContentIdea,
}

impl std::fmt::Display for CoachTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overview => write!(f, "overview"),
            Self::Goal(id) => write!(f, "goal:{}", id),
            Self::Transaction(id) => write!(f, "transaction:{}", id),
            Self::ContentIdea => write!(f, "content-idea"),
        }
    }
}

/// Version stamp of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Newest outstanding token per target
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: AtomicU64,
    pending: Mutex<HashMap<CoachTarget, RequestToken>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for `target`, superseding any earlier one
    pub fn begin(&self, target: CoachTarget) -> RequestToken {
        let token = RequestToken(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        debug!(%target, token = token.0, "Coaching request started");
        self.pending().insert(target, token);
        token
    }

    /// Whether `token` is still the newest for `target`
    pub fn is_current(&self, target: &CoachTarget, token: RequestToken) -> bool {
        self.pending().get(target) == Some(&token)
    }

    /// Retire `token`; returns false when it was superseded or cancelled
    pub fn finish(&self, target: &CoachTarget, token: RequestToken) -> bool {
        let mut pending = self.pending();
        if pending.get(target) == Some(&token) {
            pending.remove(target);
            true
        } else {
            false
        }
    }

    /// Forget the outstanding token for `target`
    pub fn cancel(&self, target: &CoachTarget) {
        self.pending().remove(target);
    }

    pub fn is_loading(&self, target: &CoachTarget) -> bool {
        self.pending().contains_key(target)
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<CoachTarget, RequestToken>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// An accepted coaching result
#[derive(Debug, Clone, PartialEq)]
pub enum CoachOutcome {
    Insight(CoachingResult),
    Strategy(GoalStrategy),
    Content(ContentIdea),
}

/// Latest accepted result per target, held in memory only
#[derive(Debug, Default)]
pub struct InsightBoard {
    tracker: RequestTracker,
    results: Mutex<HashMap<CoachTarget, CoachOutcome>>,
}

impl InsightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `target`, dropping whatever result it showed
    pub fn begin(&self, target: CoachTarget) -> RequestToken {
        self.results().remove(&target);
        self.tracker.begin(target)
    }

    /// Store `outcome` if `token` is still current
    ///
    /// Returns false and drops the outcome when the request was superseded
    /// or its target dismissed in the meantime.
    pub fn accept(&self, target: &CoachTarget, token: RequestToken, outcome: CoachOutcome) -> bool {
        if !self.tracker.finish(target, token) {
            warn!(%target, token = token.0, "Discarding stale coaching response");
            return false;
        }
        self.results().insert(target.clone(), outcome);
        true
    }

    /// Clear the loading state after a failed call
    pub fn fail(&self, target: &CoachTarget, token: RequestToken) {
        self.tracker.finish(target, token);
    }

    pub fn get(&self, target: &CoachTarget) -> Option<CoachOutcome> {
        self.results().get(target).cloned()
    }

    pub fn is_loading(&self, target: &CoachTarget) -> bool {
        self.tracker.is_loading(target)
    }

    /// Close a target: drop its result and ignore any reply still in flight
    pub fn dismiss(&self, target: &CoachTarget) {
        self.tracker.cancel(target);
        self.results().remove(target);
    }

    /// Forget the strategy tied to a goal
    pub fn invalidate_goal(&self, goal_id: &str) {
        self.dismiss(&CoachTarget::Goal(goal_id.to_string()));
    }

    fn results(&self) -> MutexGuard<'_, HashMap<CoachTarget, CoachOutcome>> {
        self.results.lock().unwrap_or_else(|e| e.into_inner())
    }
}
