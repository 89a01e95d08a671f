//! Notification suppression ledger and the wall clock it reads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::ProductId;

/// Window during which a repeated notification for the same subject is
/// suppressed, in milliseconds.
pub const SUPPRESSION_WINDOW_MS: i64 = 2000;

/// Source of wall-clock time for the suppression window.
pub trait Clock {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the shop.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward by `millis` milliseconds.
    pub fn advance_millis(&self, millis: i64) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += TimeDelta::milliseconds(millis);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// What a notification is about.
///
/// Each subject maps to one ledger key, so adding and removing the same
/// product are throttled independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject<'a> {
    CartAdd(&'a ProductId),
    CartRemove(&'a ProductId),
    Favorite(&'a ProductId),
}

impl Subject<'_> {
    /// Ledger key for this subject.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::CartAdd(id) => format!("cart-{id}"),
            Self::CartRemove(id) => format!("remove-{id}"),
            Self::Favorite(id) => format!("fav-{id}"),
        }
    }
}

/// Last time a notification was shown, per subject key.
///
/// Entries are created on first use and refreshed every time a notification
/// is let through. They are never evicted; the key space is bounded by the
/// number of distinct products.
#[derive(Debug, Clone, Default)]
pub struct SuppressionLedger {
    last_shown: HashMap<String, DateTime<Utc>>,
}

impl SuppressionLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a notification for `subject` may be shown at `now`.
    ///
    /// Returns `true` and records `now` when the subject has never been
    /// shown or was last shown more than [`SUPPRESSION_WINDOW_MS`] ago.
    /// Otherwise returns `false` and leaves the entry untouched.
    pub fn admit(&mut self, subject: &Subject<'_>, now: DateTime<Utc>) -> bool {
        let key = subject.key();
        let window = TimeDelta::milliseconds(SUPPRESSION_WINDOW_MS);
        if let Some(&last) = self.last_shown.get(&key)
            && now - last <= window
        {
            return false;
        }
        self.last_shown.insert(key, now);
        true
    }

    /// When a notification for `subject` was last shown.
    #[must_use]
    pub fn last_shown(&self, subject: &Subject<'_>) -> Option<DateTime<Utc>> {
        self.last_shown.get(&subject.key()).copied()
    }

    /// Number of subjects seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_shown.len()
    }

    /// Whether no notification has been shown yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_shown.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_keys() {
        let id = ProductId::from("p1");
        assert_eq!(Subject::CartAdd(&id).key(), "cart-p1");
        assert_eq!(Subject::CartRemove(&id).key(), "remove-p1");
        assert_eq!(Subject::Favorite(&id).key(), "fav-p1");
    }

    #[test]
    fn test_first_use_is_admitted_and_recorded() {
        let clock = ManualClock::default();
        let id = ProductId::from("p1");
        let subject = Subject::CartAdd(&id);
        let mut ledger = SuppressionLedger::new();

        assert!(ledger.admit(&subject, clock.now()));
        assert_eq!(ledger.last_shown(&subject), Some(clock.now()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let clock = ManualClock::default();
        let id = ProductId::from("p1");
        let subject = Subject::Favorite(&id);
        let mut ledger = SuppressionLedger::new();

        assert!(ledger.admit(&subject, clock.now()));
        clock.advance_millis(SUPPRESSION_WINDOW_MS);
        assert!(!ledger.admit(&subject, clock.now()));
        clock.advance_millis(1);
        assert!(ledger.admit(&subject, clock.now()));
    }

    #[test]
    fn test_suppressed_attempt_does_not_extend_window() {
        let clock = ManualClock::default();
        let id = ProductId::from("p1");
        let subject = Subject::CartAdd(&id);
        let mut ledger = SuppressionLedger::new();

        assert!(ledger.admit(&subject, clock.now()));
        clock.advance_millis(1500);
        assert!(!ledger.admit(&subject, clock.now()));
        clock.advance_millis(501);
        assert!(ledger.admit(&subject, clock.now()));
    }

    #[test]
    fn test_subjects_are_independent() {
        let clock = ManualClock::default();
        let id = ProductId::from("p1");
        let mut ledger = SuppressionLedger::new();

        assert!(ledger.admit(&Subject::CartAdd(&id), clock.now()));
        assert!(ledger.admit(&Subject::CartRemove(&id), clock.now()));
        assert!(ledger.admit(&Subject::Favorite(&id), clock.now()));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let handle = clock.clone();
        handle.advance_millis(250);
        assert_eq!(clock.now(), DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(250));
    }
}
