//! Subscription lifecycle classification.
//!
//! Buckets are derived from "now" and never stored:
//!
//! - active: paid and expiring after `now + 24h`;
//! - expired: paid and expiring at or before `now`;
//! - due: paid and expiring between UTC midnight five days ago and the end
//!   of today.
//!
//! The expired and due windows overlap for the trailing five days. Counting
//! queries keep the raw windows, while [`classify`] resolves the overlap in
//! favour of expired.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use super::subscriber::Subscription;

const DUE_LOOKBACK_DAYS: i64 = 5;
const ACTIVE_GRACE_HOURS: i64 = 24;

/// First instant strictly after `now + 24h`. Windows are inclusive, so the
/// active lower bound starts one tick past the boundary.
fn active_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(ACTIVE_GRACE_HOURS) + Duration::nanoseconds(1)
}

/// Inclusive expiry bounds; `None` leaves a side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ExpiryWindow {
    /// Whether `instant` lies within the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| instant >= from) && self.to.is_none_or(|to| instant <= to)
    }
}

/// The three windows evaluated for plan subscriber counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleWindows {
    pub active: ExpiryWindow,
    pub expired: ExpiryWindow,
    pub due: ExpiryWindow,
}

impl LifecycleWindows {
    /// Compute the windows relative to `now`.
    ///
    /// # Examples
    /// ```
    /// use assessmate::domain::LifecycleWindows;
    /// use chrono::{Duration, TimeZone, Utc};
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
    /// let windows = LifecycleWindows::at(now);
    /// assert_eq!(
    ///     windows.active.from,
    ///     Some(now + Duration::hours(24) + Duration::nanoseconds(1))
    /// );
    /// assert_eq!(windows.expired.to, Some(now));
    /// assert_eq!(
    ///     windows.due.from,
    ///     Some(Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap())
    /// );
    /// ```
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        let midnight = start_of_day(now);
        let end_of_today = midnight + Duration::days(1) - Duration::nanoseconds(1);
        Self {
            active: ExpiryWindow {
                from: Some(active_from(now)),
                to: None,
            },
            expired: ExpiryWindow {
                from: None,
                to: Some(now),
            },
            due: ExpiryWindow {
                from: Some(midnight - Duration::days(DUE_LOOKBACK_DAYS)),
                to: Some(end_of_today),
            },
        }
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Lifecycle bucket of a single subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Expired,
    Due,
}

/// Classify one subscription at `now`.
///
/// Unpaid subscriptions, and paid ones expiring between the end of today and
/// `now + 24h`, fall in no bucket.
#[must_use]
pub fn classify(subscription: &Subscription, now: DateTime<Utc>) -> Option<LifecycleState> {
    if !subscription.has_paid {
        return None;
    }
    let windows = LifecycleWindows::at(now);
    let expires_at = subscription.expires_at;
    if windows.expired.contains(expires_at) {
        Some(LifecycleState::Expired)
    } else if windows.active.contains(expires_at) {
        Some(LifecycleState::Active)
    } else if windows.due.contains(expires_at) {
        Some(LifecycleState::Due)
    } else {
        None
    }
}

/// Select the active subscription: the paid, unexpired one closest to expiry.
///
/// Returns `None` when nothing qualifies.
#[must_use]
pub fn select_active(subscriptions: &[Subscription], now: DateTime<Utc>) -> Option<&Subscription> {
    subscriptions
        .iter()
        .filter(|subscription| subscription.has_paid && subscription.expires_at > now)
        .min_by_key(|subscription| subscription.expires_at)
}
