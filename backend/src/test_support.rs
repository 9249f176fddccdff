//! Shared fixtures for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{LimitParams, SubscriptionPlan, SubscriptionPlanDraft};

/// Clock pinned to a single instant.
pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 15, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

/// A description long enough to pass validation.
pub fn long_description() -> String {
    "Covers weekly assessments, printable material packs, and automated marking for a \
     whole class, with progress reports delivered to every teacher at the end of term."
        .to_owned()
}

pub fn plan_draft() -> SubscriptionPlanDraft {
    SubscriptionPlanDraft {
        name: "Gold".to_owned(),
        description: long_description(),
        duration_in_days: 30,
        amount_in_usd: 10.0,
        limit: LimitParams {
            max_questions: 40,
            max_materials: 3,
            max_upload_size: 5,
            teacher_count: 20,
        },
        subscription_type: "personal".to_owned(),
        is_active: true,
    }
}

/// A valid plan without an id.
pub fn plan() -> SubscriptionPlan {
    SubscriptionPlan::new(plan_draft()).expect("valid plan draft")
}
