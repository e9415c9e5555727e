//! Adaptive plan generation engine
//!
//! Pure, synchronous transformations over learner snapshots:
//! - [`apply_decay`] ages retention and recomputes revision flags
//! - [`score`] ranks topics by urgency for one learner
//! - [`allocate`] turns topics plus a decayed state into a day-by-day plan
//! - [`update`] folds a daily report into the next snapshot
//!
//! Nothing here performs I/O or holds state between calls.

use chrono::NaiveDate;

use crate::error::PlanError;
use crate::model::{LearnerState, Plan, Topic};

mod allocator;
mod decay;
mod initializer;
mod priority;
mod revision;
mod updater;

pub use allocator::{
    allocate, early_phase_days, effective_daily_hours, micro_test_questions, validate,
};
pub use decay::{apply_decay, decay_topic, DECAY_RATE};
pub use initializer::initialize;
pub use priority::score;
pub use revision::{revision_queue, RevisionCandidate};
pub use updater::update;

/// Decay `state` to `today`, then allocate a plan against it.
///
/// Returns the decayed state alongside the plan so callers can persist it.
pub fn plan_for(
    topics: &[Topic],
    state: &LearnerState,
    hours_per_day: f64,
    deadline_days: u32,
    today: NaiveDate,
) -> Result<(LearnerState, Plan), PlanError> {
    validate(topics, hours_per_day, deadline_days)?;
    let decayed = apply_decay(&state.clone().track_topics(topics), today);
    let plan = allocate(topics, &decayed, hours_per_day, deadline_days)?;
    Ok((decayed, plan))
}

/// Round half away from zero to `places` decimals
pub(crate) fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
