//! Retention decay and revision flags
//!
//! Exponential forgetting curve: `retention *= e^(-k * days)`. With
//! `k = 0.08` an untouched topic loses half its retention in about nine days.
//!
//! Each topic records the date decay was last applied through, so running
//! the pass again on the same day is a no-op.

use chrono::NaiveDate;
use tracing::debug;

use crate::model::{LearnerState, TopicState};

use super::round_dp;

/// Forgetting rate per day
pub const DECAY_RATE: f64 = 0.08;

/// Below this retention a studied topic is always due for revision
const RETENTION_FLOOR: f64 = 0.6;

/// Idle topics at or above this familiarity are not forced into revision
const FAMILIARITY_CEILING: f64 = 0.75;

/// Age every studied topic in `state` to `today` and recompute revision flags.
pub fn apply_decay(state: &LearnerState, today: NaiveDate) -> LearnerState {
    let mut decayed = state.clone();
    for (name, topic) in decayed.topic_states.iter_mut() {
        *topic = decay_topic(*topic, today);
        if topic.revision_due {
            debug!("{} due for revision (retention {:.3})", name, topic.retention);
        }
    }

    debug!(
        "Decay applied through {}: {} of {} topics due for revision",
        today,
        decayed.revision_due_count(),
        decayed.topic_states.len()
    );
    decayed
}

/// Decay a single topic to `today`.
///
/// Never-studied topics keep their retention and are never due: they are new
/// material, not revision.
pub fn decay_topic(topic: TopicState, today: NaiveDate) -> TopicState {
    let mut topic = topic.normalized();

    let Some(last_studied) = topic.last_studied else {
        topic.revision_due = false;
        return topic;
    };

    let anchor = topic
        .decayed_through
        .map_or(last_studied, |through| through.max(last_studied));
    let elapsed = (today - anchor).num_days();
    if elapsed > 0 {
        let retention = topic.retention * (-DECAY_RATE * elapsed as f64).exp();
        topic.retention = round_dp(retention.max(0.0), 3);
        topic.decayed_through = Some(today);
    }

    let gap = (today - last_studied).num_days();
    let threshold = topic.complexity_or_default().revision_threshold_days();
    topic.revision_due = (gap >= threshold && topic.familiarity < FAMILIARITY_CEILING)
        || topic.retention < RETENTION_FLOOR;

    topic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Complexity;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn studied(familiarity: f64, complexity: Complexity, on: NaiveDate) -> TopicState {
        TopicState {
            familiarity,
            confidence: familiarity / 2.0,
            retention: 1.0,
            attempts: 1,
            last_studied: Some(on),
            complexity: Some(complexity),
            ..TopicState::default()
        }
    }

    #[test]
    fn test_retention_halves_in_about_nine_days() {
        let topic = decay_topic(studied(0.9, Complexity::Easy, day(1)), day(10));
        // e^(-0.72) = 0.4868
        assert_eq!(topic.retention, 0.487);
        assert!(topic.revision_due, "retention under the floor forces revision");
    }

    #[test]
    fn test_threshold_by_complexity() {
        // Three idle days: due for Hard, not for Medium or Easy
        let hard = decay_topic(studied(0.5, Complexity::Hard, day(1)), day(4));
        let medium = decay_topic(studied(0.5, Complexity::Medium, day(1)), day(4));
        let easy = decay_topic(studied(0.5, Complexity::Easy, day(1)), day(4));
        assert!(hard.revision_due);
        assert!(!medium.revision_due);
        assert!(!easy.revision_due);
        // e^(-0.24) = 0.7866
        assert_eq!(hard.retention, 0.787);
    }

    #[test]
    fn test_familiar_topic_not_due_on_gap_alone() {
        let topic = decay_topic(studied(0.8, Complexity::Hard, day(1)), day(5));
        assert!(topic.retention >= 0.6);
        assert!(!topic.revision_due);
    }

    #[test]
    fn test_missing_complexity_uses_medium_threshold() {
        let mut topic = studied(0.3, Complexity::Medium, day(1));
        topic.complexity = None;
        assert!(!decay_topic(topic, day(5)).revision_due);
        assert!(decay_topic(topic, day(6)).revision_due);
    }

    #[test]
    fn test_never_studied_is_untouched() {
        let topic = TopicState {
            retention: 0.5,
            revision_due: true,
            ..TopicState::default()
        };
        let decayed = decay_topic(topic, day(20));
        assert_eq!(decayed.retention, 0.5);
        assert!(!decayed.revision_due);
    }

    #[test]
    fn test_same_day_decay_is_idempotent() {
        let mut state = LearnerState::default();
        state
            .topic_states
            .insert("Heaps".into(), studied(0.4, Complexity::Medium, day(2)));

        let once = apply_decay(&state, day(9));
        let twice = apply_decay(&once, day(9));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_incremental_decay_accumulates() {
        let topic = studied(0.4, Complexity::Medium, day(1));
        let stepwise = decay_topic(decay_topic(topic, day(4)), day(8));
        let direct = decay_topic(topic, day(8));
        assert!((stepwise.retention - direct.retention).abs() <= 0.002);
    }

    #[test]
    fn test_earlier_day_does_not_decay() {
        let topic = decay_topic(studied(0.4, Complexity::Easy, day(10)), day(12));
        let back = decay_topic(topic, day(11));
        assert_eq!(back.retention, topic.retention);
    }

    proptest! {
        #[test]
        fn prop_decay_idempotent(
            familiarity in 0.0f64..=1.0,
            retention in 0.0f64..=1.0,
            studied_on in 1u32..=28,
            offset in 0i64..60,
        ) {
            let last = day(studied_on);
            let today = last + chrono::Duration::days(offset);
            let mut state = LearnerState::default();
            state.topic_states.insert("T".into(), TopicState {
                familiarity,
                confidence: familiarity,
                retention,
                last_studied: Some(last),
                ..TopicState::default()
            });
            let once = apply_decay(&state, today);
            prop_assert_eq!(apply_decay(&once, today), once.clone());
            // Rounding to three places may nudge tiny values up by half a unit
            prop_assert!(once.topic("T").retention <= retention + 0.0005);
        }
    }
}
