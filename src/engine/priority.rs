//! Learner-aware topic urgency
//!
//! A weighted linear combination of how little is known, how much has been
//! forgotten, how hard the topic is, and whether it is flagged for revision.
//! The weights sum to 1 so scores stay within [0, 1].

use crate::model::{Complexity, LearnerState, Topic, TopicState};

use super::round_dp;

const FAMILIARITY_WEIGHT: f64 = 0.3;
const RETENTION_WEIGHT: f64 = 0.2;
const COMPLEXITY_WEIGHT: f64 = 0.3;
const REVISION_WEIGHT: f64 = 0.2;

/// Urgency of `topic` for this learner. Higher means schedule sooner.
///
/// Untracked topics score as never studied. Ties are left for the caller to
/// break.
pub fn score(topic: &Topic, state: &LearnerState) -> f64 {
    score_state(topic.complexity, &state.topic(&topic.name))
}

pub(crate) fn score_state(complexity: Complexity, state: &TopicState) -> f64 {
    let state = state.normalized();
    let revision = if state.revision_due { 1.0 } else { 0.0 };

    let priority = FAMILIARITY_WEIGHT * (1.0 - state.familiarity)
        + RETENTION_WEIGHT * (1.0 - state.retention)
        + COMPLEXITY_WEIGHT * complexity.normalized()
        + REVISION_WEIGHT * revision;

    round_dp(priority, 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state_with(familiarity: f64, retention: f64, revision_due: bool) -> TopicState {
        TopicState {
            familiarity,
            confidence: familiarity,
            retention,
            revision_due,
            ..TopicState::default()
        }
    }

    #[test]
    fn test_never_studied_topic() {
        let topic = Topic::new("Trees", Complexity::Medium, 4.0);
        let priority = score(&topic, &LearnerState::default());
        // 0.3 * 1 + 0.2 * 0 + 0.3 * 2/3 + 0
        assert!((priority - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_well_known_topic_scores_lower() {
        let topic = Topic::new("Arrays", Complexity::Easy, 2.0);

        let mut known = LearnerState::default();
        known
            .topic_states
            .insert("Arrays".into(), state_with(0.9, 0.95, false));

        let mut unknown = LearnerState::default();
        unknown.topic_states.insert(
            "Arrays".into(),
            TopicState {
                familiarity: 0.1,
                confidence: 0.1,
                retention: 0.95,
                ..TopicState::default()
            },
        );

        assert!(score(&topic, &known) < score(&topic, &unknown));
    }

    #[test]
    fn test_revision_flag_raises_priority() {
        let due = score_state(Complexity::Easy, &state_with(0.5, 0.7, true));
        let not_due = score_state(Complexity::Easy, &state_with(0.5, 0.7, false));
        assert!((due - not_due - REVISION_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounds() {
        let max = score_state(Complexity::Hard, &state_with(0.0, 0.0, true));
        let min = score_state(Complexity::Easy, &state_with(1.0, 1.0, false));
        assert!((max - 1.0).abs() < 1e-9);
        assert!((min - 0.1).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_familiarity_never_raises_priority(
            base in 0.0f64..=1.0,
            bump in 0.0f64..=1.0,
            retention in 0.0f64..=1.0,
            due in any::<bool>(),
        ) {
            let higher = (base + bump).min(1.0);
            let low = score_state(Complexity::Medium, &state_with(base, retention, due));
            let high = score_state(Complexity::Medium, &state_with(higher, retention, due));
            prop_assert!(high <= low);
        }

        #[test]
        fn prop_retention_never_raises_priority(
            familiarity in 0.0f64..=1.0,
            base in 0.0f64..=1.0,
            bump in 0.0f64..=1.0,
        ) {
            let higher = (base + bump).min(1.0);
            let low = score_state(Complexity::Hard, &state_with(familiarity, base, false));
            let high = score_state(Complexity::Hard, &state_with(familiarity, higher, false));
            prop_assert!(high <= low);
        }
    }
}
