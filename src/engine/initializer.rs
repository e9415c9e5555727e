//! Fresh learner state for a new learner

use std::collections::BTreeMap;

use crate::model::{LearnerState, Topic, TopicState};

/// Seed a learner from a topic list and optional prior-knowledge scores.
///
/// Scores are clamped to [0, 1]; topics without one start at zero.
pub fn initialize(topics: &[Topic], familiarity_scores: &BTreeMap<String, f64>) -> LearnerState {
    let topic_states = topics
        .iter()
        .map(|topic| {
            let familiarity = familiarity_scores.get(&topic.name).copied().unwrap_or(0.0);
            (topic.name.clone(), TopicState::initial(familiarity, topic.complexity))
        })
        .collect();

    LearnerState {
        topic_states,
        ..LearnerState::default()
    }
}
