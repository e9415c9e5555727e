//! Revision queue
//!
//! Orders revision-due topics so the weakest recall comes first. The head of
//! the queue is what the allocator's daily revision slot reviews.

use serde::Serialize;

use crate::model::LearnerState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionCandidate {
    pub topic: String,
    pub retention: f64,
    pub familiarity: f64,
    pub attempts: u32,
}

/// Revision-due topics, lowest retention first, then most attempts, then name.
pub fn revision_queue(state: &LearnerState, limit: usize) -> Vec<RevisionCandidate> {
    let mut queue: Vec<RevisionCandidate> = state
        .topic_states
        .iter()
        .filter(|(_, s)| s.revision_due)
        .map(|(name, s)| RevisionCandidate {
            topic: name.clone(),
            retention: s.retention,
            familiarity: s.familiarity,
            attempts: s.attempts,
        })
        .collect();

    queue.sort_by(|a, b| {
        a.retention
            .total_cmp(&b.retention)
            .then(b.attempts.cmp(&a.attempts))
            .then_with(|| a.topic.cmp(&b.topic))
    });
    queue.truncate(limit);
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TopicState;

    fn due(retention: f64, attempts: u32) -> TopicState {
        TopicState {
            familiarity: 0.4,
            confidence: 0.2,
            retention,
            attempts,
            revision_due: true,
            ..TopicState::default()
        }
    }

    #[test]
    fn test_queue_order() {
        let mut state = LearnerState::default();
        state.topic_states.insert("Graphs".into(), due(0.55, 1));
        state.topic_states.insert("Arrays".into(), due(0.40, 2));
        state.topic_states.insert("Heaps".into(), due(0.40, 5));
        state.topic_states.insert("Tries".into(), due(0.40, 5));
        state
            .topic_states
            .insert("Sorting".into(), TopicState::default());

        let queue = revision_queue(&state, 10);
        let names: Vec<_> = queue.iter().map(|c| c.topic.as_str()).collect();
        assert_eq!(names, vec!["Heaps", "Tries", "Arrays", "Graphs"]);
    }

    #[test]
    fn test_queue_limit() {
        let mut state = LearnerState::default();
        for (i, name) in ["A", "B", "C"].iter().enumerate() {
            state
                .topic_states
                .insert(name.to_string(), due(0.1 * i as f64, 0));
        }
        assert_eq!(revision_queue(&state, 2).len(), 2);
        assert!(revision_queue(&state, 0).is_empty());
        assert!(revision_queue(&LearnerState::default(), 5).is_empty());
    }
}
