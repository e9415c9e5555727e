//! Learner proficiency model
//!
//! A [`LearnerState`] is a process-scoped snapshot for one learner. It is only
//! ever replaced wholesale by the decay model and the updater; callers never
//! observe a half-applied change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Complexity, Topic};

fn one() -> f64 {
    1.0
}

/// Per-topic proficiency estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicState {
    /// Estimated learning depth, [0, 1]
    #[serde(default)]
    pub familiarity: f64,
    /// Certainty about familiarity. Never exceeds it.
    #[serde(default)]
    pub confidence: f64,
    /// Current recall strength, [0, 1]
    #[serde(default = "one")]
    pub retention: f64,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_studied: Option<NaiveDate>,
    #[serde(default)]
    pub revision_due: bool,
    /// Tier of the topic, used to pick the revision threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    /// Date through which retention decay has already been applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decayed_through: Option<NaiveDate>,
}

impl Default for TopicState {
    /// A never-studied topic: nothing known, nothing forgotten yet
    fn default() -> Self {
        Self {
            familiarity: 0.0,
            confidence: 0.0,
            retention: 1.0,
            attempts: 0,
            last_studied: None,
            revision_due: false,
            complexity: None,
            decayed_through: None,
        }
    }
}

impl TopicState {
    /// Retention assigned to topics seeded at learner initialization
    pub const INITIAL_RETENTION: f64 = 0.5;

    /// State for a topic seeded from a prior-knowledge estimate.
    ///
    /// Confidence mirrors the familiarity estimate.
    pub fn initial(familiarity: f64, complexity: Complexity) -> Self {
        Self {
            familiarity,
            confidence: familiarity,
            retention: Self::INITIAL_RETENTION,
            complexity: Some(complexity),
            ..Self::default()
        }
        .normalized()
    }

    /// Clamp every estimate into range and cap confidence at familiarity.
    ///
    /// Non-finite values fall back to the field default.
    pub fn normalized(mut self) -> Self {
        self.familiarity = unit_or(self.familiarity, 0.0);
        self.retention = unit_or(self.retention, 1.0);
        self.confidence = unit_or(self.confidence, 0.0).min(self.familiarity);
        self
    }

    /// Complexity to use for threshold lookups when none was recorded
    pub fn complexity_or_default(&self) -> Complexity {
        self.complexity.unwrap_or(Complexity::Medium)
    }
}

fn unit_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// One audited day of study. Appended, never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub actual_hours: f64,
    pub expected_hours: f64,
}

/// Evolving proficiency model for a single learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerState {
    /// Ratio of actual to expected pace, exponentially smoothed
    #[serde(default = "one")]
    pub learning_speed: f64,
    /// [0.5, 1.0]; drops on chronic under-study
    #[serde(default = "one")]
    pub consistency: f64,
    #[serde(default)]
    pub topic_states: BTreeMap<String, TopicState>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Default for LearnerState {
    fn default() -> Self {
        Self {
            learning_speed: 1.0,
            consistency: 1.0,
            topic_states: BTreeMap::new(),
            history: Vec::new(),
        }
    }
}

impl LearnerState {
    /// State of a topic, or the never-studied default if untracked
    pub fn topic(&self, name: &str) -> TopicState {
        self.topic_states.get(name).copied().unwrap_or_default()
    }

    /// Make sure every topic in `topics` is tracked and tagged with its tier.
    ///
    /// Untracked topics get an initial state with no prior familiarity.
    /// Existing estimates are left alone apart from the complexity tag.
    pub fn track_topics(mut self, topics: &[Topic]) -> Self {
        for topic in topics {
            self.topic_states
                .entry(topic.name.clone())
                .and_modify(|state| state.complexity = Some(topic.complexity))
                .or_insert_with(|| TopicState::initial(0.0, topic.complexity));
        }
        self
    }

    /// Number of topics currently flagged for revision
    pub fn revision_due_count(&self) -> usize {
        self.topic_states.values().filter(|s| s.revision_due).count()
    }
}
