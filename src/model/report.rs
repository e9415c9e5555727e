//! Daily session reports fed back into the learner model

use serde::{Deserialize, Serialize};

/// Time actually spent on one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    #[serde(alias = "topic_id")]
    pub topic: String,
    pub hours: f64,
}

/// Outcome of one micro-test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroTestResult {
    #[serde(alias = "topic_id")]
    pub topic: String,
    /// Fraction answered correctly, [0, 1]
    pub score: f64,
}

/// What a learner actually did on one day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    #[serde(default)]
    pub study_sessions: Vec<StudyReport>,
    #[serde(default)]
    pub micro_tests: Vec<MicroTestResult>,
    #[serde(default)]
    pub expected_hours: f64,
    #[serde(default)]
    pub actual_hours: f64,
}

impl DailyReport {
    /// Report with only pacing figures
    pub fn pacing(expected_hours: f64, actual_hours: f64) -> Self {
        Self {
            expected_hours,
            actual_hours,
            ..Self::default()
        }
    }

    pub fn with_study(mut self, topic: impl Into<String>, hours: f64) -> Self {
        self.study_sessions.push(StudyReport {
            topic: topic.into(),
            hours,
        });
        self
    }

    pub fn with_test(mut self, topic: impl Into<String>, score: f64) -> Self {
        self.micro_tests.push(MicroTestResult {
            topic: topic.into(),
            score,
        });
        self
    }
}
