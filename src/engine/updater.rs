//! Learner state updates from daily reports
//!
//! Study time raises familiarity with a flat per-session cap and refreshes
//! retention. Micro-test scores nudge familiarity up or down around a neutral
//! 0.5. Pace and consistency track how actual hours compare to expected.

use chrono::NaiveDate;
use tracing::debug;

use crate::model::{DailyReport, HistoryEntry, LearnerState, TopicState};

use super::round_dp;

/// Familiarity gained per studied hour, before the per-session cap
const STUDY_GAIN_PER_HOUR: f64 = 0.1;
const MAX_STUDY_GAIN: f64 = 0.15;
const STUDY_CONFIDENCE_STEP: f64 = 0.03;

/// Familiarity swing for a perfect or zero micro-test score
const TEST_SENSITIVITY: f64 = 0.15;
const TEST_CONFIDENCE_STEP: f64 = 0.05;

/// Weight kept by the previous pace estimate (4:1 against the new day)
const PACE_SMOOTHING: f64 = 0.8;

/// Under this share of expected hours a day counts as a shortfall
const SHORTFALL_RATIO: f64 = 0.5;
const CONSISTENCY_PENALTY: f64 = 0.05;
const CONSISTENCY_REWARD: f64 = 0.02;
const MIN_CONSISTENCY: f64 = 0.5;
const MAX_CONSISTENCY: f64 = 1.0;

/// Fold one day's report into `state`, returning the next snapshot.
///
/// Topics the report mentions but the state does not track start from a
/// blank [`TopicState`]. The history entry is appended on every call.
pub fn update(state: &LearnerState, report: &DailyReport, today: NaiveDate) -> LearnerState {
    let mut next = state.clone();

    for session in &report.study_sessions {
        let topic = next
            .topic_states
            .entry(session.topic.clone())
            .or_insert_with(blank_topic);
        *topic = apply_study(*topic, session.hours, today);
    }

    for test in &report.micro_tests {
        let topic = next
            .topic_states
            .entry(test.topic.clone())
            .or_insert_with(blank_topic);
        *topic = apply_micro_test(*topic, test.score, today);
    }

    let expected = report.expected_hours;
    let actual = report.actual_hours.max(0.0);
    if expected > 0.0 {
        let ratio = actual / expected;
        next.learning_speed = round_dp(
            PACE_SMOOTHING * next.learning_speed + (1.0 - PACE_SMOOTHING) * ratio,
            2,
        );

        next.consistency = if actual < expected * SHORTFALL_RATIO {
            round_dp(next.consistency - CONSISTENCY_PENALTY, 2).max(MIN_CONSISTENCY)
        } else {
            round_dp(next.consistency + CONSISTENCY_REWARD, 2).min(MAX_CONSISTENCY)
        };
    }

    next.history.push(HistoryEntry {
        date: today,
        actual_hours: report.actual_hours,
        expected_hours: report.expected_hours,
    });

    debug!(
        "Updated learner for {}: {} study, {} tests, speed {:.2}, consistency {:.2}",
        today,
        report.study_sessions.len(),
        report.micro_tests.len(),
        next.learning_speed,
        next.consistency
    );
    next
}

fn blank_topic() -> TopicState {
    TopicState::default()
}

fn apply_study(topic: TopicState, hours: f64, today: NaiveDate) -> TopicState {
    let mut topic = topic.normalized();
    let gain = (hours.max(0.0) * STUDY_GAIN_PER_HOUR).min(MAX_STUDY_GAIN);

    topic.familiarity = (topic.familiarity + gain).min(1.0);
    topic.confidence = (topic.confidence + STUDY_CONFIDENCE_STEP).min(topic.familiarity);
    topic.retention = 1.0;
    topic.attempts += 1;
    topic.last_studied = Some(today);
    topic.decayed_through = None;
    topic.revision_due = false;
    topic
}

fn apply_micro_test(topic: TopicState, score: f64, today: NaiveDate) -> TopicState {
    let mut topic = topic.normalized();
    let score = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.5 };
    let delta = (score - 0.5) * TEST_SENSITIVITY;

    topic.familiarity = (topic.familiarity + delta).clamp(0.0, 1.0);
    topic.confidence = (topic.confidence + TEST_CONFIDENCE_STEP).min(topic.familiarity);
    topic.attempts += 1;
    topic.last_studied = Some(today);
    topic
}
