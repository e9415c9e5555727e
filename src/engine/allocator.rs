//! Day-by-day greedy plan allocation
//!
//! For each day: pick the complexity gate, rank every topic with hours left,
//! hand out bounded study blocks until the day's budget runs out, add at most
//! one revision block, and close with a micro-test.
//!
//! Hours are kept to two decimals throughout so a day's sessions never sum
//! past its budget.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::PlanError;
use crate::model::{Complexity, LearnerState, Plan, Session, Topic};

use super::priority::score;
use super::revision::revision_queue;
use super::round_dp;

/// Smallest study block, unless less than this remains on the topic
const MIN_SESSION_HOURS: f64 = 0.5;

/// Share of a topic's remaining hours one study block may take
const SESSION_SHARE: f64 = 0.4;

/// Share of the effective daily budget reserved for the revision block
const REVISION_SHARE: f64 = 0.1;

/// Plans are kept in hundredths of an hour; smaller estimates cannot be scheduled
const MIN_ESTIMATE_HOURS: f64 = 0.01;

/// Reject inputs that would produce an empty or meaningless plan
pub fn validate(
    topics: &[Topic],
    hours_per_day: f64,
    deadline_days: u32,
) -> Result<(), PlanError> {
    if topics.is_empty() {
        return Err(PlanError::EmptyTopics);
    }
    if !(hours_per_day.is_finite() && hours_per_day > 0.0) {
        return Err(PlanError::NonPositiveHours(hours_per_day));
    }
    if deadline_days == 0 {
        return Err(PlanError::NonPositiveDeadline);
    }

    let mut seen = HashSet::new();
    for topic in topics {
        if !(topic.estimated_hours.is_finite() && topic.estimated_hours >= MIN_ESTIMATE_HOURS) {
            return Err(PlanError::InvalidEstimate {
                topic: topic.name.clone(),
                hours: topic.estimated_hours,
            });
        }
        if !seen.insert(topic.name.as_str()) {
            return Err(PlanError::DuplicateTopic(topic.name.clone()));
        }
    }
    Ok(())
}

/// Realistic daily budget: nominal hours scaled by pace and consistency
pub fn effective_daily_hours(hours_per_day: f64, state: &LearnerState) -> f64 {
    round_dp(hours_per_day * state.learning_speed * state.consistency, 2).max(0.0)
}

/// Length of the foundation phase, `ceil(deadline_days * 0.4)`
pub fn early_phase_days(deadline_days: u32) -> u32 {
    (deadline_days * 2).div_ceil(5)
}

/// Hardest tier eligible on `day`
fn complexity_gate(day: u32, early_phase: u32) -> Complexity {
    if day <= early_phase {
        Complexity::Medium
    } else {
        Complexity::Hard
    }
}

/// Questions in the closing micro-test.
///
/// Lighter for inconsistent learners, heavier for fast ones.
pub fn micro_test_questions(state: &LearnerState) -> u32 {
    if state.consistency < 0.7 {
        3
    } else if state.learning_speed > 1.1 {
        7
    } else {
        5
    }
}

/// Build a plan for `deadline_days` days.
///
/// `state` should already be decayed to the planning date; it is read, never
/// modified. Topics that do not fit before the deadline are reported in
/// [`Plan::unfinished`] rather than treated as an error.
pub fn allocate(
    topics: &[Topic],
    state: &LearnerState,
    hours_per_day: f64,
    deadline_days: u32,
) -> Result<Plan, PlanError> {
    validate(topics, hours_per_day, deadline_days)?;

    let effective = effective_daily_hours(hours_per_day, state);
    let early_phase = early_phase_days(deadline_days);
    let questions = micro_test_questions(state);
    let revision_hours = round_dp(effective * REVISION_SHARE, 2);
    let revision_topic = revision_queue(state, 1).into_iter().next().map(|c| c.topic);

    let mut remaining: Vec<f64> = topics
        .iter()
        .map(|t| round_dp(t.estimated_hours, 2))
        .collect();
    let mut days = BTreeMap::new();

    for day in 1..=deadline_days {
        let gate = complexity_gate(day, early_phase);
        let mut budget = effective;
        let mut sessions = Vec::new();

        let mut candidates: Vec<(usize, f64)> = topics
            .iter()
            .enumerate()
            .filter(|(i, _)| remaining[*i] > 0.0)
            .map(|(i, topic)| (i, score(topic, state)))
            .collect();

        candidates.sort_by(|(a, pa), (b, pb)| {
            pb.total_cmp(pa)
                .then(topics[*a].complexity.cmp(&topics[*b].complexity))
                .then(remaining[*a].total_cmp(&remaining[*b]))
        });

        for (i, _) in candidates {
            if budget <= 0.0 {
                break;
            }
            let topic = &topics[i];
            if topic.complexity > gate {
                continue;
            }

            let available = remaining[i];
            let cap = MIN_SESSION_HOURS.max(available * SESSION_SHARE);
            let hours = round_dp(available.min(budget).min(cap), 2);
            if hours <= 0.0 {
                continue;
            }

            sessions.push(Session::Study {
                topic: topic.name.clone(),
                hours,
                complexity: topic.complexity,
            });
            remaining[i] = round_dp(available - hours, 2).max(0.0);
            budget = round_dp(budget - hours, 2);
        }

        if let Some(topic) = &revision_topic {
            if revision_hours > 0.0 && budget >= revision_hours {
                sessions.push(Session::Revision {
                    topic: Some(topic.clone()),
                    hours: revision_hours,
                });
                budget = round_dp(budget - revision_hours, 2);
            }
        }

        sessions.push(Session::MicroTest { questions });

        debug!(
            "Day {}: {} sessions, {:.2}h of {:.2}h unused (gate {})",
            day,
            sessions.len(),
            budget,
            effective,
            gate
        );
        days.insert(day, sessions);
    }

    let unfinished = topics
        .iter()
        .zip(&remaining)
        .filter(|(_, hours)| **hours > 0.0)
        .map(|(topic, hours)| (topic.name.clone(), *hours))
        .collect();

    Ok(Plan {
        days,
        effective_daily_hours: effective,
        early_phase_days: early_phase,
        unfinished,
    })
}
