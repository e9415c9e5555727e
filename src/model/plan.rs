//! Day-indexed study plans

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Complexity;

/// One block of a day's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Session {
    Study {
        topic: String,
        hours: f64,
        complexity: Complexity,
    },
    Revision {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
        hours: f64,
    },
    MicroTest {
        questions: u32,
    },
}

impl Session {
    /// Hours drawn from the daily budget. Micro-tests are free.
    pub fn hours(&self) -> f64 {
        match self {
            Session::Study { hours, .. } | Session::Revision { hours, .. } => *hours,
            Session::MicroTest { .. } => 0.0,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Session::Study { .. } => "study",
            Session::Revision { .. } => "revision",
            Session::MicroTest { .. } => "micro_test",
        }
    }

    pub fn is_study(&self) -> bool {
        matches!(self, Session::Study { .. })
    }
}

/// A full schedule produced by one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Day number (1-based) to ordered sessions
    pub days: BTreeMap<u32, Vec<Session>>,
    /// Daily budget after pace and consistency adjustment
    pub effective_daily_hours: f64,
    /// Days on which Hard topics were held back
    pub early_phase_days: u32,
    /// Topics with hours left over after the final day
    #[serde(default)]
    pub unfinished: BTreeMap<String, f64>,
}

impl Plan {
    pub fn day(&self, day: u32) -> &[Session] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether every topic fits inside the deadline
    pub fn is_complete(&self) -> bool {
        self.unfinished.is_empty()
    }

    /// Hours of the daily budget used on `day` (study plus revision)
    pub fn allocated_hours(&self, day: u32) -> f64 {
        self.day(day).iter().map(Session::hours).sum()
    }

    /// Total study hours scheduled for a topic across the plan
    pub fn study_hours(&self, topic: &str) -> f64 {
        self.days
            .values()
            .flatten()
            .filter_map(|session| match session {
                Session::Study { topic: t, hours, .. } if t == topic => Some(*hours),
                _ => None,
            })
            .sum()
    }

    /// Hours still needed to finish the leftover topics
    pub fn unfinished_hours(&self) -> f64 {
        self.unfinished.values().sum()
    }
}
