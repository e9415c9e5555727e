//! Data model shared by the planning engine, the store, and the CLI
//!
//! Every type here is a plain serde value. Learner snapshots are read with
//! per-field defaults so partially populated records load cleanly.

mod learner;
mod plan;
mod report;
mod topic;

pub use learner::{HistoryEntry, LearnerState, TopicState};
pub use plan::{Plan, Session};
pub use report::{DailyReport, MicroTestResult, StudyReport};
pub use topic::{Complexity, Topic};
