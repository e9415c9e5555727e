//! studyplan - adaptive study planning
//!
//! Turns a list of syllabus topics and a per-learner proficiency model into a
//! day-by-day study schedule, ages the model with a forgetting curve between
//! cycles, and folds daily session reports back into it.
//!
//! The [`engine`] functions are pure transformations over snapshots. The
//! [`planner`] module sequences them against a [`storage::Store`] with one
//! writer per learner.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod planner;
pub mod storage;

pub use engine::{allocate, apply_decay, initialize, plan_for, revision_queue, score, update};
pub use error::{PlanError, PlannerError, StoreError};
pub use model::{
    Complexity, DailyReport, HistoryEntry, LearnerState, MicroTestResult, Plan, Session,
    StudyReport, Topic, TopicState,
};
pub use planner::Planner;
pub use storage::{PlanRecord, Store};
