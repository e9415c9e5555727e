//! Planner orchestration
//!
//! Sequences load → decay → allocate → persist for one learner at a time.
//! Each learner id has its own async lock, so a planning run and a report
//! update for the same learner never interleave, while different learners
//! proceed in parallel. A lock is dropped from the table once no operation
//! holds or waits on it.

use chrono::{NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::engine::{self, RevisionCandidate};
use crate::error::PlannerError;
use crate::model::{DailyReport, LearnerState, Topic};
use crate::storage::{PlanRecord, Store};

type LockTable = std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>;

/// Exclusive access to one learner until dropped
struct LearnerGuard<'a> {
    table: &'a LockTable,
    learner_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LearnerGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Waiters hold their own clone, so a count of 1 means only the table
        if locks
            .get(&self.learner_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.learner_id);
        }
    }
}

pub struct Planner {
    store: Mutex<Store>,
    learner_locks: LockTable,
}

impl Planner {
    pub fn new(store: Store) -> Self {
        Self {
            store: Mutex::new(store),
            learner_locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    async fn lock_learner(&self, learner_id: &str) -> LearnerGuard<'_> {
        let lock = {
            let mut locks = self
                .learner_locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(learner_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        LearnerGuard {
            table: &self.learner_locks,
            learner_id: learner_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Stored snapshot, or a fresh one seeded from `topics`
    async fn load_or_initialize(
        &self,
        learner_id: &str,
        topics: &[Topic],
    ) -> Result<LearnerState, PlannerError> {
        match self.store.lock().await.load_learner(learner_id)? {
            Some(state) => Ok(state),
            None => {
                info!("No stored state for {}, initializing", learner_id);
                Ok(engine::initialize(topics, &BTreeMap::new()))
            }
        }
    }

    /// Generate and store a plan for `learner_id`.
    ///
    /// The decayed learner state is stored alongside the plan. A plan that
    /// cannot cover every topic is still returned; check
    /// [`crate::Plan::unfinished`].
    pub async fn generate(
        &self,
        learner_id: &str,
        topics: &[Topic],
        hours_per_day: f64,
        deadline_days: u32,
        today: NaiveDate,
    ) -> Result<PlanRecord, PlannerError> {
        engine::validate(topics, hours_per_day, deadline_days)?;

        let _guard = self.lock_learner(learner_id).await;

        info!(
            "Generating plan for {}: {} topics, {}h/day over {} days",
            learner_id,
            topics.len(),
            hours_per_day,
            deadline_days
        );

        let state = self.load_or_initialize(learner_id, topics).await?;
        let (decayed, plan) =
            engine::plan_for(topics, &state, hours_per_day, deadline_days, today)?;

        if !plan.is_complete() {
            warn!(
                "Plan for {} leaves {:.2}h unscheduled across {} topics",
                learner_id,
                plan.unfinished_hours(),
                plan.unfinished.len()
            );
        }

        let generated_at = Utc::now();
        let id = {
            let store = self.store.lock().await;
            store.save_learner(learner_id, &decayed)?;
            store.save_plan(learner_id, &plan, hours_per_day, deadline_days, generated_at)?
        };

        info!(
            "Plan {} stored for {} ({:.2} effective h/day)",
            id, learner_id, plan.effective_daily_hours
        );

        Ok(PlanRecord {
            id,
            learner_id: learner_id.to_string(),
            plan,
            hours_per_day,
            deadline_days,
            generated_at,
        })
    }

    /// Apply a daily report and store the resulting snapshot.
    ///
    /// Learners without a stored snapshot start from defaults.
    pub async fn record_day(
        &self,
        learner_id: &str,
        report: &DailyReport,
        today: NaiveDate,
    ) -> Result<LearnerState, PlannerError> {
        let _guard = self.lock_learner(learner_id).await;

        let store = self.store.lock().await;
        let state = store.load_learner(learner_id)?.unwrap_or_default();
        let next = engine::update(&state, report, today);
        store.save_learner(learner_id, &next)?;

        info!(
            "Recorded {} for {}: {:.1}h of {:.1}h, speed {:.2}, consistency {:.2}",
            today,
            learner_id,
            report.actual_hours,
            report.expected_hours,
            next.learning_speed,
            next.consistency
        );
        Ok(next)
    }

    /// Revision queue as of `today`. Reads only; nothing is stored.
    pub async fn revisions(
        &self,
        learner_id: &str,
        today: NaiveDate,
        limit: usize,
    ) -> Result<Vec<RevisionCandidate>, PlannerError> {
        let state = self.learner(learner_id).await?.unwrap_or_default();
        let decayed = engine::apply_decay(&state, today);
        Ok(engine::revision_queue(&decayed, limit))
    }

    pub async fn learner(&self, learner_id: &str) -> Result<Option<LearnerState>, PlannerError> {
        Ok(self.store.lock().await.load_learner(learner_id)?)
    }

    pub async fn latest_plan(&self, learner_id: &str) -> Result<Option<PlanRecord>, PlannerError> {
        Ok(self.store.lock().await.latest_plan(learner_id)?)
    }

    pub async fn plan_count(&self, learner_id: &str) -> Result<i64, PlannerError> {
        Ok(self.store.lock().await.plan_count(learner_id)?)
    }
}
