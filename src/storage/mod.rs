//! Storage module for studyplan
//!
//! Persists learner snapshots and generated plans in SQLite. Both are stored
//! as JSON documents keyed by learner id; the engine never reads a plan back.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::StoreError;
use crate::model::{LearnerState, Plan};

/// A stored plan with the parameters it was generated from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: i64,
    pub learner_id: String,
    pub plan: Plan,
    pub hours_per_day: f64,
    pub deadline_days: u32,
    pub generated_at: DateTime<Utc>,
}

/// Learner and plan store backed by SQLite
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a store at the given path
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;

        // WAL mode so readers are not blocked while a plan is written
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Throwaway store, mainly for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS learner_states (
                learner_id TEXT PRIMARY KEY,
                state TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS plans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                learner_id TEXT NOT NULL,
                plan TEXT NOT NULL,
                hours_per_day REAL NOT NULL,
                deadline_days INTEGER NOT NULL,
                generated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_plans_learner ON plans(learner_id);
            "#,
        )?;
        Ok(())
    }

    /// Load a learner's snapshot, if one has been stored
    pub fn load_learner(&self, learner_id: &str) -> Result<Option<LearnerState>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM learner_states WHERE learner_id = ?",
                params![learner_id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a learner's snapshot
    pub fn save_learner(&self, learner_id: &str, state: &LearnerState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        self.conn.execute(
            r#"
            INSERT INTO learner_states (learner_id, state, updated_at)
            VALUES (?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(learner_id) DO UPDATE SET
                state = excluded.state,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![learner_id, json],
        )?;
        debug!("Saved learner state for {}", learner_id);
        Ok(())
    }

    /// Store a generated plan and return its id
    pub fn save_plan(
        &self,
        learner_id: &str,
        plan: &Plan,
        hours_per_day: f64,
        deadline_days: u32,
        generated_at: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let json = serde_json::to_string(plan)?;
        self.conn.execute(
            r#"
            INSERT INTO plans (learner_id, plan, hours_per_day, deadline_days, generated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                learner_id,
                json,
                hours_per_day,
                deadline_days,
                generated_at.to_rfc3339()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Saved plan {} for {}", id, learner_id);
        Ok(id)
    }

    pub fn get_plan(&self, id: i64) -> Result<Option<PlanRecord>, StoreError> {
        self.query_plan(
            "SELECT id, learner_id, plan, hours_per_day, deadline_days, generated_at
             FROM plans WHERE id = ?",
            params![id],
        )
    }

    /// Most recently generated plan for a learner
    pub fn latest_plan(&self, learner_id: &str) -> Result<Option<PlanRecord>, StoreError> {
        self.query_plan(
            "SELECT id, learner_id, plan, hours_per_day, deadline_days, generated_at
             FROM plans WHERE learner_id = ? ORDER BY id DESC LIMIT 1",
            params![learner_id],
        )
    }

    fn query_plan(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Option<PlanRecord>, StoreError> {
        let row = self
            .conn
            .query_row(sql, params, |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .optional()?;

        let Some((id, learner_id, plan, hours_per_day, deadline_days, generated_at)) = row else {
            return Ok(None);
        };

        Ok(Some(PlanRecord {
            id,
            learner_id,
            plan: serde_json::from_str(&plan)?,
            hours_per_day,
            deadline_days,
            generated_at: DateTime::parse_from_rfc3339(&generated_at)?.with_timezone(&Utc),
        }))
    }

    /// Number of plans generated for a learner
    pub fn plan_count(&self, learner_id: &str) -> Result<i64, StoreError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM plans WHERE learner_id = ?",
            params![learner_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Ids of every learner with a stored snapshot
    pub fn list_learners(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT learner_id FROM learner_states ORDER BY learner_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}
