//! SQLite database for testdeck state persistence

use crate::catalog::Catalog;
use crate::types::{CaseId, PlanRun, RunStep, TestCase, TestPlan};
use crate::{Error, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Database wrapper for state persistence
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        info!("Opened database at {:?}", path.as_ref());
        Ok(db)
    }

    /// Open in-memory database (for testing)
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            -- Test case records; several versions may share case_id
            CREATE TABLE IF NOT EXISTS test_cases (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                case_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                spec TEXT NOT NULL,
                imported_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_test_cases_case_id ON test_cases(case_id);

            -- Test plans
            CREATE TABLE IF NOT EXISTS test_plans (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                cases TEXT NOT NULL DEFAULT '[]',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_test_plans_name ON test_plans(name);

            -- Execution history
            CREATE TABLE IF NOT EXISTS plan_runs (
                id TEXT PRIMARY KEY,
                plan_id TEXT NOT NULL,
                strict INTEGER NOT NULL DEFAULT 0,
                steps TEXT NOT NULL DEFAULT '[]',
                started_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_plan_runs_plan ON plan_runs(plan_id);
            "#,
        )?;

        debug!("Database schema initialized");
        Ok(())
    }

    // ========================================================================
    // Test cases
    // ========================================================================

    /// Append a test case record
    pub fn insert_case(&self, case: &TestCase) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO test_cases (case_id, name, spec, imported_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                case.id,
                case.name,
                serde_json::to_string(case)?,
                chrono::Utc::now().timestamp()
            ],
        )?;
        debug!("Inserted test case {}", case.id);
        Ok(())
    }

    /// Append many records in one transaction, returning how many were stored
    pub fn import_cases(&self, cases: &[TestCase]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let now = chrono::Utc::now().timestamp();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO test_cases (case_id, name, spec, imported_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for case in cases {
                stmt.execute(params![case.id, case.name, serde_json::to_string(case)?, now])?;
            }
        }
        tx.commit()?;
        info!("Imported {} test cases", cases.len());
        Ok(cases.len())
    }

    /// All records in insertion order
    pub fn list_cases(&self) -> Result<Vec<TestCase>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT spec FROM test_cases ORDER BY seq")?;
        let specs = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        specs
            .iter()
            .map(|s| serde_json::from_str(s).map_err(Error::from))
            .collect()
    }

    /// Every stored version of a case, oldest import first
    pub fn case_versions(&self, id: CaseId) -> Result<Vec<TestCase>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT spec FROM test_cases WHERE case_id = ?1 ORDER BY seq")?;
        let specs = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        specs
            .iter()
            .map(|s| serde_json::from_str(s).map_err(Error::from))
            .collect()
    }

    // ========================================================================
    // Test plans
    // ========================================================================

    pub fn insert_plan(&self, plan: &TestPlan) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO test_plans (id, name, cases, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                plan.id,
                plan.name,
                serde_json::to_string(&plan.cases)?,
                plan.created_at,
                plan.created_at
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(f, _)
                if f.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::AlreadyExists {
                    kind: "test plan".to_string(),
                    id: plan.name.clone(),
                }
            }
            other => Error::Database(other),
        })?;
        debug!("Inserted test plan {} ({})", plan.name, plan.id);
        Ok(())
    }

    /// Look up a plan by id or, failing that, by name
    pub fn get_plan(&self, id_or_name: &str) -> Result<TestPlan> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT id, name, cases, created_at FROM test_plans WHERE id = ?1 OR name = ?1",
                params![id_or_name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let (id, name, cases, created_at) = row.ok_or_else(|| Error::plan_not_found(id_or_name))?;
        Ok(TestPlan {
            id,
            name,
            cases: serde_json::from_str(&cases)?,
            created_at,
        })
    }

    pub fn list_plans(&self) -> Result<Vec<TestPlan>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT id, name, cases, created_at FROM test_plans ORDER BY created_at, name")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, name, cases, created_at)| -> Result<TestPlan> {
                Ok(TestPlan {
                    id,
                    name,
                    cases: serde_json::from_str(&cases)?,
                    created_at,
                })
            })
            .collect()
    }

    /// Delete a plan and its run history
    pub fn delete_plan(&self, id: &str) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM test_plans WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::plan_not_found(id));
        }
        tx.execute("DELETE FROM plan_runs WHERE plan_id = ?1", params![id])?;
        tx.commit()?;
        debug!("Deleted test plan {}", id);
        Ok(())
    }

    // ========================================================================
    // Run history
    // ========================================================================

    pub fn record_run(&self, run: &PlanRun) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO plan_runs (id, plan_id, strict, steps, started_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run.id,
                run.plan_id,
                run.strict,
                serde_json::to_string(&run.steps)?,
                run.started_at
            ],
        )?;
        debug!("Recorded run {} for plan {}", run.id, run.plan_id);
        Ok(())
    }

    /// Runs of a plan, newest first
    pub fn list_runs(&self, plan_id: &str) -> Result<Vec<PlanRun>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, plan_id, strict, steps, started_at FROM plan_runs
             WHERE plan_id = ?1 ORDER BY started_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![plan_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, plan_id, strict, steps, started_at)| -> Result<PlanRun> {
                let steps: Vec<RunStep> = serde_json::from_str(&steps)?;
                Ok(PlanRun {
                    id,
                    plan_id,
                    strict,
                    steps,
                    started_at,
                })
            })
            .collect()
    }
}

impl Catalog for Database {
    /// First imported version wins
    fn find_by_id(&self, id: CaseId) -> Result<TestCase> {
        let conn = self.conn.lock();
        let spec: Option<String> = conn
            .query_row(
                "SELECT spec FROM test_cases WHERE case_id = ?1 ORDER BY seq LIMIT 1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match spec {
            Some(spec) => Ok(serde_json::from_str(&spec)?),
            None => Err(Error::case_not_found(id)),
        }
    }
}
