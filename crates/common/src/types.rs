//! Core types for testdeck

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Test case identifier as issued by the remote API
pub type CaseId = i64;

/// Reserved identifier meaning "no case" in a candidate sequence and
/// "no prerequisite" in [`TestCase::precondition`].
pub const NO_CASE: CaseId = -1;

fn default_precondition() -> CaseId {
    NO_CASE
}

/// A test case record.
///
/// Several historical versions of the same logical case share one `id` and
/// differ by `creation_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: CaseId,
    pub name: String,
    #[serde(default = "default_precondition")]
    pub precondition: CaseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

impl TestCase {
    pub fn new(id: CaseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            precondition: NO_CASE,
            description: None,
            creation_date: None,
        }
    }

    pub fn with_precondition(mut self, precondition: CaseId) -> Self {
        self.precondition = precondition;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// The prerequisite case, if one is declared
    pub fn prerequisite(&self) -> Option<CaseId> {
        (self.precondition != NO_CASE).then_some(self.precondition)
    }
}

/// A named, ordered list of test cases to execute together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPlan {
    pub id: String,
    pub name: String,
    /// Requested execution order; may contain [`NO_CASE`] placeholders
    #[serde(default)]
    pub cases: Vec<CaseId>,
    pub created_at: i64,
}

impl TestPlan {
    pub fn new(name: impl Into<String>, cases: Vec<CaseId>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            cases,
            created_at: Utc::now().timestamp(),
        }
    }
}

/// One entry of a resolved run order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStep {
    pub case_id: CaseId,
    /// `None` for a placeholder entry
    pub name: Option<String>,
    /// Added as a missing prerequisite rather than requested by the plan
    #[serde(default)]
    pub inserted: bool,
}

/// A resolved execution of a test plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRun {
    pub id: String,
    pub plan_id: String,
    pub strict: bool,
    pub steps: Vec<RunStep>,
    pub started_at: i64,
}

impl PlanRun {
    pub fn new(plan_id: impl Into<String>, strict: bool, steps: Vec<RunStep>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            plan_id: plan_id.into(),
            strict,
            steps,
            started_at: Utc::now().timestamp(),
        }
    }

    /// Case ids in execution order, placeholders included
    pub fn order(&self) -> Vec<CaseId> {
        self.steps.iter().map(|s| s.case_id).collect()
    }

    pub fn inserted_count(&self) -> usize {
        self.steps.iter().filter(|s| s.inserted).count()
    }
}

/// A test case selected for automation-script generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptTarget {
    pub case_id: CaseId,
    pub name: String,
    #[serde(default)]
    pub inserted: bool,
}
