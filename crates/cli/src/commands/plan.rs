//! Test plan Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use testdeck_common::{prepare_run, CaseId, PlanRun, TestPlan};
use tracing::info;

use super::{Context, StepDisplay};
use crate::output::{print_item, print_list, print_success, print_warning, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a test plan
    Create {
        /// Plan name
        #[arg(short, long)]
        name: String,

        /// Test case IDs in execution order (-1 for a placeholder)
        #[arg(allow_negative_numbers = true)]
        ids: Vec<CaseId>,
    },

    /// List test plans
    List,

    /// Show a test plan
    Show {
        /// Plan ID or name
        plan: String,
    },

    /// Delete a test plan and its run history
    Delete {
        /// Plan ID or name
        plan: String,
    },

    /// Resolve a plan's order and record a run
    Run {
        /// Plan ID or name
        plan: String,

        /// Fail on the first missing prerequisite instead of inserting it
        #[arg(long)]
        strict: bool,
    },

    /// Show past runs of a plan
    History {
        /// Plan ID or name
        plan: String,
    },
}

/// Test plan display wrapper for serialization
#[derive(Serialize)]
pub struct PlanDisplay {
    pub id: String,
    pub name: String,
    pub cases: Vec<CaseId>,
    pub created_at: String,
}

impl From<TestPlan> for PlanDisplay {
    fn from(plan: TestPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            cases: plan.cases,
            created_at: format_timestamp(plan.created_at),
        }
    }
}

impl TableDisplay for PlanDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Cases", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.cases
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            self.created_at.clone(),
        ]
    }
}

/// Run history display wrapper
#[derive(Serialize)]
pub struct RunDisplay {
    pub id: String,
    pub mode: &'static str,
    pub steps: usize,
    pub inserted: usize,
    pub started_at: String,
}

impl From<PlanRun> for RunDisplay {
    fn from(run: PlanRun) -> Self {
        Self {
            mode: if run.strict { "strict" } else { "repair" },
            steps: run.steps.len(),
            inserted: run.inserted_count(),
            started_at: format_timestamp(run.started_at),
            id: run.id,
        }
    }
}

impl TableDisplay for RunDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Run ID", "Mode", "Steps", "Added", "Started"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.mode.to_string(),
            self.steps.to_string(),
            self.inserted.to_string(),
            self.started_at.clone(),
        ]
    }
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn execute(cmd: PlanCommands, ctx: &Context) -> Result<()> {
    let db = ctx.open_db()?;

    match cmd {
        PlanCommands::Create { name, ids } => {
            let plan = TestPlan::new(name, ids);
            db.insert_plan(&plan)?;
            print_success(&format!("Created test plan '{}' ({})", plan.name, plan.id));
        }

        PlanCommands::List => {
            let displays: Vec<PlanDisplay> =
                db.list_plans()?.into_iter().map(PlanDisplay::from).collect();
            print_list(&displays, ctx.format);
        }

        PlanCommands::Show { plan } => {
            let plan = db.get_plan(&plan)?;
            print_item(&PlanDisplay::from(plan), ctx.format);
        }

        PlanCommands::Delete { plan } => {
            let plan = db.get_plan(&plan)?;
            db.delete_plan(&plan.id)?;
            print_success(&format!("Deleted test plan '{}'", plan.name));
        }

        PlanCommands::Run { plan, strict } => {
            let plan = db.get_plan(&plan)?;
            let run = prepare_run(&db, &plan, ctx.strict(strict))?;
            db.record_run(&run)?;
            info!("Recorded run {}", run.id);

            print_list(&StepDisplay::from_steps(&run.steps), ctx.format);
            let added = run.inserted_count();
            if added > 0 && ctx.format == OutputFormat::Table {
                print_warning(&format!("{} prerequisites were added to the plan's order", added));
            }
        }

        PlanCommands::History { plan } => {
            let plan = db.get_plan(&plan)?;
            let displays: Vec<RunDisplay> =
                db.list_runs(&plan.id)?.into_iter().map(RunDisplay::from).collect();
            print_list(&displays, ctx.format);
        }
    }

    Ok(())
}
