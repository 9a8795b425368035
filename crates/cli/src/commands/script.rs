//! Script Commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use testdeck_common::{build_script_batch, CaseId, ScriptTarget};

use super::Context;
use crate::output::{print_info, print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ScriptCommands {
    /// List the scripts to generate for a set of test cases
    Batch {
        /// Target test case IDs
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<CaseId>,

        /// Read test cases from a JSON file instead of the store
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Serialize)]
pub struct ScriptDisplay {
    pub case_id: CaseId,
    pub name: String,
    pub reason: &'static str,
}

impl From<ScriptTarget> for ScriptDisplay {
    fn from(target: ScriptTarget) -> Self {
        Self {
            case_id: target.case_id,
            name: target.name,
            reason: if target.inserted { "prerequisite" } else { "requested" },
        }
    }
}

impl TableDisplay for ScriptDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Case", "Name", "Reason"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.case_id.to_string(),
            self.name.clone(),
            self.reason.to_string(),
        ]
    }
}

pub fn execute(cmd: ScriptCommands, ctx: &Context) -> Result<()> {
    match cmd {
        ScriptCommands::Batch { ids, catalog } => {
            let catalog = ctx.catalog(catalog.as_deref())?;
            let batch = build_script_batch(&*catalog, &ids)?;
            let added = batch.iter().filter(|t| t.inserted).count();

            let displays: Vec<ScriptDisplay> = batch.into_iter().map(ScriptDisplay::from).collect();
            print_list(&displays, ctx.format);
            if added > 0 && ctx.format == OutputFormat::Table {
                print_info(&format!("{} prerequisite scripts added", added));
            }
        }
    }
    Ok(())
}
