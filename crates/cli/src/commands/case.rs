//! Test case Commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use testdeck_common::{Error, InMemoryCatalog, TestCase, NO_CASE};

use super::Context;
use crate::output::{print_list, print_success, TableDisplay};

#[derive(Subcommand)]
pub enum CaseCommands {
    /// Import test cases from a JSON file
    Import {
        /// JSON array of test case records
        file: PathBuf,
    },

    /// List stored test cases
    List,

    /// Show every stored version of a test case
    Show {
        /// Test case ID
        id: i64,
    },
}

/// Test case display wrapper for serialization
#[derive(Serialize)]
pub struct CaseDisplay {
    pub id: i64,
    pub name: String,
    pub precondition: Option<i64>,
    pub created: String,
}

impl From<TestCase> for CaseDisplay {
    fn from(case: TestCase) -> Self {
        Self {
            id: case.id,
            precondition: case.prerequisite(),
            created: case
                .creation_date
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            name: case.name,
        }
    }
}

impl TableDisplay for CaseDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Precondition", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.precondition
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.created.clone(),
        ]
    }
}

pub fn execute(cmd: CaseCommands, ctx: &Context) -> Result<()> {
    match cmd {
        CaseCommands::Import { file } => {
            let catalog = InMemoryCatalog::load(&file)?;
            if let Some(bad) = catalog.cases().iter().find(|c| c.id == NO_CASE) {
                return Err(Error::InvalidCatalog(format!(
                    "'{}' uses the reserved id {}",
                    bad.name, NO_CASE
                ))
                .into());
            }
            let db = ctx.open_db()?;
            let count = db.import_cases(catalog.cases())?;
            print_success(&format!("Imported {} test cases from {}", count, file.display()));
        }

        CaseCommands::List => {
            let cases = ctx.open_db()?.list_cases()?;
            let displays: Vec<CaseDisplay> = cases.into_iter().map(CaseDisplay::from).collect();
            print_list(&displays, ctx.format);
        }

        CaseCommands::Show { id } => {
            let versions = ctx.open_db()?.case_versions(id)?;
            if versions.is_empty() {
                return Err(Error::case_not_found(id).into());
            }
            let displays: Vec<CaseDisplay> = versions.into_iter().map(CaseDisplay::from).collect();
            print_list(&displays, ctx.format);
        }
    }

    Ok(())
}
