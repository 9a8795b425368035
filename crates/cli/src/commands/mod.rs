//! CLI Commands

pub mod case;
pub mod config;
pub mod plan;
pub mod resolve;
pub mod script;

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;
use testdeck_common::{Catalog, Database, InMemoryCatalog, RunStep, NO_CASE};
use tracing::debug;

use crate::config::ConsoleConfig;
use crate::output::{OutputFormat, TableDisplay};

/// Settings shared by every command
pub struct Context {
    pub config: ConsoleConfig,
    pub config_path: std::path::PathBuf,
    pub format: OutputFormat,
}

impl Context {
    /// Open the state database, creating the store directory if needed
    pub fn open_db(&self) -> Result<Database> {
        std::fs::create_dir_all(&self.config.store_path).with_context(|| {
            format!("creating store directory {}", self.config.store_path.display())
        })?;
        let path = self.config.db_path();
        Database::open(&path).with_context(|| format!("opening database {}", path.display()))
    }

    /// Catalog from a JSON file when given, otherwise the state database
    pub fn catalog(&self, file: Option<&Path>) -> Result<Box<dyn Catalog>> {
        match file {
            Some(path) => {
                debug!("Using catalog file {}", path.display());
                Ok(Box::new(InMemoryCatalog::load(path)?))
            }
            None => Ok(Box::new(self.open_db()?)),
        }
    }

    pub fn strict(&self, flag: bool) -> bool {
        flag || self.config.strict_by_default
    }
}

/// One position of a resolved order
#[derive(Serialize)]
pub struct StepDisplay {
    pub position: usize,
    pub case_id: i64,
    pub name: String,
    pub inserted: bool,
}

impl StepDisplay {
    pub fn from_steps(steps: &[RunStep]) -> Vec<Self> {
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| Self {
                position: i + 1,
                case_id: step.case_id,
                name: step.name.clone().unwrap_or_default(),
                inserted: step.inserted,
            })
            .collect()
    }
}

impl TableDisplay for StepDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Case", "Name", "Added"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.position.to_string(),
            if self.case_id == NO_CASE {
                "-".to_string()
            } else {
                self.case_id.to_string()
            },
            if self.case_id == NO_CASE {
                "(placeholder)".to_string()
            } else {
                self.name.clone()
            },
            if self.inserted { "yes" } else { "" }.to_string(),
        ]
    }
}
