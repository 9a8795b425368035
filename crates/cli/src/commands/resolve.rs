//! Resolve Command
//!
//! Orders an ad-hoc list of test cases without recording a run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use testdeck_common::{resolve_steps, CaseId, ResolveMode};

use super::{Context, StepDisplay};
use crate::output::print_list;

#[derive(Args)]
pub struct ResolveArgs {
    /// Test case IDs in requested order (-1 for a placeholder)
    #[arg(required = true, allow_negative_numbers = true)]
    pub ids: Vec<CaseId>,

    /// Fail on the first missing prerequisite instead of inserting it
    #[arg(long)]
    pub strict: bool,

    /// Read test cases from a JSON file instead of the store
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub fn execute(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog(args.catalog.as_deref())?;
    let mode = ResolveMode::from_strict(ctx.strict(args.strict));

    let steps = resolve_steps(&*catalog, &args.ids, mode)?;
    print_list(&StepDisplay::from_steps(&steps), ctx.format);
    Ok(())
}
