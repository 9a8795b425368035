//! Test plan runs and script batches
//!
//! Both callers hand a candidate order to the [`Resolver`] and turn the
//! result into named entries. Resolver failures are returned unchanged so
//! the console can show the diagnostic.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::resolver::{ResolveMode, Resolver};
use crate::types::{CaseId, PlanRun, RunStep, ScriptTarget, TestPlan, NO_CASE};
use crate::Result;

/// Resolve `candidates` into named steps, flagging inserted prerequisites
pub fn resolve_steps<C: Catalog>(
    catalog: C,
    candidates: &[CaseId],
    mode: ResolveMode,
) -> Result<Vec<RunStep>> {
    let resolution = Resolver::new(&catalog).resolve_with(candidates, mode)?;
    let inserted: HashSet<usize> = resolution.inserted_at.iter().copied().collect();

    let mut steps = Vec::with_capacity(resolution.order.len());
    for (pos, id) in resolution.order.into_iter().enumerate() {
        if id == NO_CASE {
            steps.push(RunStep {
                case_id: id,
                name: None,
                inserted: false,
            });
            continue;
        }
        let case = catalog.find_by_id(id)?;
        steps.push(RunStep {
            case_id: id,
            name: Some(case.name),
            inserted: inserted.contains(&pos),
        });
    }
    Ok(steps)
}

/// Resolve a plan's case list into an ordered run
pub fn prepare_run<C: Catalog>(catalog: C, plan: &TestPlan, strict: bool) -> Result<PlanRun> {
    let mode = ResolveMode::from_strict(strict);
    let steps = resolve_steps(catalog, &plan.cases, mode).map_err(|e| {
        warn!("Plan '{}' cannot be scheduled: {}", plan.name, e);
        e
    })?;

    let run = PlanRun::new(plan.id.clone(), strict, steps);
    info!(
        "Prepared run {} for plan '{}': {} steps, {} prerequisites inserted",
        run.id,
        plan.name,
        run.steps.len(),
        run.inserted_count()
    );
    Ok(run)
}

/// Build the list of scripts to generate for `targets`.
///
/// Missing prerequisites are always added so every generated script can
/// run in order. Placeholder entries are dropped.
pub fn build_script_batch<C: Catalog>(catalog: C, targets: &[CaseId]) -> Result<Vec<ScriptTarget>> {
    let batch: Vec<ScriptTarget> = resolve_steps(catalog, targets, ResolveMode::Repair)?
        .into_iter()
        .filter_map(|step| {
            step.name.map(|name| ScriptTarget {
                case_id: step.case_id,
                name,
                inserted: step.inserted,
            })
        })
        .collect();

    debug!("Script batch: {} targets ({} requested)", batch.len(), targets.len());
    Ok(batch)
}
