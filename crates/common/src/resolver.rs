//! Precondition dependency resolution
//!
//! Given a requested execution order of test cases, make sure every case's
//! prerequisite runs before it. In repair mode missing prerequisites are
//! inserted (transitively) just ahead of the case that needs them; in strict
//! mode the first violation is reported instead.
//!
//! The input is never modified. Output is built front to back, and a small
//! stack holds the chain of cases still waiting for their prerequisites.

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::types::{CaseId, NO_CASE};
use crate::{Error, Result};

/// How ordering violations are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Insert missing prerequisites
    #[default]
    Repair,
    /// Reject the first missing prerequisite
    Strict,
}

impl ResolveMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ResolveMode::Strict
        } else {
            ResolveMode::Repair
        }
    }

    pub fn is_strict(self) -> bool {
        self == ResolveMode::Strict
    }
}

/// Result of a repair-mode pass with insertion details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub order: Vec<CaseId>,
    /// Auto-inserted prerequisites, in insertion order
    pub inserted: Vec<CaseId>,
    /// Positions in `order` holding an auto-inserted entry, ascending
    pub inserted_at: Vec<usize>,
}

/// Prerequisite resolver over a test case catalog
pub struct Resolver<C> {
    catalog: C,
}

impl<C: Catalog> Resolver<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Resolve `candidates` and return the corrected order.
    pub fn resolve(&self, candidates: &[CaseId], strict: bool) -> Result<Vec<CaseId>> {
        self.resolve_with(candidates, ResolveMode::from_strict(strict))
            .map(|r| r.order)
    }

    /// Resolve `candidates`, also reporting which ids were inserted.
    pub fn resolve_with(&self, candidates: &[CaseId], mode: ResolveMode) -> Result<Resolution> {
        Pass::new(&self.catalog, mode, candidates.len()).run(candidates)
    }
}

/// Convenience wrapper around [`Resolver::resolve`]
pub fn resolve<C: Catalog>(catalog: C, candidates: &[CaseId], strict: bool) -> Result<Vec<CaseId>> {
    Resolver::new(catalog).resolve(candidates, strict)
}

/// State of one resolution call
struct Pass<'a, C> {
    catalog: &'a C,
    mode: ResolveMode,
    names: HashMap<CaseId, String>,
    inserted: Vec<CaseId>,
    inserted_at: Vec<usize>,
    output: Vec<CaseId>,
}

impl<'a, C: Catalog> Pass<'a, C> {
    fn new(catalog: &'a C, mode: ResolveMode, capacity: usize) -> Self {
        Self {
            catalog,
            mode,
            names: HashMap::new(),
            inserted: Vec::new(),
            inserted_at: Vec::new(),
            output: Vec::with_capacity(capacity),
        }
    }

    fn run(mut self, candidates: &[CaseId]) -> Result<Resolution> {
        // (id, auto-inserted)
        let mut chain: Vec<(CaseId, bool)> = Vec::new();

        for &id in candidates {
            chain.push((id, false));

            while let Some(&(current, added)) = chain.last() {
                if current == NO_CASE {
                    self.output.push(current);
                    chain.pop();
                    continue;
                }

                let case = self.catalog.find_by_id(current)?;
                self.names.insert(current, case.name.clone());

                let pre = match case.prerequisite() {
                    Some(pre) if !self.output.contains(&pre) => pre,
                    _ => {
                        if added {
                            self.inserted_at.push(self.output.len());
                        }
                        self.output.push(current);
                        chain.pop();
                        continue;
                    }
                };

                if self.mode.is_strict() {
                    return Err(Error::MissingDependency(format!(
                        "{} => {}",
                        self.name_of(pre)?,
                        case.name
                    )));
                }

                if let Some(start) = self.inserted.iter().position(|&i| i == pre) {
                    return Err(self.cycle_error(&case.name, start));
                }

                self.inserted.push(pre);
                chain.push((pre, true));
            }
        }

        Ok(Resolution {
            order: self.output,
            inserted: self.inserted,
            inserted_at: self.inserted_at,
        })
    }

    fn name_of(&self, id: CaseId) -> Result<String> {
        match self.names.get(&id) {
            Some(name) => Ok(name.clone()),
            None => Ok(self.catalog.find_by_id(id)?.name),
        }
    }

    /// `<dependent> => <first inserted in loop> => ... => <last inserted>`
    fn cycle_error(&self, dependent: &str, start: usize) -> Error {
        let mut trace = vec![dependent.to_string()];
        for &id in &self.inserted[start..] {
            // Every inserted id was looked up before the next insertion.
            let name = self
                .names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.to_string());
            trace.push(name);
        }
        Error::CyclicDependency(trace.join(" => "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::types::TestCase;

    fn catalog(cases: &[(CaseId, &str, CaseId)]) -> InMemoryCatalog {
        cases
            .iter()
            .map(|&(id, name, pre)| TestCase::new(id, name).with_precondition(pre))
            .collect()
    }

    #[test]
    fn test_strict_mode_rejects_missing_prerequisite() {
        let cat = catalog(&[(1, "create account", NO_CASE), (2, "sign in", 1)]);

        let err = resolve(&cat, &[2], true).unwrap_err();
        match err {
            Error::MissingDependency(msg) => assert_eq!(msg, "create account => sign in"),
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(resolve(&cat, &[2], false).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_strict_mode_accepts_valid_order() {
        let cat = catalog(&[(1, "a", NO_CASE), (2, "b", 1)]);
        assert_eq!(resolve(&cat, &[1, 2], true).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_strict_mode_prerequisite_after_dependent() {
        let cat = catalog(&[(1, "a", NO_CASE), (2, "b", 1)]);
        assert!(matches!(
            resolve(&cat, &[2, 1], true),
            Err(Error::MissingDependency(_))
        ));
    }

    #[test]
    fn test_strict_mode_unknown_prerequisite() {
        let cat = catalog(&[(2, "b", 7)]);
        assert!(matches!(
            resolve(&cat, &[2], true),
            Err(Error::NotFound { ref id, .. }) if id == "7"
        ));
    }

    #[test]
    fn test_sentinel_skipped() {
        let cat = catalog(&[(3, "c", NO_CASE)]);
        assert_eq!(resolve(&cat, &[NO_CASE, 3], false).unwrap(), vec![NO_CASE, 3]);
        assert_eq!(resolve(&cat, &[NO_CASE, 3], true).unwrap(), vec![NO_CASE, 3]);
    }

    #[test]
    fn test_transitive_repair() {
        let cat = catalog(&[(1, "a", NO_CASE), (2, "b", 1), (3, "c", 2)]);
        let resolution = Resolver::new(&cat)
            .resolve_with(&[3], ResolveMode::Repair)
            .unwrap();
        assert_eq!(resolution.order, vec![1, 2, 3]);
        assert_eq!(resolution.inserted, vec![2, 1]);
        assert_eq!(resolution.inserted_at, vec![0, 1]);
    }

    #[test]
    fn test_shared_prerequisite_inserted_once() {
        let cat = catalog(&[(1, "a", NO_CASE), (2, "b", 1), (3, "c", 1)]);
        let resolution = Resolver::new(&cat)
            .resolve_with(&[2, 3], ResolveMode::Repair)
            .unwrap();
        assert_eq!(resolution.order, vec![1, 2, 3]);
        assert_eq!(resolution.inserted, vec![1]);
        assert_eq!(resolution.inserted_at, vec![0]);
    }

    #[test]
    fn test_two_case_cycle() {
        let cat = catalog(&[(1, "A", 2), (2, "B", 1)]);
        match resolve(&cat, &[1], false).unwrap_err() {
            Error::CyclicDependency(msg) => assert_eq!(msg, "A => B => A"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_cycle() {
        let cat = catalog(&[(5, "loop", 5)]);
        match resolve(&cat, &[5], false).unwrap_err() {
            Error::CyclicDependency(msg) => assert_eq!(msg, "loop => loop"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_trace_starts_at_first_insertion() {
        // 4 -> 3 -> 2 -> 1 -> 3
        let cat = catalog(&[(1, "one", 3), (2, "two", 1), (3, "three", 2), (4, "four", 3)]);
        match resolve(&cat, &[4], false).unwrap_err() {
            Error::CyclicDependency(msg) => assert_eq!(msg, "one => three => two => one"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_found_in_candidates() {
        let cat = catalog(&[(1, "a", NO_CASE)]);
        assert!(matches!(
            resolve(&cat, &[1, 99], false),
            Err(Error::NotFound { ref id, .. }) if id == "99"
        ));
    }

    #[test]
    fn test_empty_input() {
        let cat = InMemoryCatalog::new();
        assert!(resolve(&cat, &[], false).unwrap().is_empty());
    }

    #[test]
    fn test_mode_from_strict() {
        assert_eq!(ResolveMode::from_strict(true), ResolveMode::Strict);
        assert_eq!(ResolveMode::from_strict(false), ResolveMode::Repair);
        assert_eq!(ResolveMode::default(), ResolveMode::Repair);
    }
}
