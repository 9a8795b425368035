//! Resolver behaviour over whole catalogs

use proptest::prelude::*;
use test_case::test_case;

use testdeck_common::{
    resolve, resolve_steps, CaseId, Error, InMemoryCatalog, ResolveMode, Resolver, TestCase, NO_CASE,
};

/// 1 <- 2 <- 3, 4 standalone, 5 <- 6 and 5 <- 7
fn chain_catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_cases([
        TestCase::new(1, "boot"),
        TestCase::new(2, "login").with_precondition(1),
        TestCase::new(3, "create order").with_precondition(2),
        TestCase::new(4, "health check"),
        TestCase::new(5, "seed data"),
        TestCase::new(6, "report").with_precondition(5),
        TestCase::new(7, "export").with_precondition(5),
    ])
}

#[test_case(&[3], &[1, 2, 3] ; "transitive chain")]
#[test_case(&[1, 2, 3], &[1, 2, 3] ; "already ordered")]
#[test_case(&[NO_CASE, 4], &[NO_CASE, 4] ; "placeholder kept")]
#[test_case(&[6, 7], &[5, 6, 7] ; "shared prerequisite once")]
#[test_case(&[4, 3, NO_CASE, 6], &[4, 1, 2, 3, NO_CASE, 5, 6] ; "mixed")]
#[test_case(&[2, 1], &[1, 2, 1] ; "late prerequisite is not moved")]
#[test_case(&[], &[] ; "empty")]
fn repair_mode(input: &[CaseId], expected: &[CaseId]) {
    let catalog = chain_catalog();
    assert_eq!(resolve(&catalog, input, false).unwrap(), expected);
}

#[test_case(&[3], "login => create order" ; "direct prerequisite missing")]
#[test_case(&[2, 3], "boot => login" ; "first violation reported")]
#[test_case(&[7, 5], "seed data => export" ; "prerequisite scheduled later")]
fn strict_mode(input: &[CaseId], message: &str) {
    let catalog = chain_catalog();
    match resolve(&catalog, input, true) {
        Err(Error::MissingDependency(m)) => assert_eq!(m, message),
        other => panic!("expected missing dependency, got {other:?}"),
    }
}

#[test]
fn cycle_names_both_cases() {
    let catalog = InMemoryCatalog::from_cases([
        TestCase::new(10, "A").with_precondition(11),
        TestCase::new(11, "B").with_precondition(10),
    ]);

    let err = resolve(&catalog, &[10], false).unwrap_err();
    let Error::CyclicDependency(message) = &err else {
        panic!("expected cycle, got {err:?}");
    };
    assert!(message.contains('A'));
    assert!(message.contains('B'));
    assert_eq!(err.to_string(), "Cyclic dependency: A => B => A");
}

#[test]
fn cycle_behind_valid_prefix() {
    let catalog = InMemoryCatalog::from_cases([
        TestCase::new(1, "ok"),
        TestCase::new(2, "x").with_precondition(3),
        TestCase::new(3, "y").with_precondition(4),
        TestCase::new(4, "z").with_precondition(2),
    ]);

    match resolve(&catalog, &[1, 2], false) {
        Err(Error::CyclicDependency(m)) => assert_eq!(m, "x => y => z => x"),
        other => panic!("expected cycle, got {other:?}"),
    }
}

#[test]
fn not_found_before_insertion() {
    let catalog = chain_catalog();
    match resolve(&catalog, &[4, 42, 3], false) {
        Err(Error::NotFound { kind, id }) => {
            assert_eq!(kind, "test case");
            assert_eq!(id, "42");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn unknown_prerequisite_is_not_found() {
    let catalog = InMemoryCatalog::from_cases([TestCase::new(1, "orphan").with_precondition(99)]);
    assert!(matches!(
        resolve(&catalog, &[1], false),
        Err(Error::NotFound { ref id, .. }) if id == "99"
    ));
}

#[test]
fn first_version_governs() {
    let catalog = InMemoryCatalog::from_cases([
        TestCase::new(1, "base"),
        TestCase::new(2, "feature v1"),
        TestCase::new(2, "feature v2").with_precondition(1),
    ]);
    assert_eq!(resolve(&catalog, &[2], false).unwrap(), vec![2]);
}

#[test]
fn requested_repeat_is_not_reported_as_inserted() {
    let catalog = chain_catalog();
    let resolution = Resolver::new(&catalog)
        .resolve_with(&[2, 1], ResolveMode::Repair)
        .unwrap();
    assert_eq!(resolution.order, vec![1, 2, 1]);
    assert_eq!(resolution.inserted, vec![1]);
    assert_eq!(resolution.inserted_at, vec![0]);

    let steps = resolve_steps(&catalog, &[2, 1], ResolveMode::Repair).unwrap();
    assert!(steps[0].inserted);
    assert!(!steps[1].inserted);
    assert!(!steps[2].inserted);
}

#[test]
fn input_slice_untouched() {
    let catalog = chain_catalog();
    let input = vec![3];
    let output = resolve(&catalog, &input, false).unwrap();
    assert_eq!(input, vec![3]);
    assert_eq!(output, vec![1, 2, 3]);
}

// ============================================================================
// Properties over random acyclic catalogs
// ============================================================================

/// Case `i` may only depend on a lower id, so the catalog is acyclic.
fn acyclic_catalog(max: usize) -> impl Strategy<Value = Vec<TestCase>> {
    (1..=max).prop_flat_map(|n| {
        let preconditions: Vec<_> = (1..=n as CaseId)
            .map(|id| {
                if id == 1 {
                    Just(NO_CASE).boxed()
                } else {
                    prop_oneof![Just(NO_CASE), (1..id)].boxed()
                }
            })
            .collect();
        preconditions.prop_map(|pres| {
            pres.into_iter()
                .enumerate()
                .map(|(i, pre)| {
                    let id = i as CaseId + 1;
                    TestCase::new(id, format!("case-{id}")).with_precondition(pre)
                })
                .collect()
        })
    })
}

fn catalog_and_candidates() -> impl Strategy<Value = (Vec<TestCase>, Vec<CaseId>)> {
    acyclic_catalog(12).prop_flat_map(|cases| {
        let n = cases.len() as CaseId;
        let candidate = prop_oneof![Just(NO_CASE), (1..=n)];
        (Just(cases), prop::collection::vec(candidate, 0..10))
    })
}

fn is_subsequence(needle: &[CaseId], haystack: &[CaseId]) -> bool {
    let mut it = haystack.iter();
    needle.iter().all(|n| it.any(|h| h == n))
}

proptest! {
    #[test]
    fn repaired_order_satisfies_preconditions((cases, candidates) in catalog_and_candidates()) {
        let catalog = InMemoryCatalog::from_cases(cases);
        let resolution = Resolver::new(&catalog)
            .resolve_with(&candidates, ResolveMode::Repair)
            .unwrap();
        let order = &resolution.order;

        for (pos, &id) in order.iter().enumerate() {
            if id == NO_CASE {
                continue;
            }
            if let Some(pre) = catalog.cases()[(id - 1) as usize].prerequisite() {
                prop_assert!(order[..pos].contains(&pre), "{} before {} in {:?}", pre, id, order);
            }
        }

        prop_assert!(is_subsequence(&candidates, order));
        prop_assert_eq!(order.len(), candidates.len() + resolution.inserted.len());

        prop_assert_eq!(resolution.inserted_at.len(), resolution.inserted.len());
        let requested: Vec<CaseId> = order
            .iter()
            .enumerate()
            .filter(|(pos, _)| !resolution.inserted_at.contains(pos))
            .map(|(_, &id)| id)
            .collect();
        prop_assert_eq!(&requested, &candidates);

        let mut unique = resolution.inserted.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), resolution.inserted.len());
    }

    #[test]
    fn repaired_order_is_a_fixed_point((cases, candidates) in catalog_and_candidates()) {
        let catalog = InMemoryCatalog::from_cases(cases);
        let once = resolve(&catalog, &candidates, false).unwrap();
        let twice = resolve(&catalog, &once, false).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(resolve(&catalog, &once, true).unwrap(), once);
    }
}
