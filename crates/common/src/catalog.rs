//! Test case catalogs
//!
//! A catalog answers "which test case has this id". When several versions
//! share an id the first record in catalog order is returned.

use std::path::Path;

use tracing::debug;

use crate::types::{CaseId, TestCase};
use crate::{Error, Result};

/// Lookup capability consumed by the dependency resolver
pub trait Catalog {
    /// Find the governing record for `id`, or fail with [`Error::NotFound`]
    fn find_by_id(&self, id: CaseId) -> Result<TestCase>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn find_by_id(&self, id: CaseId) -> Result<TestCase> {
        (**self).find_by_id(id)
    }
}

/// Catalog held in memory, in the order records were supplied
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    cases: Vec<TestCase>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cases(cases: impl IntoIterator<Item = TestCase>) -> Self {
        Self {
            cases: cases.into_iter().collect(),
        }
    }

    /// Parse a JSON array of test case records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cases: Vec<TestCase> = serde_json::from_str(json)?;
        Ok(Self::from_cases(cases))
    }

    /// Load a catalog file (JSON array of test case records)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content).map_err(|e| match e {
            Error::Serialization(e) => {
                Error::InvalidCatalog(format!("{}: {}", path.display(), e))
            }
            other => other,
        })?;
        debug!("Loaded {} test cases from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    pub fn insert(&mut self, case: TestCase) {
        self.cases.push(case);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Every record sharing `id`, in catalog order
    pub fn versions(&self, id: CaseId) -> Vec<&TestCase> {
        self.cases.iter().filter(|c| c.id == id).collect()
    }
}

impl Catalog for InMemoryCatalog {
    fn find_by_id(&self, id: CaseId) -> Result<TestCase> {
        self.cases
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::case_not_found(id))
    }
}

impl FromIterator<TestCase> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = TestCase>>(iter: I) -> Self {
        Self::from_cases(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_find_returns_first_version() {
        let catalog = InMemoryCatalog::from_cases([
            TestCase::new(1, "login v1"),
            TestCase::new(2, "logout"),
            TestCase::new(1, "login v2").with_precondition(2),
        ]);

        let found = catalog.find_by_id(1).unwrap();
        assert_eq!(found.name, "login v1");
        assert_eq!(found.prerequisite(), None);
        assert_eq!(catalog.versions(1).len(), 2);
    }

    #[test]
    fn test_find_missing() {
        let catalog = InMemoryCatalog::new();
        assert!(matches!(
            catalog.find_by_id(9),
            Err(Error::NotFound { ref id, .. }) if id == "9"
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "name": "open app"}}, {{"id": 2, "name": "sign in", "precondition": 1}}]"#
        )
        .unwrap();

        let catalog = InMemoryCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find_by_id(2).unwrap().precondition, 1);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        assert!(matches!(
            InMemoryCatalog::load(file.path()),
            Err(Error::InvalidCatalog(_))
        ));
    }
}
