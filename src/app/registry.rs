use std::collections::HashMap;

use thiserror::Error;

use pairql_domain::{CaseId, QueryCase};

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("unknown case id: {0}")]
    NotFound(CaseId),
    #[error("duplicate case id: {0}")]
    DuplicateId(CaseId),
}

/// Ordered, immutable collection of query cases with lookup by id.
#[derive(Debug, Clone)]
pub struct QueryRegistry {
    cases: Vec<QueryCase>,
    index: HashMap<CaseId, usize>,
}

impl QueryRegistry {
    pub fn from_cases(cases: Vec<QueryCase>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(cases.len());
        for (pos, case) in cases.iter().enumerate() {
            if index.insert(case.id.clone(), pos).is_some() {
                return Err(RegistryError::DuplicateId(case.id.clone()));
            }
        }
        Ok(Self { cases, index })
    }

    pub fn get(&self, id: &CaseId) -> Result<&QueryCase, RegistryError> {
        self.index
            .get(id)
            .map(|&pos| &self.cases[pos])
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Cases in file order
    pub fn iter(&self) -> impl Iterator<Item = &QueryCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(id: &str) -> QueryCase {
        QueryCase {
            id: CaseId::new(id),
            question: format!("question for {id}"),
            heuristic_sql: "SELECT 1".to_string(),
            baseline_sql: "SELECT 1".to_string(),
            tags: vec![],
            known_broken: false,
        }
    }

    #[test]
    fn preserves_file_order() {
        let registry =
            QueryRegistry::from_cases(vec![case("b"), case("a"), case("c")]).unwrap();

        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn lookup_by_id_returns_the_case() {
        let registry = QueryRegistry::from_cases(vec![case("a"), case("b")]).unwrap();

        let found = registry.get(&CaseId::new("b")).unwrap();

        assert_eq!(found.id.as_str(), "b");
    }

    #[test]
    fn unknown_id_returns_not_found() {
        let registry = QueryRegistry::from_cases(vec![case("a")]).unwrap();

        let result = registry.get(&CaseId::new("missing"));

        assert!(matches!(result, Err(RegistryError::NotFound(id)) if id.as_str() == "missing"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = QueryRegistry::from_cases(vec![case("a"), case("a")]);

        assert!(matches!(result, Err(RegistryError::DuplicateId(id)) if id.as_str() == "a"));
    }

    #[test]
    fn empty_registry_is_empty() {
        let registry = QueryRegistry::from_cases(vec![]).unwrap();

        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
