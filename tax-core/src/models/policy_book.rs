use std::collections::BTreeMap;

use super::{AssessmentYear, PolicyConfiguration};

/// Policies keyed by assessment year, at most one per year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyBook {
    policies: BTreeMap<AssessmentYear, PolicyConfiguration>,
}

impl PolicyBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `policy` as the authoritative entry for its year, returning
    /// the entry it replaced.
    pub fn insert(
        &mut self,
        policy: PolicyConfiguration,
    ) -> Option<PolicyConfiguration> {
        self.policies
            .insert(policy.assessment_year.clone(), policy)
    }

    pub fn get(
        &self,
        year: &AssessmentYear,
    ) -> Option<&PolicyConfiguration> {
        self.policies.get(year)
    }

    /// Known years, oldest first.
    pub fn years(&self) -> Vec<&AssessmentYear> {
        self.policies.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl FromIterator<PolicyConfiguration> for PolicyBook {
    fn from_iter<I: IntoIterator<Item = PolicyConfiguration>>(iter: I) -> Self {
        let mut book = Self::new();
        for policy in iter {
            book.insert(policy);
        }
        book
    }
}
