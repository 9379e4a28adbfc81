//! Locator registry: one symbolic name per distinct selector within a run

use std::collections::{HashMap, HashSet};

use crate::naming::identifier_from_label;
use crate::plan::{Locator, TestPlan};

/// Maps selectors to stable locator names for the lifetime of one plan
#[derive(Debug, Default)]
pub struct LocatorRegistry {
    /// selector -> assigned name
    by_selector: HashMap<String, String>,

    /// Lower-cased names already handed out
    taken: HashSet<String>,
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a selector to its locator name.
    ///
    /// A selector seen before returns the name it was given then. A new
    /// selector gets a name derived from `candidate_label` and is appended
    /// to the plan's locators.
    pub fn resolve(&mut self, plan: &mut TestPlan, selector: &str, candidate_label: &str) -> String {
        if let Some(name) = self.by_selector.get(selector) {
            return name.clone();
        }

        let name = self.unique_name(&identifier_from_label(candidate_label));
        self.taken.insert(name.to_lowercase());
        self.by_selector.insert(selector.to_string(), name.clone());
        plan.locators.push(Locator::new(name.clone(), selector));
        name
    }

    /// Name previously assigned to a selector, if any
    pub fn get(&self, selector: &str) -> Option<&str> {
        self.by_selector.get(selector).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_selector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_selector.is_empty()
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.taken.contains(&base.to_lowercase()) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !self.taken.contains(&candidate.to_lowercase()))
            .unwrap_or_else(|| base.to_string())
    }
}
