use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scpgen_core::report::UsageReport;
use scpgen_core::ScpError;

use crate::rules::threshold::Predicate;

/// Qualifying action names and their call counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTally {
    counts: BTreeMap<String, i64>,
}

impl ActionTally {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, action: &str) -> Option<i64> {
        self.counts.get(action).copied()
    }

    pub fn contains(&self, action: &str) -> bool {
        self.counts.contains_key(action)
    }

    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, i64)> for ActionTally {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Collects every entry of `report` whose count satisfies `predicate` against `threshold`.
///
/// Later entries with the same event name replace earlier ones.
pub fn build_tally(
    threshold: i64,
    report: &UsageReport,
    predicate: Predicate,
) -> Result<ActionTally, ScpError> {
    if threshold <= 0 {
        return Err(ScpError::Validation(
            "threshold must be greater than zero".to_string(),
        ));
    }

    let mut counts = BTreeMap::new();
    for entry in report.entries() {
        if predicate(entry.count, threshold) {
            counts.insert(entry.event_name.clone(), entry.count);
        }
    }
    Ok(ActionTally { counts })
}
