//! Threshold classification of API call counts.
//!
//! Allow policies keep actions used at least `threshold` times; deny policies
//! target the ones used less often.

use scpgen_core::mode::PolicyMode;

/// `(observed_count, threshold) -> qualifies`
pub type Predicate = fn(i64, i64) -> bool;

pub fn meets_or_exceeds(value: i64, threshold: i64) -> bool {
    value >= threshold
}

pub fn is_below(value: i64, threshold: i64) -> bool {
    value < threshold
}

pub fn predicate_for(mode: PolicyMode) -> Predicate {
    match mode {
        PolicyMode::Allow => meets_or_exceeds,
        PolicyMode::Deny => is_below,
    }
}
