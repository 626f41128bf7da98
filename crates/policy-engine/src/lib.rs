use scpgen_core::mode::PolicyMode;
use scpgen_core::report::UsageReport;
use scpgen_core::ScpError;

mod document;
pub mod rules;
pub mod tally;

pub use document::{synthesize, PolicyDocument, Statement, POLICY_RESOURCE, POLICY_VERSION};
pub use rules::threshold::{is_below, meets_or_exceeds, predicate_for, Predicate};
pub use tally::{build_tally, ActionTally};

/// Derives a policy for `report` in one step: tally by the mode's predicate, then synthesize.
pub fn derive_policy(
    mode: PolicyMode,
    threshold: i64,
    report: &UsageReport,
) -> Result<(ActionTally, PolicyDocument), ScpError> {
    let tally = build_tally(threshold, report, predicate_for(mode))?;
    let document = synthesize(mode, report.service_name(), &tally);
    Ok((tally, document))
}
