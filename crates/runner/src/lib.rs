//! Policy generation pipeline.
//!
//! [`execute`] turns a scanner usage report into a service control policy:
//! validate the mode, load and parse the report, pick the report to process,
//! tally the actions that clear the threshold, synthesize the document and
//! hand it to the sink. The first failing step aborts the run and its error is
//! returned as is.

use policy_engine::{build_tally, predicate_for, synthesize, ActionTally, PolicyDocument};
use reporting::GenerationSummary;
use scpgen_core::report::{parse_report, ReportSelection};
use scpgen_core::{PolicyMode, RunId, ScpError};

pub mod sink;
pub mod source;

pub use sink::FilePolicySink;
pub use source::FileReportSource;

/// Supplies the raw bytes of a scanner report.
pub trait ReportSource {
    fn load(&self) -> Result<Vec<u8>, ScpError>;
}

/// Serializes and stores a finished policy document.
pub trait PolicySink {
    fn store(&self, document: &PolicyDocument) -> Result<(), ScpError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    /// Raw mode as given by the operator; parsed case-insensitively.
    pub mode: String,
    pub threshold: i64,
    pub selection: ReportSelection,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub run_id: RunId,
    pub mode: PolicyMode,
    pub threshold: i64,
    pub account: String,
    pub service: String,
    pub entries_considered: usize,
    pub reports_ignored: usize,
    pub tally: ActionTally,
    pub document: PolicyDocument,
}

impl PipelineOutcome {
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            account: self.account.clone(),
            entries_considered: self.entries_considered,
            reports_ignored: self.reports_ignored,
            ..GenerationSummary::for_document(self.run_id, &self.service, self.threshold, &self.document)
        }
    }
}

pub fn execute(
    request: &PipelineRequest,
    source: &dyn ReportSource,
    sink: &dyn PolicySink,
) -> Result<PipelineOutcome, ScpError> {
    let mode: PolicyMode = request.mode.parse()?;

    let bytes = source.load()?;
    let reports = parse_report(&bytes)?;
    let selected = reports.select(request.selection)?;
    let report = selected.report;

    let service = report.service_name();
    let tally = build_tally(request.threshold, report, predicate_for(mode))?;
    let document = synthesize(mode, service, &tally);

    sink.store(&document)?;

    Ok(PipelineOutcome {
        run_id: RunId::new(),
        mode,
        threshold: request.threshold,
        account: report.account.identifier.clone(),
        service: service.to_string(),
        entries_considered: report.entries().len(),
        reports_ignored: selected.ignored,
        tally,
        document,
    })
}
