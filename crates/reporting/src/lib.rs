use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use policy_engine::PolicyDocument;
use scpgen_core::{PolicyMode, RunId};

pub mod json;

pub use json::{render_policy_json, render_summary_json};

/// What one pipeline run produced, for the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub run_id: RunId,
    pub generated_at: OffsetDateTime,
    pub account: String,
    pub service: String,
    pub mode: PolicyMode,
    pub threshold: i64,
    pub entries_considered: usize,
    pub actions_selected: usize,
    pub reports_ignored: usize,
    pub output: Option<PathBuf>,
}

impl GenerationSummary {
    /// Starts a summary for `document`; counts come from the document itself.
    pub fn for_document(
        run_id: RunId,
        service: impl Into<String>,
        threshold: i64,
        document: &PolicyDocument,
    ) -> Self {
        Self {
            run_id,
            generated_at: OffsetDateTime::now_utc(),
            account: String::new(),
            service: service.into(),
            mode: document.effect(),
            threshold,
            entries_considered: 0,
            actions_selected: document.actions().len(),
            reports_ignored: 0,
            output: None,
        }
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = Some(output);
        self
    }

    pub fn human_summary(&self) -> String {
        let verb = match self.mode {
            PolicyMode::Allow => "allowed",
            PolicyMode::Deny => "denied",
        };
        let comparison = match self.mode {
            PolicyMode::Allow => "at least",
            PolicyMode::Deny => "fewer than",
        };
        let account = if self.account.is_empty() {
            "unknown account".to_string()
        } else {
            format!("account {}", self.account)
        };
        let mut lines = vec![
            format!(
                "{} policy for {} ({account}).",
                self.mode,
                display_service(&self.service)
            ),
            format!(
                "{} of {} actions {verb}: called {comparison} {} times.",
                self.actions_selected, self.entries_considered, self.threshold
            ),
        ];
        if self.reports_ignored > 0 {
            lines.push(format!(
                "{} additional report(s) in the input were ignored.",
                self.reports_ignored
            ));
        }
        if let Some(output) = &self.output {
            lines.push(format!("Written to {}.", output.display()));
        }
        lines.push(format!("Generated {}.", format_timestamp(self.generated_at)));
        lines.join("\n")
    }
}

fn display_service(service: &str) -> &str {
    if service.is_empty() {
        "unnamed service"
    } else {
        service
    }
}

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(&Rfc3339)
        .unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}
