use policy_engine::PolicyDocument;
use scpgen_core::ScpError;

use crate::GenerationSummary;

/// Renders the document the way it is written to disk: indented JSON.
pub fn render_policy_json(document: &PolicyDocument) -> Result<String, ScpError> {
    serde_json::to_string_pretty(document)
        .map_err(|err| ScpError::Persistence(format!("render policy JSON: {err}")))
}

pub fn render_summary_json(summary: &GenerationSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy_engine::{synthesize, ActionTally};
    use scpgen_core::PolicyMode;

    #[test]
    fn test_render_policy_is_indented() {
        let tally: ActionTally = [("GetObject".to_string(), 205)].into_iter().collect();
        let document = synthesize(PolicyMode::Allow, "s3", &tally);
        let rendered = render_policy_json(&document).unwrap();
        assert!(rendered.starts_with("{\n  \"Version\": \"2012-10-17\""));
        assert!(rendered.contains("\"s3:GetObject\""));
        let parsed: PolicyDocument = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, document);
    }
}
