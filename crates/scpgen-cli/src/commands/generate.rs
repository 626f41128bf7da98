use std::path::PathBuf;

use anyhow::Result;

use reporting::render_summary_json;
use runner::{FilePolicySink, FileReportSource, PipelineRequest};
use scpgen_core::config::Config;
use scpgen_core::report::ReportSelection;

use crate::commands::config::load_effective;

pub struct GenerateInputs {
    pub config_path: Option<PathBuf>,
    pub overrides: Overrides,
    pub json: bool,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub mode: Option<String>,
    pub input: Option<PathBuf>,
    pub threshold: Option<i64>,
    pub output: Option<PathBuf>,
    pub strict_single_report: bool,
}

#[derive(Debug, PartialEq)]
pub struct Settings {
    pub request: PipelineRequest,
    pub input: PathBuf,
    pub output: PathBuf,
}

pub fn resolve_settings(config: Config, overrides: Overrides) -> Settings {
    let selection = if overrides.strict_single_report {
        ReportSelection::Single
    } else {
        config.input.selection
    };
    Settings {
        request: PipelineRequest {
            mode: overrides.mode.unwrap_or(config.policy.mode),
            threshold: overrides.threshold.unwrap_or(config.policy.threshold),
            selection,
        },
        input: overrides.input.unwrap_or(config.input.path),
        output: overrides.output.unwrap_or(config.output.path),
    }
}

pub fn execute(inputs: GenerateInputs) -> Result<()> {
    let config = load_effective(inputs.config_path)?;
    let settings = resolve_settings(config, inputs.overrides);
    tracing::debug!(
        mode = %settings.request.mode,
        threshold = settings.request.threshold,
        selection = %settings.request.selection,
        input = %settings.input.display(),
        output = %settings.output.display(),
        "generating policy"
    );

    let source = FileReportSource::new(&settings.input);
    let sink = FilePolicySink::new(&settings.output);
    let outcome = match runner::execute(&settings.request, &source, &sink) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(error = %err, "policy generation failed");
            return Err(err.into());
        }
    };

    if outcome.reports_ignored > 0 {
        tracing::warn!(
            ignored = outcome.reports_ignored,
            "usage file holds more than one report; only the first was used"
        );
    }

    let summary = outcome.summary().with_output(settings.output);
    if inputs.json {
        println!("{}", render_summary_json(&summary));
    } else {
        println!("{}", summary.human_summary());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_overrides() {
        let settings = resolve_settings(Config::default_config(), Overrides::default());
        assert_eq!(settings.request.mode, "Allow");
        assert_eq!(settings.request.threshold, 10);
        assert_eq!(settings.request.selection, ReportSelection::First);
        assert_eq!(settings.input, PathBuf::from("./s3_usage.json"));
        assert_eq!(settings.output, PathBuf::from("testSCP.json"));
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default_config();
        config.policy.mode = "Deny".to_string();
        config.policy.threshold = 50;

        let settings = resolve_settings(
            config,
            Overrides {
                mode: Some("allow".to_string()),
                input: Some(PathBuf::from("usage/ec2.json")),
                threshold: Some(5),
                output: None,
                strict_single_report: true,
            },
        );
        assert_eq!(settings.request.mode, "allow");
        assert_eq!(settings.request.threshold, 5);
        assert_eq!(settings.request.selection, ReportSelection::Single);
        assert_eq!(settings.input, PathBuf::from("usage/ec2.json"));
        assert_eq!(settings.output, PathBuf::from("testSCP.json"));
    }

    #[test]
    fn test_config_values_used_when_flags_absent() {
        let mut config = Config::default_config();
        config.policy.threshold = 75;
        config.input.selection = ReportSelection::Single;
        let settings = resolve_settings(config, Overrides::default());
        assert_eq!(settings.request.threshold, 75);
        assert_eq!(settings.request.selection, ReportSelection::Single);
    }

    #[test]
    fn test_execute_writes_policy() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let input = dir.path().join("s3_usage.json");
        let output = dir.path().join("testSCP.json");
        Config::default_config().save(&config_path).unwrap();
        fs::write(
            &input,
            r#"[{"results": {"event_source": "s3.amazonaws.com", "service_usage": [
                {"event_name": "GetObject", "count": 205},
                {"event_name": "GetBucketLifecycle", "count": 1}
            ]}}]"#,
        )
        .unwrap();

        execute(GenerateInputs {
            config_path: Some(config_path),
            overrides: Overrides {
                input: Some(input),
                output: Some(output.clone()),
                ..Overrides::default()
            },
            json: true,
        })
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["Statement"]["Action"], serde_json::json!(["s3:GetObject"]));
    }

    #[test]
    fn test_execute_surfaces_invalid_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let output = dir.path().join("testSCP.json");
        Config::default_config().save(&config_path).unwrap();

        let err = execute(GenerateInputs {
            config_path: Some(config_path),
            overrides: Overrides {
                mode: Some("Allowme".to_string()),
                output: Some(output.clone()),
                ..Overrides::default()
            },
            json: false,
        })
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<scpgen_core::ScpError>(),
            Some(scpgen_core::ScpError::InvalidMode(_))
        ));
        assert!(!output.exists());
    }
}
