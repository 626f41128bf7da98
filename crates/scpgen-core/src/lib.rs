pub mod config;
pub mod error;
pub mod ids;
pub mod mode;
pub mod report;

pub use config::{Config, ConfigPaths};
pub use error::ScpError;
pub use ids::RunId;
pub use mode::PolicyMode;
pub use report::{
    parse_report, service_name, ReportSelection, ReportSet, SelectedReport, UsageEntry, UsageReport,
};
