mod cli;
mod json;
mod text;

pub use cli::{format_summary, print_cors_table, print_summary};
pub use json::render_json;
pub use text::render_text_report;

use crate::error::{Result, ScanError};
use crate::model::ScanResultSet;
use std::fs;
use std::path::Path;

/// Report format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable block per target
    Text,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

/// Format results to string for file output
pub fn format_results(results: &ScanResultSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text_report(results)),
        OutputFormat::Json => render_json(results),
    }
}

/// Renders `results` and writes them to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ScanError::ReportWrite`] if the file cannot be created or written.
pub fn write_report(results: &ScanResultSet, path: &Path, format: OutputFormat) -> Result<()> {
    let content = format_results(results, format)?;
    fs::write(path, content).map_err(|source| ScanError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScanResult;
    use std::str::FromStr;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TEXT"), Ok(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("json"), Ok(OutputFormat::Json));
        assert!(OutputFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_write_report_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        let set = ScanResultSet::new(
            vec![ScanResult::failed("http://a.test/", "boom")],
            chrono::Utc::now(),
        );

        let err = write_report(&set, &path, OutputFormat::Text).unwrap_err();
        assert!(matches!(err, ScanError::ReportWrite { .. }));
    }

    #[test]
    fn test_write_report_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let set = ScanResultSet::new(
            vec![ScanResult::failed("http://a.test/", "boom")],
            chrono::Utc::now(),
        );

        write_report(&set, &path, OutputFormat::Json).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("http://a.test/"));
    }
}
