#![warn(missing_docs)]
//! memband Report - Result Lines and Documents
//!
//! Turns per-kernel aggregates into output:
//! - Fixed-width result lines (the default terminal output)
//! - JSON (machine-readable, with run metadata)
//! - CSV (spreadsheet-compatible)

mod csv;
mod json;
mod line;
mod report;

pub use csv::generate_csv_report;
pub use json::{SCHEMA_VERSION, generate_json_report};
pub use line::{
    DESCRIPTION_WIDTH, format_average_line, format_result_line, format_run_line, throughput_mib_s,
};
pub use report::{
    AggregateResult, KernelReport, Report, ReportConfig, ReportMeta, ReportSummary, SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Result lines streamed as each kernel finishes
    #[default]
    Human,
    /// JSON with full metadata
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!("human".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
