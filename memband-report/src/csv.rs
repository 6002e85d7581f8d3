//! CSV Output

use crate::report::Report;
use std::fmt::Write;

const HEADER: &str =
    "index,description,strategy,iterations,average_seconds,data_mib,throughput_mib_s,mean_cycles";

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_default()
}

/// One row per kernel; undefined values are left empty.
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for r in &report.results {
        let strategy = match r.strategy {
            memband_core::Strategy::Batched => "batched",
            memband_core::Strategy::Staged => "staged",
            memband_core::Strategy::Direct => "direct",
        };
        let _ = writeln!(
            out,
            "{},{},{},{},{},{:.5},{},{:.0}",
            r.index,
            escape(&r.description),
            strategy,
            r.iterations,
            optional(r.average_seconds, 6),
            r.data_mib,
            optional(r.throughput_mib_s, 3),
            r.mean_cycles
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("copy"), "copy");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional(Some(1.5), 3), "1.500");
        assert_eq!(optional(None, 3), "");
    }
}
