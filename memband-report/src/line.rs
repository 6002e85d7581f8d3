//! Result Lines
//!
//! The fixed-width, tab-separated line printed for every result:
//!
//! ```text
//! AVG\t<description padded to 52>Elapsed: 0.01234\tMiB: 64.00000\tCopy: 5186.386 MiB/s
//! ```

use crate::report::AggregateResult;
use memband_core::Measurement;

/// Width the description column is padded to
pub const DESCRIPTION_WIDTH: usize = 52;

/// MiB/s for `data_mib` moved in `seconds`; `None` unless `seconds` is positive and finite.
pub fn throughput_mib_s(data_mib: f64, seconds: f64) -> Option<f64> {
    (seconds > 0.0 && seconds.is_finite()).then(|| data_mib / seconds)
}

/// Format one result line (no trailing newline).
///
/// A zero elapsed time is reported as an undefined throughput instead of
/// an infinite one.
pub fn format_result_line(description: &str, elapsed_seconds: f64, data_mib: f64) -> String {
    let rate = match throughput_mib_s(data_mib, elapsed_seconds) {
        Some(rate) => format!("Copy: {:.3} MiB/s", rate),
        None => "Copy: undefined (elapsed time below timer resolution)".to_string(),
    };
    format!(
        "{:<width$}Elapsed: {:.5}\tMiB: {:.5}\t{}",
        description,
        elapsed_seconds,
        data_mib,
        rate,
        width = DESCRIPTION_WIDTH
    )
}

/// Line for a single timed run, prefixed by its iteration number
pub fn format_run_line(iteration: u64, description: &str, m: &Measurement, data_mib: f64) -> String {
    format!(
        "{}\t{}",
        iteration,
        format_result_line(description, m.seconds, data_mib)
    )
}

/// Averaged line for a kernel, `None` if it never completed a run
pub fn format_average_line(agg: &AggregateResult) -> Option<String> {
    agg.average_seconds().map(|avg| {
        format!(
            "AVG\t{}",
            format_result_line(&agg.description, avg, agg.data_mib)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use memband_core::Strategy;

    #[test]
    fn test_line_layout() {
        let line = format_result_line("copy", 0.5, 64.0);
        assert_eq!(
            line,
            format!(
                "copy{}Elapsed: 0.50000\tMiB: 64.00000\tCopy: 128.000 MiB/s",
                " ".repeat(48)
            )
        );
    }

    #[test]
    fn test_long_description_is_not_truncated() {
        let name = "x".repeat(60);
        let line = format_result_line(&name, 1.0, 1.0);
        assert!(line.starts_with(&format!("{}Elapsed: ", name)));
    }

    #[test]
    fn test_zero_elapsed_is_flagged() {
        let line = format_result_line("fill", 0.0, 1.0);
        assert!(line.ends_with("Copy: undefined (elapsed time below timer resolution)"));
        assert!(!line.contains("inf"));
        assert!(!line.contains("NaN"));
    }

    #[test]
    fn test_throughput_guard() {
        assert_eq!(throughput_mib_s(10.0, 2.0), Some(5.0));
        assert_eq!(throughput_mib_s(10.0, 0.0), None);
        assert_eq!(throughput_mib_s(10.0, -1.0), None);
        assert_eq!(throughput_mib_s(10.0, f64::NAN), None);
    }

    #[test]
    fn test_run_and_average_lines() {
        let m = Measurement {
            seconds: 0.25,
            cycles: 0,
        };
        let run = format_run_line(2, "fill", &m, 1.0);
        assert!(run.starts_with("2\tfill "));
        assert!(run.ends_with("Copy: 4.000 MiB/s"));

        let mut agg = AggregateResult::new(9, "fill", Strategy::Direct, 1.0);
        assert_eq!(format_average_line(&agg), None);
        agg.record(&m);
        let avg = format_average_line(&agg).unwrap();
        assert!(avg.starts_with("AVG\tfill "));
    }
}
