//! Result sinks and output formatting for finished benchmark runs.

use std::path::Path;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::Serialize;
use thiserror::Error;

use crate::core::{BenchmarkState, StatusSink};
use crate::stats::SummaryStatistics;

/// Errors raised while exporting results.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize results: {0}")]
    Csv(#[from] csv::Error),
}

/// Collecting sink, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub entries: Vec<(String, u64)>,
}

impl StatusSink for MemorySink {
    fn put(&mut self, key: &str, value_ns: u64) {
        self.entries.push((key.to_string(), value_ns));
    }
}

/// Sink that prints each key/value pair to the console.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn put(&mut self, key: &str, value_ns: u64) {
        println!("  {} = {} ns", key.bold(), value_ns);
    }
}

/// Results of one finished benchmark, detached from the state machine.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub name: String,
    pub statistics: SummaryStatistics,
    pub samples: Vec<u64>,
}

impl RunRecord {
    /// Snapshots a finished run. Panics if the benchmark has not finished.
    pub fn from_state(name: impl Into<String>, state: &BenchmarkState) -> Self {
        Self {
            name: name.into(),
            statistics: state.statistics().clone(),
            samples: state.samples().to_vec(),
        }
    }
}

/// Builds a summary table of finished runs.
pub fn summary_table(records: &[RunRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Benchmark",
        "Median (ns)",
        "Mean (ns)",
        "Min (ns)",
        "StdDev (ns)",
        "Trials",
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(record.statistics.median),
            Cell::new(format!("{:.0}", record.statistics.mean)),
            Cell::new(record.statistics.min),
            Cell::new(format!("{:.1}", record.statistics.standard_deviation)),
            Cell::new(record.samples.len()),
        ]);
    }
    table
}

#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    median_ns: u64,
    mean_ns: f64,
    min_ns: u64,
    standard_deviation_ns: f64,
    trials: usize,
    raw_samples_ns: String,
}

/// Writes one CSV row of statistics per run, raw samples included.
pub fn write_csv<P: AsRef<Path>>(records: &[RunRecord], path: P) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        let raw_samples_ns = record
            .samples
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(";");
        writer.serialize(CsvRow {
            name: &record.name,
            median_ns: record.statistics.median,
            mean_ns: record.statistics.mean,
            min_ns: record.statistics.min,
            standard_deviation_ns: record.statistics.standard_deviation,
            trials: record.samples.len(),
            raw_samples_ns,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(name: &str) -> RunRecord {
        RunRecord {
            name: name.to_string(),
            statistics: SummaryStatistics::from_samples(&[10, 20, 30]).unwrap(),
            samples: vec![10, 20, 30],
        }
    }

    #[test]
    fn memory_sink_collects_pairs() {
        let mut sink = MemorySink::default();
        sink.put("bench_median", 42);
        sink.put("bench_mean", 43);
        assert_eq!(
            sink.entries,
            vec![("bench_median".to_string(), 42), ("bench_mean".to_string(), 43)]
        );
    }

    #[test]
    fn table_lists_each_run() {
        let table = summary_table(&[record("copy"), record("sort")]);
        let rendered = table.to_string();
        assert!(rendered.contains("copy"));
        assert!(rendered.contains("sort"));
        assert!(rendered.contains("Median (ns)"));
    }

    #[test]
    fn csv_contains_header_and_rows() {
        let path = std::env::temp_dir().join(format!("loopbench-{}.csv", std::process::id()));
        write_csv(&[record("copy")], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,median_ns,mean_ns,min_ns,standard_deviation_ns,trials,raw_samples_ns"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("copy,20,20"));
        assert!(row.contains("10;20;30"));
    }
}
