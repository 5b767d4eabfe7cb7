//! Prometheus text exposition of a scrape.

use std::fmt::{Display, Write};

use crate::exporter::{PathSample, ScrapeResult};

/// Content type of the text exposition format.
pub const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

const NAMESPACE: &str = "folderstats";
const EXPORTER: &str = "exporter";

#[derive(Clone, Copy)]
enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
        }
    }
}

/// Render every series of `result`.
pub fn render(result: &ScrapeResult) -> String {
    let mut out = String::new();

    let exporter_name = |name: &str| format!("{NAMESPACE}_{EXPORTER}_{name}");
    let name = |name: &str| format!("{NAMESPACE}_{name}");

    single(
        &mut out,
        &exporter_name("last_scrape_duration_seconds"),
        "Duration of the last scrape of metrics from this exporter.",
        MetricType::Gauge,
        result.duration_seconds,
    );
    single(
        &mut out,
        &exporter_name("scrapes_total"),
        "Total number of times this exporter was scraped for metrics.",
        MetricType::Counter,
        result.scrapes_total,
    );
    single(
        &mut out,
        &exporter_name("last_scrape_error"),
        "Whether the last scrape of metrics resulted in an error (1 for error, 0 for success).",
        MetricType::Gauge,
        u8::from(result.error),
    );
    single(
        &mut out,
        &exporter_name("scrape_errors_total"),
        "Total number of times an error occurred scraping/file watching.",
        MetricType::Counter,
        result.scrape_errors_total,
    );
    single(
        &mut out,
        &name("up"),
        "Whether the file watching is up for the configured directories.",
        MetricType::Gauge,
        u8::from(result.up),
    );

    per_path(
        &mut out,
        &name("files_created"),
        "Total number of files in directory created during monitoring session.",
        MetricType::Counter,
        &result.paths,
        |p| p.totals.created.to_string(),
    );
    per_path(
        &mut out,
        &name("files_modified"),
        "Total number of files in directory modified during monitoring session.",
        MetricType::Counter,
        &result.paths,
        |p| p.totals.modified.to_string(),
    );
    per_path(
        &mut out,
        &name("files_deleted"),
        "Total number of files in directory removed during monitoring session.",
        MetricType::Counter,
        &result.paths,
        |p| p.totals.deleted.to_string(),
    );
    per_path(
        &mut out,
        &name("files_in_path"),
        "Current entry count in directory (capped at 1024, -1 if unknown).",
        MetricType::Gauge,
        &result.paths,
        |p| p.files_in_path.to_string(),
    );

    out
}

fn header(out: &mut String, name: &str, help: &str, kind: MetricType) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {}", kind.as_str());
}

fn single(out: &mut String, name: &str, help: &str, kind: MetricType, value: impl Display) {
    header(out, name, help, kind);
    let _ = writeln!(out, "{name} {value}");
}

fn per_path(
    out: &mut String,
    name: &str,
    help: &str,
    kind: MetricType,
    paths: &[PathSample],
    value: impl Fn(&PathSample) -> String,
) {
    header(out, name, help, kind);
    for sample in paths {
        let _ = writeln!(
            out,
            "{name}{{path=\"{}\"}} {}",
            escape_label(&sample.label),
            value(sample)
        );
    }
}

fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}
