//! In-memory rendering of a report into its persisted representations.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::error::ReportError;
use crate::types::ClassificationResult;

use super::AggregateReport;

/// One persisted representation of a report.
pub trait Reporter: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Render the full artifact into memory.
    fn render(&self, report: &AggregateReport) -> Result<Vec<u8>, ReportError>;
}

/// The two artifacts every run produces: nested JSON, flat CSV.
pub fn registered_reporters(pretty: bool) -> Vec<Box<dyn Reporter>> {
    vec![Box::new(JsonReporter { pretty }), Box::new(CsvReporter)]
}

/// Nested representation: summary, statistics and every result.
#[derive(Debug, Default)]
pub struct JsonReporter {
    pub pretty: bool,
}

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &AggregateReport) -> Result<Vec<u8>, ReportError> {
        let rendered = if self.pretty {
            serde_json::to_vec_pretty(report)
        } else {
            serde_json::to_vec(report)
        };
        let mut bytes = rendered.map_err(|e| ReportError::Serialize {
            format: "json",
            message: e.to_string(),
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Flat representation: one row per item.
#[derive(Debug, Default)]
pub struct CsvReporter;

impl CsvReporter {
    const HEADER: &'static str = "id,path,status,width,height,pixel_count,tier,error";

    fn row(result: &ClassificationResult) -> String {
        let path = result.source_path.to_string_lossy();
        let (width, height, pixels) = if result.is_ok() {
            (
                result.width.to_string(),
                result.height.to_string(),
                result.pixel_count.to_string(),
            )
        } else {
            (String::new(), String::new(), String::new())
        };
        let tier = result.resolution_tier.map(|t| t.label()).unwrap_or_default();
        let error = result.error_message.as_deref().unwrap_or_default();

        format!(
            "{},{},{},{},{},{},{},{}",
            csv_field(&result.item_id),
            csv_field(&path),
            result.status.as_str(),
            width,
            height,
            pixels,
            tier,
            csv_field(error),
        )
    }
}

impl Reporter for CsvReporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, report: &AggregateReport) -> Result<Vec<u8>, ReportError> {
        let mut out = String::with_capacity(64 * (report.individual_results.len() + 1));
        out.push_str(Self::HEADER);
        out.push('\n');
        for result in &report.individual_results {
            writeln!(out, "{}", Self::row(result)).map_err(|e| ReportError::Serialize {
                format: "csv",
                message: e.to_string(),
            })?;
        }
        Ok(out.into_bytes())
    }
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
