//! CSV results-table serializer.
//!
//! One row per processed image, using the column names established by the
//! measurement protocol (`Unedited (Intensity)` through `PC`). NaN is
//! written literally as `NaN` so degenerate regions stay distinguishable
//! from absent data in downstream tooling.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use serde::{Deserialize, Serialize};

use puncta_pipeline::{IntensityMetrics, ProcessResult};

/// Column headers, in output order.
const HEADERS: [&str; 7] = [
    "Filename",
    "Unedited (Intensity)",
    "Background Removed (Intensity)",
    "Aggregates (Intensity)",
    "Red Aggregates (Intensity)",
    "Red Cytoplasm (Intensity)",
    "PC",
];

/// One reporting row: an image identifier, the five region means, and the
/// partition coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Identifier of the source image, typically its filename.
    pub identifier: String,
    /// Whole-image mean of the primary channel.
    pub unedited: f64,
    /// Primary-channel mean within the background mask.
    pub background_removed: f64,
    /// Primary-channel mean within the aggregate mask.
    pub aggregates: f64,
    /// Secondary-channel mean within the aggregate mask.
    pub red_aggregates: f64,
    /// Secondary-channel mean within the cytoplasm.
    pub red_cytoplasm: f64,
    /// Ratio of `red_aggregates` to `red_cytoplasm` (NaN when undefined).
    pub partition_coefficient: f64,
}

impl MetricsRecord {
    /// Build a record from raw metric values.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        metrics: &IntensityMetrics,
        partition_coefficient: f64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            unedited: metrics.unedited,
            background_removed: metrics.background_removed,
            aggregates: metrics.aggregates,
            red_aggregates: metrics.red_aggregates,
            red_cytoplasm: metrics.red_cytoplasm,
            partition_coefficient,
        }
    }

    /// Build a record from a pipeline result.
    #[must_use]
    pub fn from_result(identifier: impl Into<String>, result: &ProcessResult) -> Self {
        Self::new(identifier, &result.metrics, result.partition_coefficient)
    }
}

/// Serialize records into a CSV table with a header row.
///
/// Identifiers containing commas, quotes, or newlines are quoted per RFC
/// 4180; numeric cells never need quoting.
#[must_use]
pub fn to_csv(records: &[MetricsRecord]) -> String {
    let mut out = String::new();
    out.push_str(&HEADERS.join(","));
    out.push('\n');

    for record in records {
        let row = [
            quote_field(&record.identifier),
            format_value(record.unedited),
            format_value(record.background_removed),
            format_value(record.aggregates),
            format_value(record.red_aggregates),
            format_value(record.red_cytoplasm),
            format_value(record.partition_coefficient),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Format a metric cell; NaN is rendered literally.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else {
        format!("{value}")
    }
}

/// Quote a text cell when it contains a delimiter, quote, or newline.
fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
