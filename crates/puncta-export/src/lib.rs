//! puncta-export: Pure tabular serializers (sans-IO)
//!
//! Converts per-image metric records into output formats. Currently
//! supports CSV; JSON rides the serde derives on [`MetricsRecord`]
//! (serialized by callers with `serde_json`).

pub mod csv;

pub use csv::{MetricsRecord, to_csv};
