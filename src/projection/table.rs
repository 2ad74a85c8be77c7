//! Tabular projection of participant responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{DatasetKind, DecodedRecord, DecodedValue};

/// One flattened table row, ready for rendering or serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub user_guid: String,
    pub kind: DatasetKind,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub value: String,
}

/// Flatten the prompt and onboarding buckets into a single row sequence.
///
/// Prompt responses come first, onboarding responses second; neither bucket
/// is re-sorted, so presentation order equals arrival order.
pub fn flatten(prompt_bucket: &[DecodedRecord], onboarding_bucket: &[DecodedRecord]) -> Vec<Row> {
    prompt_bucket
        .iter()
        .chain(onboarding_bucket.iter())
        .map(|record| Row {
            user_guid: record.user_guid.clone(),
            kind: record.kind,
            timestamp: record.timestamp,
            value: render_value(&record.value),
        })
        .collect()
}

/// Render a decoded value for display: plain strings verbatim, structured
/// payloads pretty-printed with 2-space indentation and sorted keys so
/// re-renders are visually deterministic.
pub fn render_value(value: &DecodedValue) -> String {
    match value {
        DecodedValue::Text(text) => text.clone(),
        DecodedValue::Structured(json) => {
            serde_json::to_string_pretty(json).unwrap_or_default()
        }
        DecodedValue::Samples(samples) => {
            serde_json::to_string_pretty(samples).unwrap_or_default()
        }
    }
}
