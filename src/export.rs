//! CSV export of all dataset buckets.
//!
//! The header row `userGuid,questGuid,timestamp,type,value` and its column
//! order are a compatibility contract for downstream consumers of the
//! exported file; do not reorder. The delimiter (`,`) and line terminator
//! (`\n`) are fixed, and no quoting or escaping is performed.
//!
//! Known limitation: values containing the delimiter or terminator (which
//! includes every structured JSON payload) corrupt column alignment. This
//! matches the export contract and is deliberate; callers must be aware.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;

use crate::classify::DatasetBuckets;
use crate::error::{AppResult, QuestError};

/// Fixed header row of the export file.
pub const EXPORT_HEADER: [&str; 5] = ["userGuid", "questGuid", "timestamp", "type", "value"];

/// Conventional file name for a quest's export.
pub fn export_file_name(quest_id: &str) -> String {
    format!("quest_{quest_id}_data.csv")
}

/// Serialize all buckets to the delimited export format.
///
/// Rows follow the fixed bucket order: health, prompt responses, onboarding
/// responses. The `value` column is the structured-to-text encoding of the
/// full payload (arrays and objects become their JSON text, scalars stay
/// literal), so a health row's value field parses back into the original
/// sample sequence. An empty batch still emits the header row.
pub fn encode(buckets: &DatasetBuckets) -> AppResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADER)
        .map_err(|err| QuestError::Export(err.to_string()))?;

    for record in buckets.iter_all() {
        writer
            .write_record(&[
                record.user_guid.clone(),
                record.quest_guid.clone(),
                record.timestamp.timestamp_millis().to_string(),
                record.kind.to_string(),
                record.value.to_export_string(),
            ])
            .map_err(|err| QuestError::Export(err.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| QuestError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| QuestError::Export(err.to_string()))
}

/// Encode and write the export file to `dir`, named
/// `quest_<questId>_data.csv`. Returns the written path.
pub fn write_export(buckets: &DatasetBuckets, quest_id: &str, dir: &Path) -> AppResult<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(export_file_name(quest_id));
    fs::write(&path, encode(buckets)?)?;
    info!(path = %path.display(), "wrote quest export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, decode_batch};
    use crate::model::{HealthSample, RawDatasetRecord};
    use chrono::{TimeZone, Utc};

    fn raw(user: &str, kind: &str, value: &str) -> RawDatasetRecord {
        RawDatasetRecord {
            user_guid: user.into(),
            quest_guid: "quest-1".into(),
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            kind: kind.into(),
            value: value.into(),
        }
    }

    #[test]
    fn empty_batch_emits_header_only() {
        let out = encode(&DatasetBuckets::default()).unwrap();
        assert_eq!(out, "userGuid,questGuid,timestamp,type,value\n");
    }

    #[test]
    fn rows_follow_the_fixed_bucket_order() {
        let batch = vec![
            raw("p", "prompt_responses", "yes"),
            raw("h", "health", "[]"),
            raw("o", "onboarding_responses", "25-34"),
        ];
        let buckets = classify(decode_batch(batch).records);
        let out = encode(&buckets).unwrap();
        let users: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(users, ["h", "p", "o"]);
    }

    #[test]
    fn health_value_column_round_trips() {
        let payload =
            r#"[{"metricCategory":"steps","timestamp":1700000000000,"numericValue":500.0}]"#;
        let buckets = classify(decode_batch(vec![raw("h", "health", payload)]).records);
        let out = encode(&buckets).unwrap();

        let row = out.lines().nth(1).unwrap();
        // The value column starts after the fourth comma; the JSON payload
        // itself contains commas (the documented alignment limitation).
        let value_field = row.splitn(5, ',').nth(4).unwrap();
        let samples: Vec<HealthSample> = serde_json::from_str(value_field).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].metric_category, "steps");
        assert_eq!(samples[0].numeric_value, 500.0);
    }

    #[test]
    fn scalar_values_stay_literal_and_unquoted() {
        let buckets =
            classify(decode_batch(vec![raw("p", "prompt_responses", "yes")]).records);
        let out = encode(&buckets).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert!(row.ends_with(",prompt_responses,yes"));
        assert!(!row.contains('"'));
    }

    #[test]
    fn write_export_uses_the_naming_convention() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(&DatasetBuckets::default(), "q-42", dir.path()).unwrap();
        assert!(path.ends_with("quest_q-42_data.csv"));
        assert!(path.exists());
    }
}
