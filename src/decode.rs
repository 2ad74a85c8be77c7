//! Per-record payload decoding.
//!
//! A record's `type` tag fully determines the shape of its `value` payload.
//! `decode` enforces that contract explicitly instead of mutating a field of
//! ambiguous type in place: the result is either a typed [`DecodedRecord`] or
//! a [`QuestError`] describing why the record was rejected. Decoding one
//! record never touches another; a bad payload is dropped, not a batch abort.

use serde_json::Value;

use crate::error::QuestError;
use crate::model::{DatasetKind, DecodedRecord, DecodedValue, HealthSample, RawDatasetRecord};

/// Decode one raw record into its typed form. Pure; no side effects.
///
/// - `health` payloads must parse as a JSON array of metric samples; anything
///   else is a [`QuestError::Decode`].
/// - `prompt_responses` / `onboarding_responses` payloads stay structured when
///   they parse as a JSON object or array, and fall back to raw text
///   otherwise. Text is a legal terminal form for these two tags, so this arm
///   never fails.
/// - A tag outside the closed set is [`QuestError::UnknownDatasetType`].
pub fn decode(record: RawDatasetRecord) -> Result<DecodedRecord, QuestError> {
    let kind: DatasetKind = record.kind.parse()?;

    let value = match kind {
        DatasetKind::Health => decode_health(&record)?,
        DatasetKind::PromptResponses | DatasetKind::OnboardingResponses => {
            decode_response(record.value)
        }
    };

    Ok(DecodedRecord {
        user_guid: record.user_guid,
        quest_guid: record.quest_guid,
        timestamp: record.timestamp,
        kind,
        value,
    })
}

fn decode_health(record: &RawDatasetRecord) -> Result<DecodedValue, QuestError> {
    let samples: Vec<HealthSample> =
        serde_json::from_str(&record.value).map_err(|err| QuestError::Decode {
            kind: record.kind.clone(),
            user_guid: record.user_guid.clone(),
            reason: err.to_string(),
        })?;
    Ok(DecodedValue::Samples(samples))
}

fn decode_response(raw: String) -> DecodedValue {
    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => DecodedValue::Structured(value),
        // Scalars (and unparseable text) stay verbatim.
        _ => DecodedValue::Text(raw),
    }
}
