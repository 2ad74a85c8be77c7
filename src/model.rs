//! Core data types for quest datasets.
//!
//! A quest collects heterogeneous participant submissions under one
//! identifier. Each submission arrives as a [`RawDatasetRecord`] whose
//! `value` payload is an opaque string; its shape is fully determined by the
//! record's [`DatasetKind`]. Decoding (see [`crate::decode`]) turns the
//! opaque payload into a [`DecodedValue`] without ever guessing: a health
//! record that does not parse is a decode failure, never a coerced string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::QuestError;

//==============================================================================
// Dataset records
//==============================================================================

/// The closed set of dataset tags a record may carry.
///
/// The tag determines the shape of the record's `value` payload; anything
/// outside this set is rejected as [`QuestError::UnknownDatasetType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Health,
    PromptResponses,
    OnboardingResponses,
}

impl DatasetKind {
    /// Wire form of the tag, as submitted by participants.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Health => "health",
            DatasetKind::PromptResponses => "prompt_responses",
            DatasetKind::OnboardingResponses => "onboarding_responses",
        }
    }
}

impl FromStr for DatasetKind {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "health" => Ok(DatasetKind::Health),
            "prompt_responses" => Ok(DatasetKind::PromptResponses),
            "onboarding_responses" => Ok(DatasetKind::OnboardingResponses),
            other => Err(QuestError::UnknownDatasetType(other.to_string())),
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation submitted by a participant, exactly as it comes off the
/// wire. The `type` tag is kept as a plain string here so an unknown tag can
/// be reported instead of failing deserialization of the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDatasetRecord {
    pub user_guid: String,
    pub quest_guid: String,
    /// Point in time the observation pertains to (not submission time).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque payload; shape is determined by `kind`.
    pub value: String,
}

/// One sample inside a health record's payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSample {
    pub metric_category: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub numeric_value: f64,
}

/// Typed payload of a decoded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecodedValue {
    /// Health payload: an ordered sequence of metric samples.
    Samples(Vec<HealthSample>),
    /// A structured (object or array) response payload.
    Structured(serde_json::Value),
    /// A plain textual response. Legal terminal form for prompt and
    /// onboarding responses.
    Text(String),
}

impl DecodedValue {
    /// Encode the payload for export: structured payloads become their JSON
    /// text, plain text stays literal.
    pub fn to_export_string(&self) -> String {
        match self {
            // Serializing Vec<HealthSample>/Value to a string cannot fail.
            DecodedValue::Samples(samples) => {
                serde_json::to_string(samples).unwrap_or_default()
            }
            DecodedValue::Structured(value) => value.to_string(),
            DecodedValue::Text(text) => text.clone(),
        }
    }
}

/// A dataset record whose payload has been decoded according to its tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRecord {
    pub user_guid: String,
    pub quest_guid: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: DatasetKind,
    pub value: DecodedValue,
}

//==============================================================================
// Quest metadata & subscribers
//==============================================================================

/// Quest metadata, immutable once fetched by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub guid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Optional linked experiment reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment: Option<ExperimentRef>,
}

/// Reference to an experiment embedded in a quest page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A timestamped attestation by a subscriber permitting data use. Carries
/// arbitrary string/number attributes alongside the timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentClaim {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// A participant identity subscribed to a quest, with its consent history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub user_npub: String,
    #[serde(default)]
    pub consent_claims: Vec<ConsentClaim>,
}

//==============================================================================
// Display categories
//==============================================================================

/// A `{name, value}` pair selecting which health metric to chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayCategory {
    pub name: &'static str,
    pub value: &'static str,
}

/// The fixed, read-only enumeration of chartable metric categories. Known
/// ahead of time, never derived from data, never mutated in place.
pub const DISPLAY_CATEGORIES: &[DisplayCategory] = &[
    DisplayCategory {
        name: "Steps",
        value: "steps",
    },
    DisplayCategory {
        name: "Sleep",
        value: "sleep",
    },
    DisplayCategory {
        name: "Heart Rate",
        value: "heart_rate",
    },
];

/// Look up a category by its wire value.
pub fn category_by_value(value: &str) -> Option<&'static DisplayCategory> {
    DISPLAY_CATEGORIES.iter().find(|cat| cat.value == value)
}

/// Build the category list with a synthetic "All" entry prepended. Always a
/// fresh collection; the base enumeration stays untouched so concurrent
/// renders can never observe each other's insertions.
pub fn categories_with_all() -> Vec<DisplayCategory> {
    let mut list = Vec::with_capacity(DISPLAY_CATEGORIES.len() + 1);
    list.push(DisplayCategory {
        name: "All",
        value: "all",
    });
    list.extend(DISPLAY_CATEGORIES.iter().cloned());
    list
}
