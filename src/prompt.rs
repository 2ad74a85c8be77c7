//! Participant prompt data model and upsert store.
//!
//! A prompt is the question pushed to participants on a schedule; only the
//! frequency *data model* lives here, delivery is a collaborator's concern.
//! Creation and editing go through a single upsert keyed by `uuid`: an absent
//! uuid creates, a present one updates. There is no delete path.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// How a participant answers a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Number,
    #[serde(rename = "yesno")]
    YesNo,
}

/// Unit of the notification schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Days,
    Hours,
    Minutes,
}

/// How often a prompt fires: a positive count of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFrequency {
    pub value: u32,
    pub unit: FrequencyUnit,
}

/// A daily window during which notifications are suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub uuid: Uuid,
    pub prompt_text: String,
    pub response_type: ResponseType,
    pub notification_frequency: NotificationFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiet_hours: Option<QuietHours>,
}

/// Fields supplied by the editor when creating or updating a prompt. A
/// missing `uuid` means "create".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDraft {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub prompt_text: String,
    pub response_type: ResponseType,
    pub notification_frequency: NotificationFrequency,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quiet_hours: Option<QuietHours>,
}

/// In-memory store of a participant's prompts, keyed by uuid.
#[derive(Debug, Default)]
pub struct PromptStore {
    prompts: HashMap<Uuid, Prompt>,
}

impl PromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or update a prompt from a draft. A draft without a uuid gets a
    /// fresh v4 identity; one with a uuid replaces the stored prompt (or
    /// inserts under that uuid if none exists yet, making the operation
    /// idempotent).
    pub fn upsert(&mut self, draft: PromptDraft) -> &Prompt {
        let uuid = draft.uuid.unwrap_or_else(Uuid::new_v4);
        let prompt = Prompt {
            uuid,
            prompt_text: draft.prompt_text,
            response_type: draft.response_type,
            notification_frequency: draft.notification_frequency,
            category: draft.category,
            quiet_hours: draft.quiet_hours,
        };
        self.prompts.insert(uuid, prompt);
        // Just inserted under this key.
        &self.prompts[&uuid]
    }

    pub fn get(&self, uuid: &Uuid) -> Option<&Prompt> {
        self.prompts.get(uuid)
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Prompts filtered by category; `None` (the "All" selection) returns
    /// everything. Always a fresh collection.
    pub fn by_category(&self, category: Option<&str>) -> Vec<&Prompt> {
        self.prompts
            .values()
            .filter(|prompt| match category {
                Some(name) => prompt.category.as_deref() == Some(name),
                None => true,
            })
            .collect()
    }
}
