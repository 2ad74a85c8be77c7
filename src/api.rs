//! The authenticated quest API consumed by this crate.
//!
//! The request layer itself belongs to a collaborator; this module only
//! defines the seam ([`QuestApi`]) plus the concrete HTTP client that talks
//! to the backend's three quest endpoints with a bearer credential. Tests
//! substitute their own implementations of the trait.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppResult, QuestError};
use crate::model::{Quest, RawDatasetRecord, Subscriber};

/// The three independent quest fetches. Each may fail on its own; callers
/// degrade per-section rather than propagating.
#[async_trait]
pub trait QuestApi: Send + Sync {
    /// `GET /quest/detail?questId=..`
    async fn quest_detail(&self, quest_id: &str) -> AppResult<Quest>;

    /// `GET /quest/subscribers?questId=..`
    async fn quest_subscribers(&self, quest_id: &str) -> AppResult<Vec<Subscriber>>;

    /// `GET /quest/datasets?questId=..`
    async fn quest_datasets(&self, quest_id: &str) -> AppResult<Vec<RawDatasetRecord>>;
}

// Response envelopes used by the backend.

#[derive(Debug, Deserialize)]
struct QuestDetailResponse {
    quest: Quest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribersResponse {
    user_quests: Vec<Subscriber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetsResponse {
    user_quest_datasets: Vec<RawDatasetRecord>,
}

/// HTTP implementation of [`QuestApi`] over the backend's REST endpoints.
pub struct HttpQuestApi {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl HttpQuestApi {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        quest_id: &str,
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(%url, quest_id, "quest api request");

        let response = self
            .client
            .get(&url)
            .query(&[("questId", quest_id)])
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuestError::Fetch(format!(
                "{path} returned HTTP {status} for quest {quest_id}"
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl QuestApi for HttpQuestApi {
    async fn quest_detail(&self, quest_id: &str) -> AppResult<Quest> {
        let envelope: QuestDetailResponse = self.get_json("/quest/detail", quest_id).await?;
        Ok(envelope.quest)
    }

    async fn quest_subscribers(&self, quest_id: &str) -> AppResult<Vec<Subscriber>> {
        let envelope: SubscribersResponse = self.get_json("/quest/subscribers", quest_id).await?;
        Ok(envelope.user_quests)
    }

    async fn quest_datasets(&self, quest_id: &str) -> AppResult<Vec<RawDatasetRecord>> {
        let envelope: DatasetsResponse = self.get_json("/quest/datasets", quest_id).await?;
        Ok(envelope.user_quest_datasets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_envelope_matches_backend_shape() {
        let json = r#"{
            "userQuestDatasets": [{
                "userGuid": "u-1",
                "questGuid": "q-1",
                "timestamp": 1700000000000,
                "type": "prompt_responses",
                "value": "yes"
            }]
        }"#;
        let envelope: DatasetsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.user_quest_datasets.len(), 1);
        assert_eq!(envelope.user_quest_datasets[0].value, "yes");
    }

    #[test]
    fn subscriber_envelope_matches_backend_shape() {
        let json = r#"{
            "userQuests": [
                {"userNpub": "npub-a", "consentClaims": [{"timestamp": 1700000000000}]}
            ]
        }"#;
        let envelope: SubscribersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.user_quests[0].user_npub, "npub-a");
        assert_eq!(envelope.user_quests[0].consent_claims.len(), 1);
    }
}
