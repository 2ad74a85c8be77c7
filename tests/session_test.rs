//! Session-level tests: per-section degradation and refresh supersession.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use quest_data::api::QuestApi;
use quest_data::model::category_by_value;
use quest_data::{AppResult, Quest, QuestError, QuestSession, RawDatasetRecord, Subscriber};

fn raw(user: &str, kind: &str, value: &str) -> RawDatasetRecord {
    RawDatasetRecord {
        user_guid: user.into(),
        quest_guid: "quest-1".into(),
        timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        kind: kind.into(),
        value: value.into(),
    }
}

/// Scripted API double. Sections can be failed independently and the dataset
/// fetch can be slowed down to model an in-flight refresh being superseded.
struct ScriptedApi {
    fail_detail: AtomicBool,
    fail_subscribers: AtomicBool,
    fail_datasets: AtomicBool,
    dataset_delay_ms: AtomicU64,
    datasets: Vec<RawDatasetRecord>,
    subscribers: Vec<Subscriber>,
}

impl ScriptedApi {
    fn new(datasets: Vec<RawDatasetRecord>, subscribers: Vec<Subscriber>) -> Self {
        Self {
            fail_detail: AtomicBool::new(false),
            fail_subscribers: AtomicBool::new(false),
            fail_datasets: AtomicBool::new(false),
            dataset_delay_ms: AtomicU64::new(0),
            datasets,
            subscribers,
        }
    }
}

#[async_trait]
impl QuestApi for ScriptedApi {
    async fn quest_detail(&self, quest_id: &str) -> AppResult<Quest> {
        if self.fail_detail.load(Ordering::SeqCst) {
            return Err(QuestError::Fetch("detail unavailable".into()));
        }
        Ok(Quest {
            guid: quest_id.into(),
            title: "Sleep & Activity Study".into(),
            description: String::new(),
            experiment: None,
        })
    }

    async fn quest_subscribers(&self, _quest_id: &str) -> AppResult<Vec<Subscriber>> {
        if self.fail_subscribers.load(Ordering::SeqCst) {
            return Err(QuestError::Fetch("subscribers unavailable".into()));
        }
        Ok(self.subscribers.clone())
    }

    async fn quest_datasets(&self, _quest_id: &str) -> AppResult<Vec<RawDatasetRecord>> {
        let delay = self.dataset_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_datasets.load(Ordering::SeqCst) {
            return Err(QuestError::Fetch("datasets unavailable".into()));
        }
        Ok(self.datasets.clone())
    }
}

fn sample_batch() -> Vec<RawDatasetRecord> {
    // Health samples land inside the default one-week window anchored at the
    // fetch time, so chart projections over a fresh snapshot see them.
    let an_hour_ago = (Utc::now() - chrono::Duration::hours(1)).timestamp_millis();
    let payload = format!(
        r#"[{{"metricCategory":"steps","timestamp":{an_hour_ago},"numericValue":5000.0}}]"#
    );
    vec![
        raw("npub-a", "health", &payload),
        raw("npub-b", "prompt_responses", "yes"),
    ]
}

#[tokio::test]
async fn subscriber_failure_does_not_block_datasets() {
    let api = Arc::new(ScriptedApi::new(sample_batch(), Vec::new()));
    api.fail_subscribers.store(true, Ordering::SeqCst);

    let session = QuestSession::new(api, "quest-1");
    assert!(session.refresh().await);

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.subscribers.count(), 0);
    assert_eq!(snapshot.buckets.health.len(), 1);
    assert_eq!(snapshot.buckets.prompt_responses.len(), 1);
    assert!(snapshot.quest.is_some());
}

#[tokio::test]
async fn dataset_failure_degrades_to_empty_buckets() {
    let api = Arc::new(ScriptedApi::new(
        sample_batch(),
        vec![Subscriber {
            user_npub: "npub-a".into(),
            consent_claims: Vec::new(),
        }],
    ));
    api.fail_datasets.store(true, Ordering::SeqCst);
    api.fail_detail.store(true, Ordering::SeqCst);

    let session = QuestSession::new(api, "quest-1");
    assert!(session.refresh().await);

    let snapshot = session.snapshot().unwrap();
    assert!(snapshot.quest.is_none());
    assert!(snapshot.buckets.is_empty());
    // The section that succeeded still renders.
    assert_eq!(snapshot.subscribers.count(), 1);
    // Export still emits the header row only.
    assert_eq!(
        session.export_csv().unwrap(),
        "userGuid,questGuid,timestamp,type,value\n"
    );
}

#[tokio::test]
async fn stale_refresh_is_discarded_on_arrival() {
    let api = Arc::new(ScriptedApi::new(sample_batch(), Vec::new()));
    let session = Arc::new(QuestSession::new(api.clone(), "quest-1"));

    // First refresh stalls in the dataset fetch.
    api.dataset_delay_ms.store(300, Ordering::SeqCst);
    let slow = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Second refresh overtakes it.
    api.dataset_delay_ms.store(0, Ordering::SeqCst);
    assert!(session.refresh().await);
    let applied_seq = session.snapshot().unwrap().seq;

    // The slow response arrives last but must not win.
    assert!(!slow.await.unwrap());
    assert_eq!(session.snapshot().unwrap().seq, applied_seq);
}

#[tokio::test]
async fn category_switch_reprojects_without_refetching() {
    let api = Arc::new(ScriptedApi::new(sample_batch(), Vec::new()));
    let session = QuestSession::new(api, "quest-1");
    assert!(session.refresh().await);

    let steps = category_by_value("steps").unwrap();
    let sleep = category_by_value("sleep").unwrap();

    let first = session.chart(steps);
    let other = session.chart(sleep);
    let second = session.chart(steps);

    assert_eq!(first.len(), 1);
    assert!(other.is_empty());
    assert_eq!(first, second);
    // The snapshot was not replaced by the projections.
    assert_eq!(session.snapshot().unwrap().seq, 1);
}

#[tokio::test]
async fn export_file_uses_the_naming_convention() {
    let api = Arc::new(ScriptedApi::new(sample_batch(), Vec::new()));
    let session = QuestSession::new(api, "quest-42");
    assert!(session.refresh().await);

    let dir = tempfile::tempdir().unwrap();
    let path = session.export_to_dir(dir.path()).unwrap();
    assert!(path.ends_with("quest_quest-42_data.csv"));

    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.starts_with("userGuid,questGuid,timestamp,type,value\n"));
    assert_eq!(contents.lines().count(), 3);
}
