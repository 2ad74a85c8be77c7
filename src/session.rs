//! Quest view session: fetch, normalize, retain, project.
//!
//! A session owns the latest [`QuestSnapshot`] for one quest. Each
//! `refresh()` issues a monotonically increasing sequence number, performs
//! the three independent fetches, and applies the result only if its
//! sequence number is still the latest issued. A slow stale response can
//! therefore never overwrite a faster fresh one (last-writer-wins by
//! sequence number, not by arrival time).
//!
//! The three data sources fail independently: a subscriber fetch failure
//! still renders datasets, and vice versa. Failed sections degrade to empty
//! collections with an operator-facing log line, never a blocking error.
//!
//! All projections (`chart`, `table`, `export_csv`) are pure reads over the
//! retained snapshot. The chart window is anchored at `fetched_at`, pinned
//! when the batch arrived, so re-projecting after a category switch is
//! reproducible and needs no new fetch.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::QuestApi;
use crate::classify::{classify, decode_batch, BatchStats, DatasetBuckets};
use crate::error::AppResult;
use crate::export;
use crate::model::{DisplayCategory, Quest};
use crate::projection::{flatten, project, Row, SeriesPoint, Window, DEFAULT_WINDOW};
use crate::subscribers::SubscriberView;

/// Everything one refresh produced. Owned by the session that fetched it;
/// fully replaced by the next applied refresh, never patched.
#[derive(Debug)]
pub struct QuestSnapshot {
    /// Refresh sequence number that produced this snapshot.
    pub seq: u64,
    /// When the batch was fetched. Chart windows anchor here.
    pub fetched_at: DateTime<Utc>,
    pub quest: Option<Quest>,
    pub subscribers: SubscriberView,
    pub buckets: DatasetBuckets,
    pub stats: BatchStats,
}

/// A per-quest view session over a [`QuestApi`].
pub struct QuestSession {
    api: Arc<dyn QuestApi>,
    quest_id: String,
    window: Window,
    issued: AtomicU64,
    snapshot: RwLock<Option<Arc<QuestSnapshot>>>,
}

impl QuestSession {
    pub fn new(api: Arc<dyn QuestApi>, quest_id: impl Into<String>) -> Self {
        Self::with_window(api, quest_id, DEFAULT_WINDOW)
    }

    pub fn with_window(api: Arc<dyn QuestApi>, quest_id: impl Into<String>, window: Window) -> Self {
        Self {
            api,
            quest_id: quest_id.into(),
            window,
            issued: AtomicU64::new(0),
            snapshot: RwLock::new(None),
        }
    }

    pub fn quest_id(&self) -> &str {
        &self.quest_id
    }

    /// Latest applied snapshot, if any refresh has completed.
    pub fn snapshot(&self) -> Option<Arc<QuestSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch all three quest resources and rebuild the snapshot.
    ///
    /// Returns `true` if the result was applied, `false` if it was discarded
    /// because a newer refresh was issued while this one was in flight.
    pub async fn refresh(&self) -> bool {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, quest_id = %self.quest_id, "refresh issued");

        let quest = match self.api.quest_detail(&self.quest_id).await {
            Ok(quest) => Some(quest),
            Err(err) => {
                warn!(error = %err, quest_id = %self.quest_id, "quest detail fetch failed");
                None
            }
        };

        let subscribers = match self.api.quest_subscribers(&self.quest_id).await {
            Ok(batch) => SubscriberView::register(&batch),
            Err(err) => {
                warn!(error = %err, quest_id = %self.quest_id, "subscriber fetch failed");
                SubscriberView::default()
            }
        };

        let (buckets, stats) = match self.api.quest_datasets(&self.quest_id).await {
            Ok(batch) => {
                let decoded = decode_batch(batch);
                (classify(decoded.records), decoded.stats)
            }
            Err(err) => {
                warn!(error = %err, quest_id = %self.quest_id, "dataset fetch failed");
                (DatasetBuckets::default(), BatchStats::default())
            }
        };

        let snapshot = QuestSnapshot {
            seq,
            fetched_at: Utc::now(),
            quest,
            subscribers,
            buckets,
            stats,
        };

        self.apply(snapshot)
    }

    /// Apply a completed refresh unless it has been superseded.
    fn apply(&self, snapshot: QuestSnapshot) -> bool {
        let seq = snapshot.seq;
        if seq != self.issued.load(Ordering::SeqCst) {
            debug!(seq, "discarding superseded refresh");
            return false;
        }

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Re-check under the lock so two finishing refreshes cannot race the
        // sequence comparison.
        if seq != self.issued.load(Ordering::SeqCst) {
            debug!(seq, "discarding superseded refresh");
            return false;
        }
        info!(
            seq,
            quest_id = %self.quest_id,
            records = snapshot.buckets.len(),
            dropped = snapshot.stats.dropped(),
            subscribers = snapshot.subscribers.count(),
            "refresh applied"
        );
        *guard = Some(Arc::new(snapshot));
        true
    }

    /// Time-series projection of the retained health bucket for one
    /// category, anchored at the snapshot's fetch time. Empty before the
    /// first applied refresh.
    pub fn chart(&self, category: &DisplayCategory) -> Vec<SeriesPoint> {
        match self.snapshot() {
            Some(snap) => project(&snap.buckets.health, category, snap.fetched_at, self.window),
            None => Vec::new(),
        }
    }

    /// Flat table rows over the retained prompt and onboarding buckets.
    pub fn table(&self) -> Vec<Row> {
        match self.snapshot() {
            Some(snap) => flatten(&snap.buckets.prompt_responses, &snap.buckets.onboarding_responses),
            None => Vec::new(),
        }
    }

    /// CSV export of all retained buckets. Header-only before the first
    /// applied refresh.
    pub fn export_csv(&self) -> AppResult<String> {
        match self.snapshot() {
            Some(snap) => export::encode(&snap.buckets),
            None => export::encode(&DatasetBuckets::default()),
        }
    }

    /// Write the export file into `dir` under the conventional name.
    pub fn export_to_dir(&self, dir: &Path) -> AppResult<PathBuf> {
        let buckets = self
            .snapshot()
            .map(|snap| snap.buckets.clone())
            .unwrap_or_default();
        export::write_export(&buckets, &self.quest_id, dir)
    }
}
