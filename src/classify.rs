//! Batch decoding and classification into per-type buckets.
//!
//! `decode_batch` runs the per-record decoder over a raw batch and keeps the
//! rejects on the side for observability; `classify` then partitions the
//! surviving records into three buckets by tag. The partition is stable:
//! relative order within each bucket equals relative order in the input.
//! No bucket is ever absent, so downstream consumers never see `None`.

use serde::Serialize;
use tracing::warn;

use crate::decode::decode;
use crate::error::QuestError;
use crate::model::{DatasetKind, DecodedRecord, RawDatasetRecord};

/// The three disjoint per-type collections a batch classifies into.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetBuckets {
    pub health: Vec<DecodedRecord>,
    pub prompt_responses: Vec<DecodedRecord>,
    pub onboarding_responses: Vec<DecodedRecord>,
}

impl DatasetBuckets {
    /// Total records across all buckets.
    pub fn len(&self) -> usize {
        self.health.len() + self.prompt_responses.len() + self.onboarding_responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records in the fixed export order: health, prompt responses,
    /// onboarding responses.
    pub fn iter_all(&self) -> impl Iterator<Item = &DecodedRecord> {
        self.health
            .iter()
            .chain(self.prompt_responses.iter())
            .chain(self.onboarding_responses.iter())
    }
}

/// Counters describing what happened to a raw batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Records that decoded cleanly and landed in a bucket.
    pub decoded: usize,
    /// Records dropped because the payload did not match its declared type.
    pub decode_failures: usize,
    /// Records dropped because the tag was outside the closed set.
    pub unknown_types: usize,
}

impl BatchStats {
    /// Records dropped for any reason.
    pub fn dropped(&self) -> usize {
        self.decode_failures + self.unknown_types
    }
}

/// Result of decoding one raw batch.
#[derive(Debug, Default)]
pub struct DecodedBatch {
    pub records: Vec<DecodedRecord>,
    pub stats: BatchStats,
}

/// Decode a raw batch record by record. Rejects are logged and counted, never
/// fatal: one bad payload costs one record, not the batch.
pub fn decode_batch(batch: Vec<RawDatasetRecord>) -> DecodedBatch {
    let mut out = DecodedBatch {
        records: Vec::with_capacity(batch.len()),
        stats: BatchStats::default(),
    };

    for raw in batch {
        match decode(raw) {
            Ok(record) => {
                out.stats.decoded += 1;
                out.records.push(record);
            }
            Err(err @ QuestError::UnknownDatasetType(_)) => {
                out.stats.unknown_types += 1;
                warn!(error = %err, "dropping record with unknown dataset type");
            }
            Err(err) => {
                out.stats.decode_failures += 1;
                warn!(error = %err, "dropping undecodable record");
            }
        }
    }

    out
}

/// Stable partition of decoded records into per-type buckets.
pub fn classify(records: Vec<DecodedRecord>) -> DatasetBuckets {
    let mut buckets = DatasetBuckets::default();
    for record in records {
        match record.kind {
            DatasetKind::Health => buckets.health.push(record),
            DatasetKind::PromptResponses => buckets.prompt_responses.push(record),
            DatasetKind::OnboardingResponses => buckets.onboarding_responses.push(record),
        }
    }
    buckets
}
