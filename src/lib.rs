//! # Quest Data Core Library
//!
//! Normalization and aggregation engine for participant-submitted quest
//! datasets. A quest owner collects heterogeneous records (wearable health
//! metrics, free-form prompt responses, onboarding survey answers) under one
//! quest identifier; this crate decodes them, partitions them into typed
//! buckets, and serves two independent read projections over the same
//! underlying records: a time-bucketed series for charting and a flattened
//! table for export.
//!
//! ## Crate Structure
//!
//! - **`model`**: Wire and domain types: dataset records, health samples,
//!   quest metadata, subscribers, and the fixed display-category enumeration.
//! - **`decode`**: Per-record payload decoding; a record's `type` tag
//!   determines its payload shape, and decoding fails closed.
//! - **`classify`**: Batch decoding plus the stable partition into the three
//!   per-type buckets, with drop counters for observability.
//! - **`subscribers`**: Distinct-identity subscriber view with membership
//!   checks.
//! - **`projection`**: The two pure read projections, `series` (category +
//!   window filter, stable ascending sort) and `table` (flattened rows with
//!   deterministic value rendering).
//! - **`export`**: CSV encoder with the fixed five-column header contract.
//! - **`prompt`**: Prompt data model and the uuid-keyed upsert store.
//! - **`api`**: The `QuestApi` seam and its HTTP implementation.
//! - **`session`**: Refresh cycle with sequence-numbered supersession and
//!   per-section degradation; owns the retained snapshot the projections
//!   read.
//! - **`config`** / **`telemetry`** / **`error`**: settings, logging, and the
//!   application error taxonomy.
//!
//! ## Data Flow
//!
//! raw batch → [`decode`] (per record) → [`classify`] (three buckets) →
//! {[`projection::series`], [`projection::table`], [`export`]}; the
//! projections read the buckets independently and never mutate them.

pub mod api;
pub mod classify;
pub mod config;
pub mod decode;
pub mod error;
pub mod export;
pub mod model;
pub mod projection;
pub mod prompt;
pub mod session;
pub mod subscribers;
pub mod telemetry;

pub use classify::{classify, decode_batch, BatchStats, DatasetBuckets};
pub use decode::decode;
pub use error::{AppResult, QuestError};
pub use model::{
    category_by_value, DatasetKind, DecodedRecord, DecodedValue, DisplayCategory, HealthSample,
    Quest, RawDatasetRecord, Subscriber, DISPLAY_CATEGORIES,
};
pub use session::{QuestSession, QuestSnapshot};
pub use subscribers::SubscriberView;
