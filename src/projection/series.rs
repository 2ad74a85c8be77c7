//! Time-series projection for charting a health metric.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DecodedRecord, DecodedValue, DisplayCategory};

/// Unit of a projection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowUnit {
    Day,
    Hour,
}

/// A lookback window anchored at a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub unit: WindowUnit,
    pub count: u32,
}

impl Window {
    pub fn duration(&self) -> Duration {
        match self.unit {
            WindowUnit::Day => Duration::days(i64::from(self.count)),
            WindowUnit::Hour => Duration::hours(i64::from(self.count)),
        }
    }
}

/// The default charting window: the week leading up to the reference instant.
pub const DEFAULT_WINDOW: Window = Window {
    unit: WindowUnit::Day,
    count: 7,
};

/// One plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Project the health bucket onto an ordered `(timestamp, value)` series for
/// one metric category.
///
/// Samples are kept when their category matches and their timestamp falls in
/// the inclusive interval `[reference - window, reference]`. The sort is
/// stable, so samples at equal timestamps keep submission order. An empty
/// result is a valid output; the chart renders a blank plot.
pub fn project(
    health_bucket: &[DecodedRecord],
    category: &DisplayCategory,
    reference: DateTime<Utc>,
    window: Window,
) -> Vec<SeriesPoint> {
    let start = reference - window.duration();

    let mut points: Vec<SeriesPoint> = health_bucket
        .iter()
        .filter_map(|record| match &record.value {
            DecodedValue::Samples(samples) => Some(samples),
            // Non-sample payloads cannot reach the health bucket, but the
            // projector stays total rather than trusting that.
            _ => None,
        })
        .flatten()
        .filter(|sample| {
            sample.metric_category == category.value
                && sample.timestamp >= start
                && sample.timestamp <= reference
        })
        .map(|sample| SeriesPoint {
            timestamp: sample.timestamp,
            value: sample.numeric_value,
        })
        .collect();

    points.sort_by_key(|point| point.timestamp);
    points
}
