//! Read projections over classified dataset buckets.
//!
//! Both projections are pure functions of the buckets they read: they never
//! mutate them, retain no references past the refresh cycle, and recomputing
//! a projection (e.g. after a category switch) needs no new fetch.

pub mod series;
pub mod table;

pub use series::{project, SeriesPoint, Window, WindowUnit, DEFAULT_WINDOW};
pub use table::{flatten, Row};
