//! Booking intervals
//!
//! A booking occupies `[start, end)`. Whether two intervals that merely touch
//! conflict is decided by the configured [`BoundaryPolicy`], which is applied
//! the same way by the in-memory store and by the SQL predicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Boundary policy for the overlap test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// `s1 < e2 AND s2 < e1`: back-to-back bookings are allowed
    #[default]
    HalfOpen,
    /// `s1 <= e2 AND s2 <= e1`: touching intervals conflict
    Inclusive,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::HalfOpen => "half_open",
            BoundaryPolicy::Inclusive => "inclusive",
        }
    }

    /// SQL predicate testing `bookings.start_time/end_time` against `$start_param/$end_param`
    pub fn sql_overlap(&self, alias: &str, start_param: usize, end_param: usize) -> String {
        let op = match self {
            BoundaryPolicy::HalfOpen => "<",
            BoundaryPolicy::Inclusive => "<=",
        };
        format!(
            "{alias}.start_time {op} ${end_param} AND ${start_param} {op} {alias}.end_time",
            alias = alias,
            op = op,
            start_param = start_param,
            end_param = end_param,
        )
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "half_open" | "half-open" => Ok(BoundaryPolicy::HalfOpen),
            "inclusive" => Ok(BoundaryPolicy::Inclusive),
            other => Err(format!("unknown boundary policy '{}'", other)),
        }
    }
}

/// A `[start, end)` time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &Interval, policy: BoundaryPolicy) -> bool {
        match policy {
            BoundaryPolicy::HalfOpen => self.start < other.end && other.start < self.end,
            BoundaryPolicy::Inclusive => self.start <= other.end && other.start <= self.end,
        }
    }
}
