//! Wall-clock Timestamps
//!
//! Events carry the real time they were created at, as milliseconds since the
//! Unix epoch.
//!
//! # Example
//!
//! ```
//! use faction_events::Timestamp;
//!
//! let ts = Timestamp::from_millis(1_700_000_000_000);
//! assert_eq!(ts.to_string(), "2023-11-14 22:13:20");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    /// Current wall-clock time. Clocks set before 1970 read as the epoch.
    pub fn now() -> Self {
        Timestamp(u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// UTC date and time, if representable
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Timestamp(u64::try_from(datetime.timestamp_millis()).unwrap_or(0))
    }
}

impl fmt::Display for Timestamp {
    /// Formats as `yyyy-MM-dd HH:mm:ss` (UTC)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}ms", self.0),
        }
    }
}
