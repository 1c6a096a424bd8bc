//! Millisecond-epoch clock helper.
//!
//! All stored timestamps are integer milliseconds since the Unix epoch.
//! Functions that depend on the current time accept an explicit `now_ms`
//! argument so tests can pin the clock; this helper exists for the callers
//! at the edge that need the real one.

use chrono::Utc;

/// The current time as milliseconds since the Unix epoch.
pub fn now_millis() -> i64 { Utc::now().timestamp_millis() }
