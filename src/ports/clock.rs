//! Clock port for obtaining the current time.

use chrono::{DateTime, Utc};

/// Provides the current time for player presence tracking.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
