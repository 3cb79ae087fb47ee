//! Closed span tree nodes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A completed, named span with its measured duration and nested children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Name of the measured span
    pub name: String,
    /// Wall-clock time from enter to exit
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
    /// Child spans in the order they were opened
    pub children: Vec<ProfileEntry>,
}

impl ProfileEntry {
    pub(crate) fn new(name: String, elapsed: Duration, children: Vec<ProfileEntry>) -> Self {
        Self {
            name,
            elapsed,
            children,
        }
    }

    /// Elapsed milliseconds truncated to two decimal places.
    pub fn elapsed_ms(&self) -> f64 {
        (self.elapsed.as_nanos() as f64 / 1e6 * 100.0).floor() / 100.0
    }

    /// Time spent in this span excluding children.
    pub fn self_time(&self) -> Duration {
        let children: Duration = self.children.iter().map(|c| c.elapsed).sum();
        self.elapsed.saturating_sub(children)
    }

    /// Number of entries in this subtree, including this one.
    pub fn total_count(&self) -> usize {
        1 + self.children.iter().map(ProfileEntry::total_count).sum::<usize>()
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_nanos().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u128::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}
