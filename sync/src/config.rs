/// Sync engine configuration.
use std::time::Duration;

use chain::config::REQUEST_INTERVAL_MS;
use containers::Epoch;
use serde::{Deserialize, Serialize};

/// Pause between two explorer requests of one run.
pub const REQUEST_INTERVAL: Duration = Duration::from_millis(REQUEST_INTERVAL_MS);

/// Where a run resumes relative to the highest stored epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumePolicy {
    /// Re-fetch the last stored epoch. Slots proposed after the previous
    /// run observed it are picked up, at the cost of storing the earlier
    /// ones twice.
    #[default]
    Inclusive,
    /// Start at the epoch after the last stored one.
    AfterLast,
}

impl ResumePolicy {
    pub fn start_from(self, latest: Epoch) -> Epoch {
        match self {
            ResumePolicy::Inclusive => latest,
            ResumePolicy::AfterLast => latest.next(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub request_interval: Duration,
    pub resume_policy: ResumePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_interval: REQUEST_INTERVAL,
            resume_policy: ResumePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval_is_one_second() {
        assert_eq!(SyncConfig::default().request_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_resume_policies() {
        assert_eq!(ResumePolicy::Inclusive.start_from(Epoch(9)), Epoch(9));
        assert_eq!(ResumePolicy::AfterLast.start_from(Epoch(9)), Epoch(10));
    }
}
