use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::SafetyTier;

/// Seconds of walk time spent in each safety tier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TierSeconds {
    pub safe: u64,
    pub caution: u64,
    pub danger: u64,
}

impl TierSeconds {
    pub fn record(&mut self, tier: SafetyTier) {
        match tier {
            SafetyTier::Safe => self.safe += 1,
            SafetyTier::Caution => self.caution += 1,
            SafetyTier::Danger => self.danger += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.safe + self.caution + self.danger
    }
}

/// Persisted summary of one completed walk. Immutable except for `memo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalkReport {
    /// RFC 3339 rendering of `started_at`; unique per walk.
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub tier_seconds: TierSeconds,
    #[serde(default)]
    pub memo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_seconds_total_sums_all_buckets() {
        let mut tiers = TierSeconds::default();
        tiers.record(SafetyTier::Safe);
        tiers.record(SafetyTier::Caution);
        tiers.record(SafetyTier::Caution);
        tiers.record(SafetyTier::Danger);

        assert_eq!(tiers.safe, 1);
        assert_eq!(tiers.caution, 2);
        assert_eq!(tiers.danger, 1);
        assert_eq!(tiers.total(), 4);
    }

    #[test]
    fn report_memo_defaults_to_empty_on_deserialize() {
        let json = r#"{
            "id": "2025-08-01T09:00:00+00:00",
            "startedAt": "2025-08-01T09:00:00Z",
            "endedAt": "2025-08-01T09:10:00Z",
            "durationSeconds": 600,
            "tierSeconds": { "safe": 600, "caution": 0, "danger": 0 }
        }"#;

        let report: WalkReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.memo, "");
        assert_eq!(report.duration_seconds, 600);
    }
}
