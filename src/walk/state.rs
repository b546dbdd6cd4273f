use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::SafetyTier;
use crate::models::{TierSeconds, WalkReport};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WalkStatus {
    Idle,
    Active,
}

impl Default for WalkStatus {
    fn default() -> Self {
        WalkStatus::Idle
    }
}

/// Accumulator for the walk in progress. Each tick attributes exactly one
/// second to exactly one tier, and `elapsed_seconds` advances with the
/// buckets, so `tier_seconds.total() == elapsed_seconds` always holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkState {
    pub status: WalkStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: u64,
    pub tier_seconds: TierSeconds,
}

impl WalkState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.status == WalkStatus::Active
    }

    pub fn begin_walk(&mut self, started_at: DateTime<Utc>) {
        *self = Self {
            status: WalkStatus::Active,
            started_at: Some(started_at),
            elapsed_seconds: 0,
            tier_seconds: TierSeconds::default(),
        };
    }

    /// One second of walking under the tier sampled at this instant.
    pub fn tick(&mut self, tier: SafetyTier) {
        self.tier_seconds.record(tier);
        self.elapsed_seconds = self.tier_seconds.total();
    }

    /// Packages the accumulated walk into its immutable report. The id is
    /// the RFC 3339 rendering of the start time.
    pub fn to_report(&self, ended_at: DateTime<Utc>) -> WalkReport {
        let started_at = self.started_at.unwrap_or(ended_at);
        WalkReport {
            id: started_at.to_rfc3339(),
            started_at,
            ended_at,
            duration_seconds: self.elapsed_seconds,
            tier_seconds: self.tier_seconds,
            memo: String::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn begin_walk_zeroes_everything() {
        let mut state = WalkState::new();
        state.tick(SafetyTier::Danger);

        state.begin_walk(start_time());

        assert!(state.is_active());
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.tier_seconds, TierSeconds::default());
        assert_eq!(state.started_at, Some(start_time()));
    }

    #[test]
    fn every_tick_lands_in_exactly_one_bucket() {
        let mut state = WalkState::new();
        state.begin_walk(start_time());

        let ticks = [
            SafetyTier::Safe,
            SafetyTier::Safe,
            SafetyTier::Caution,
            SafetyTier::Danger,
            SafetyTier::Caution,
            SafetyTier::Safe,
        ];
        for tier in ticks {
            state.tick(tier);
            assert_eq!(state.tier_seconds.total(), state.elapsed_seconds);
        }

        assert_eq!(state.elapsed_seconds, 6);
        assert_eq!(state.tier_seconds.safe, 3);
        assert_eq!(state.tier_seconds.caution, 2);
        assert_eq!(state.tier_seconds.danger, 1);
    }

    #[test]
    fn constant_caution_walk_matches_duration() {
        let mut state = WalkState::new();
        state.begin_walk(start_time());
        for _ in 0..10 {
            state.tick(crate::classifier::classify(30.0));
        }

        let report = state.to_report(start_time() + chrono::Duration::seconds(10));
        assert_eq!(report.duration_seconds, 10);
        assert_eq!(report.tier_seconds.safe, 0);
        assert_eq!(report.tier_seconds.caution, 10);
        assert_eq!(report.tier_seconds.danger, 0);
    }

    #[test]
    fn zero_tick_walk_reports_zero_duration() {
        let mut state = WalkState::new();
        state.begin_walk(start_time());

        let report = state.to_report(start_time());

        assert_eq!(report.duration_seconds, 0);
        assert_eq!(report.tier_seconds.total(), 0);
        assert_eq!(report.id, start_time().to_rfc3339());
        assert_eq!(report.memo, "");
    }

    #[test]
    fn reset_returns_to_idle_defaults() {
        let mut state = WalkState::new();
        state.begin_walk(start_time());
        state.tick(SafetyTier::Safe);

        state.reset();

        assert!(!state.is_active());
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.started_at, None);
    }
}
