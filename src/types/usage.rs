//! Usage and credit types.

use serde::{Deserialize, Serialize};

/// Credit balance of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditInfo {
    /// Credits consumed.
    pub used: u64,
    /// Credits granted.
    pub total: u64,
    /// Credits left.
    pub remaining: u64,
}

impl CreditInfo {
    /// Fraction of credits consumed, in `[0, 1]`.
    pub fn used_fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.used as f64 / self.total as f64).min(1.0)
        }
    }

    /// Returns true when no credits are left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Usage counters for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMonth {
    /// First day of the month (`YYYY-MM-DD`).
    pub month: String,
    /// Parse calls.
    pub parse_calls: u64,
    /// Drift checks.
    pub drift_checks: u64,
    /// Sessions created.
    pub session_creates: u64,
    /// Accumulated server latency.
    #[serde(default)]
    pub total_latency_ms: u64,
}

/// Response of `GET /v1/usage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInfo {
    /// Credit balance.
    pub credits: CreditInfo,
    /// Plan tier.
    pub tier: String,
    /// Requests allowed per rate-limit window.
    pub rate_limit: u32,
    /// Monthly breakdown.
    #[serde(default)]
    pub usage: Vec<UsageMonth>,
}

impl UsageInfo {
    /// Total parse calls across all reported months.
    pub fn total_parse_calls(&self) -> u64 {
        self.usage.iter().map(|month| month.parse_calls).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::fixtures;

    #[test]
    fn test_usage_deserialize() {
        let usage: UsageInfo = serde_json::from_value(fixtures::sample_usage()).unwrap();

        assert_eq!(usage.credits.used, 42);
        assert_eq!(usage.credits.total, 100);
        assert_eq!(usage.credits.remaining, 58);
        assert_eq!(usage.tier, "free");
        assert_eq!(usage.rate_limit, 100);
        assert_eq!(usage.usage[0].session_creates, 5);
        assert_eq!(usage.total_parse_calls(), 42);
    }

    #[test]
    fn test_usage_without_months() {
        let usage: UsageInfo = serde_json::from_value(serde_json::json!({
            "credits": {"used": 0, "total": 0, "remaining": 0},
            "tier": "free",
            "rate_limit": 10
        }))
        .unwrap();

        assert!(usage.usage.is_empty());
        assert!(usage.credits.is_exhausted());
        assert_eq!(usage.credits.used_fraction(), 1.0);
    }

    #[test]
    fn test_used_fraction() {
        let credits = CreditInfo {
            used: 25,
            total: 100,
            remaining: 75,
        };
        assert_eq!(credits.used_fraction(), 0.25);
        assert!(!credits.is_exhausted());
    }
}
