//! Fixed-window per-key request counters.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use taskgate_core::clock::{Clock, SystemClock};
use taskgate_core::config::rate_limit::{LoginRateLimitConfig, RateLimitConfig};

/// Maximum number of keys reported by [`RateGovernor::stats`].
const TOP_KEYS: usize = 10;

/// Longest window honoured; larger configured values are clamped.
const MAX_WINDOW_SECONDS: u64 = 366 * 24 * 3600;

/// Limit and window for one governor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorConfig {
    /// Requests admitted per key per window.
    pub limit: u32,
    /// Window length in seconds.
    pub window_seconds: u64,
}

impl GovernorConfig {
    pub fn new(limit: u32, window_seconds: u64) -> Self {
        Self {
            limit,
            window_seconds,
        }
    }

    fn window(&self) -> Duration {
        Duration::seconds(i64::try_from(self.window_seconds.min(MAX_WINDOW_SECONDS)).unwrap_or(0))
    }
}

impl From<&RateLimitConfig> for GovernorConfig {
    fn from(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window_seconds)
    }
}

impl From<&LoginRateLimitConfig> for GovernorConfig {
    fn from(config: &LoginRateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window_seconds)
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_time: DateTime<Utc>,
}

/// Result of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// When the current window ends.
    pub reset_time: DateTime<Utc>,
    /// The configured limit.
    pub limit: u32,
}

impl Decision {
    /// Whole seconds until the window resets, rounded up, at least 1.
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_time - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }
}

/// One key's standing in [`GovernorStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyUsage {
    pub key: String,
    pub count: u32,
    pub reset_time: DateTime<Utc>,
}

/// Snapshot of a governor's state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorStats {
    pub name: String,
    pub total_keys: usize,
    pub config: GovernorConfig,
    /// Busiest keys, highest count first.
    pub top_keys: Vec<KeyUsage>,
}

/// Per-key fixed-window counter store.
///
/// A key's window starts on its first request. Once the clock reaches the
/// window's reset time, the count restarts from zero and a new window of
/// the configured length begins.
#[derive(Debug)]
pub struct RateGovernor {
    name: String,
    config: GovernorConfig,
    entries: DashMap<String, WindowEntry>,
    clock: Arc<dyn Clock>,
}

impl RateGovernor {
    /// Creates a governor on the system clock.
    pub fn new(name: impl Into<String>, config: GovernorConfig) -> Self {
        Self::with_clock(name, config, Arc::new(SystemClock))
    }

    /// Creates a governor driven by the given clock.
    pub fn with_clock(
        name: impl Into<String>,
        config: GovernorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            entries: DashMap::new(),
            clock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> GovernorConfig {
        self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Counts one request against `key`.
    ///
    /// The read-modify-write runs under the key's shard lock, so concurrent
    /// callers for one key never both take the last slot.
    pub fn admit(&self, key: &str) -> Decision {
        let now = self.clock.now();
        let window = self.config.window();

        let mut entry = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| WindowEntry {
                count: 0,
                reset_time: now + window,
            });

        if now >= entry.reset_time {
            entry.count = 0;
            entry.reset_time = now + window;
        }

        let allowed = entry.count < self.config.limit;
        if allowed {
            entry.count += 1;
        } else {
            debug!(governor = %self.name, key, count = entry.count, "Rate limit reached");
        }

        Decision {
            allowed,
            remaining: self.config.limit.saturating_sub(entry.count),
            reset_time: entry.reset_time,
            limit: self.config.limit,
        }
    }

    /// Removes every entry whose window has ended. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.reset_time > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(governor = %self.name, removed, "Swept expired rate windows");
        }
        removed
    }

    /// Current key count and the busiest keys.
    pub fn stats(&self) -> GovernorStats {
        let mut top_keys: Vec<KeyUsage> = self
            .entries
            .iter()
            .map(|e| KeyUsage {
                key: e.key().clone(),
                count: e.value().count,
                reset_time: e.value().reset_time,
            })
            .collect();
        top_keys.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        let total_keys = top_keys.len();
        top_keys.truncate(TOP_KEYS);

        GovernorStats {
            name: self.name.clone(),
            total_keys,
            config: self.config,
            top_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskgate_core::clock::ManualClock;

    fn governor(limit: u32, window_seconds: u64) -> (RateGovernor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let governor = RateGovernor::with_clock(
            "test",
            GovernorConfig::new(limit, window_seconds),
            clock.clone(),
        );
        (governor, clock)
    }

    #[test]
    fn test_fixed_window_sequence() {
        let (governor, clock) = governor(3, 60);
        let admitted: Vec<bool> = (0..4).map(|_| governor.admit("k").allowed).collect();
        assert_eq!(admitted, vec![true, true, true, false]);

        clock.advance(Duration::seconds(60));
        let decision = governor.admit("k");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
        assert_eq!(governor.stats().top_keys[0].count, 1);
    }

    #[test]
    fn test_remaining_and_reset_time() {
        let (governor, clock) = governor(2, 30);
        let first = governor.admit("a");
        assert_eq!(first.remaining, 1);
        assert_eq!(first.limit, 2);
        assert_eq!(first.reset_time, clock.now() + Duration::seconds(30));

        governor.admit("a");
        let denied = governor.admit("a");
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_time, first.reset_time);
        assert_eq!(denied.retry_after_seconds(clock.now()), 30);
    }

    #[test]
    fn test_keys_are_independent() {
        let (governor, _) = governor(1, 60);
        assert!(governor.admit("a").allowed);
        assert!(governor.admit("b").allowed);
        assert!(!governor.admit("a").allowed);
    }

    #[test]
    fn test_sweep_removes_only_ended_windows() {
        let (governor, clock) = governor(5, 60);
        governor.admit("old");
        clock.advance(Duration::seconds(30));
        governor.admit("new");
        clock.advance(Duration::seconds(30));

        assert_eq!(governor.sweep(), 1);
        let stats = governor.stats();
        assert_eq!(stats.total_keys, 1);
        assert_eq!(stats.top_keys[0].key, "new");
    }

    #[test]
    fn test_stats_top_keys_ordered_and_capped() {
        let (governor, _) = governor(100, 60);
        for i in 0..15u32 {
            for _ in 0..=i {
                governor.admit(&format!("key-{i}"));
            }
        }
        let stats = governor.stats();
        assert_eq!(stats.total_keys, 15);
        assert_eq!(stats.top_keys.len(), 10);
        assert_eq!(stats.top_keys[0].key, "key-14");
        assert_eq!(stats.top_keys[0].count, 15);
        assert!(stats.top_keys.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admits_never_exceed_limit() {
        const N: u32 = 64;
        let governor = Arc::new(RateGovernor::new("concurrent", GovernorConfig::new(N, 60)));

        let handles: Vec<_> = (0..N * 2)
            .map(|_| {
                let governor = governor.clone();
                tokio::spawn(async move { governor.admit("shared").allowed })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, N);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_n_concurrent_admits_with_limit_n_all_pass() {
        const N: u32 = 32;
        let governor = Arc::new(RateGovernor::new("exact", GovernorConfig::new(N, 60)));
        let handles: Vec<_> = (0..N)
            .map(|_| {
                let governor = governor.clone();
                tokio::spawn(async move { governor.admit("shared").allowed })
            })
            .collect();
        let mut admitted = 0;
        for handle in handles {
            admitted += u32::from(handle.await.unwrap());
        }
        assert_eq!(admitted, N);
        assert!(!governor.admit("shared").allowed);
    }
}
