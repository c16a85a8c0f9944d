//! The default governor plus route-scoped governors.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use taskgate_core::clock::{Clock, SystemClock};

use crate::governor::{GovernorConfig, GovernorStats, RateGovernor};

/// Name of the process-wide governor.
pub const DEFAULT_GOVERNOR: &str = "default";

/// Owns every governor in the process.
///
/// Route-scoped governors keep their own limit, window, and state; they only
/// share the clock and the sweeper.
#[derive(Debug)]
pub struct GovernorRegistry {
    default: Arc<RateGovernor>,
    scoped: DashMap<String, Arc<RateGovernor>>,
    clock: Arc<dyn Clock>,
}

impl GovernorRegistry {
    pub fn new(default: GovernorConfig) -> Self {
        Self::with_clock(default, Arc::new(SystemClock))
    }

    pub fn with_clock(default: GovernorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            default: Arc::new(RateGovernor::with_clock(
                DEFAULT_GOVERNOR,
                default,
                clock.clone(),
            )),
            scoped: DashMap::new(),
            clock,
        }
    }

    /// The process-wide governor.
    pub fn default_governor(&self) -> Arc<RateGovernor> {
        self.default.clone()
    }

    /// Returns the named governor, creating it with `config` on first use.
    pub fn scoped(&self, name: &str, config: GovernorConfig) -> Arc<RateGovernor> {
        self.scoped
            .entry(name.to_string())
            .or_insert_with(|| {
                info!(
                    governor = name,
                    limit = config.limit,
                    window_seconds = config.window_seconds,
                    "Registered route-scoped governor"
                );
                Arc::new(RateGovernor::with_clock(name, config, self.clock.clone()))
            })
            .value()
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<RateGovernor>> {
        if name == DEFAULT_GOVERNOR {
            return Some(self.default.clone());
        }
        self.scoped.get(name).map(|g| g.value().clone())
    }

    /// Every governor, default first, scoped ones by name.
    pub fn all(&self) -> Vec<Arc<RateGovernor>> {
        let mut scoped: Vec<Arc<RateGovernor>> =
            self.scoped.iter().map(|g| g.value().clone()).collect();
        scoped.sort_by(|a, b| a.name().cmp(b.name()));
        std::iter::once(self.default.clone()).chain(scoped).collect()
    }

    /// Sweeps every governor. Returns the total number of removed entries.
    pub fn sweep_all(&self) -> usize {
        self.all().iter().map(|g| g.sweep()).sum()
    }

    pub fn stats(&self) -> Vec<GovernorStats> {
        self.all().iter().map(|g| g.stats()).collect()
    }
}
