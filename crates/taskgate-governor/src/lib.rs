//! # taskgate-governor
//!
//! Request-rate governance for TaskGate.
//!
//! - `governor`: the per-key fixed-window store (`admit`, `sweep`, `stats`)
//! - `key`: client key derivation from proxy headers
//! - `registry`: the process-wide default governor plus route-scoped ones
//! - `sweeper`: background task that sweeps every registered governor
//!
//! State is process-local and lives on a sharded map, so concurrent admits
//! for one key are serialized while other keys proceed in parallel.

pub mod governor;
pub mod key;
pub mod registry;
pub mod sweeper;

pub use governor::{Decision, GovernorConfig, GovernorStats, KeyUsage, RateGovernor};
pub use key::{UNKNOWN_KEY, client_key, is_loopback};
pub use registry::GovernorRegistry;
pub use sweeper::spawn_sweeper;
