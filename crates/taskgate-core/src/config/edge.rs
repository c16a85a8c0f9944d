//! Perimeter gate configuration.

use serde::{Deserialize, Serialize};

/// Edge gate settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Mount the edge gate in front of the API router.
    #[serde(default)]
    pub enabled: bool,
}
