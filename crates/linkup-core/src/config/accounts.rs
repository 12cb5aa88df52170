//! Account directory configuration.

use serde::{Deserialize, Serialize};

/// Where the in-memory account directory gets its initial accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Path to a JSON array of account documents loaded at startup.
    #[serde(default)]
    pub seed_file: Option<String>,
}
