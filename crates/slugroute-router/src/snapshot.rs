//! Compiled rule snapshot
//!
//! A snapshot holds the ordered rule list with every option already filled
//! in by the compiler, so it can be reloaded without the element tree.

use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use slugroute_core::{Result, RouterSettings};

/// Serializable form of a compiled router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Router settings
    #[serde(default)]
    pub settings: RouterSettings,

    /// Rules in registration order
    pub rules: Vec<Rule>,
}

impl Snapshot {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
