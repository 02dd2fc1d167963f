//! # Slugroute Configuration
//!
//! Rule files declare the router settings and the ordered rule list:
//! - Multiple formats (YAML, TOML, JSON)
//! - Environment variable expansion (`${VAR}`, `${VAR:-default}`)
//! - Multi-language rules (`url` given as a language to pattern map)
//! - Validation before anything is compiled
//!
//! ```yaml
//! settings:
//!   default_lang: en
//! rules:
//!   - controller: Product
//!     url:
//!       en: "products/[p:name]/[el:id]-[el:name]"
//!       it: "prodotti/[p:name]/[el:id]-[el:name]"
//!   - controller: Person
//!     url: "people/[el:name]-[el:surname]"
//!     options:
//!       table: people
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod loader;
pub mod types;
pub mod validator;

pub use loader::{load_from_file, load_from_str};
pub use types::{RuleConfig, RuleDefinition, RulesConfig, UrlSpec};
pub use validator::validate_rules;

use slugroute_core::{Error, Result};
use std::path::Path;

/// Load and validate a rule file
pub fn load<P: AsRef<Path>>(path: P) -> Result<RulesConfig> {
    load_from_file(path)
}

/// Load and validate rules from a string
pub fn load_str(content: &str, format: ConfigFormat) -> Result<RulesConfig> {
    load_from_str(content, format)
}

/// Rule file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Format named by a file extension, ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        [("yaml", Self::Yaml), ("yml", Self::Yaml), ("toml", Self::Toml), ("json", Self::Json)]
            .into_iter()
            .find_map(|(known, format)| ext.eq_ignore_ascii_case(known).then_some(format))
    }

    /// Format of a rule file, from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} is not a .yaml, .yml, .toml or .json rule file",
                    path.display()
                ))
            })
    }
}
