//! Rule file loading

use crate::{validate_rules, ConfigFormat, RulesConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use slugroute_core::{Error, Result};
use std::env;
use std::fs;
use std::path::Path;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}").expect("env var regex is valid")
});

/// Load and validate a rule file, format taken from its extension
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RulesConfig> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read rule file {}: {e}", path.display())))?;

    let format = ConfigFormat::from_path(path)?;
    let config = load_from_str(&content, format)?;

    tracing::debug!(
        path = %path.display(),
        rules = config.rules.len(),
        "Rule file loaded"
    );
    Ok(config)
}

/// Expand `${VAR}` and `${VAR:-default}`; an unset variable without a default is an error
fn expand_env_vars(content: &str) -> Result<String> {
    let mut missing: Option<String> = None;

    let expanded = ENV_VAR.replace_all(content, |cap: &regex::Captures<'_>| {
        let name = &cap[1];
        match (env::var(name), cap.get(3)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(Error::Config(format!(
            "rule file references ${{{name}}}, which is unset and has no default"
        ))),
        None => Ok(expanded.into_owned()),
    }
}

/// Parse and validate rules from a string
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<RulesConfig> {
    let expanded = expand_env_vars(content)?;

    let config: RulesConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("failed to parse YAML: {e}")))?,
        ConfigFormat::Toml => toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("failed to parse TOML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(&expanded)
            .map_err(|e| Error::Config(format!("failed to parse JSON: {e}")))?,
    };

    validate_rules(&config)?;
    Ok(config)
}
