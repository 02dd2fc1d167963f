//! Rule file validation

use crate::types::{RuleConfig, RulesConfig, UrlSpec};
use slugroute_core::{Error, Result};
use slugroute_router::rule::parse_pattern;
use std::collections::HashSet;

/// Validate a rule file
///
/// Checks what can be checked without the element tree; compilation may
/// still fail on missing tables or parents.
pub fn validate_rules(config: &RulesConfig) -> Result<()> {
    validate_settings(config)?;

    let mut seen = HashSet::new();
    for (index, rule) in config.rules.iter().enumerate() {
        validate_rule(index, rule)?;

        for def in rule.definitions() {
            let tags = format!("{:?}", def.options.tags);
            if !seen.insert((def.controller, def.pattern.clone(), tags)) {
                tracing::warn!(
                    rule = index,
                    pattern = %def.pattern,
                    "Duplicate rule, only the first registration will ever match"
                );
            }
        }
    }

    Ok(())
}

fn validate_settings(config: &RulesConfig) -> Result<()> {
    let settings = &config.settings;
    if !settings.char_length_indexed.is_empty() && settings.length_column.is_empty() {
        return Err(Error::Config(
            "length_column cannot be empty when char_length_indexed is set".to_string(),
        ));
    }
    if settings.default_lang.as_deref() == Some("") {
        return Err(Error::Config("default_lang cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_rule(index: usize, rule: &RuleConfig) -> Result<()> {
    if rule.controller.is_empty() {
        return Err(Error::Config(format!("rule {index}: controller cannot be empty")));
    }

    let options = &rule.options;
    if options.id_field.is_empty() {
        return Err(Error::Config(format!("rule {index}: id_field cannot be empty")));
    }
    if options.null_token.contains('/') {
        return Err(Error::Config(format!(
            "rule {index}: null_token cannot contain '/'"
        )));
    }
    for link in &options.parent_chain {
        if link.table.is_empty() || link.link_field.is_empty() || link.id_field.is_empty() {
            return Err(Error::Config(format!(
                "rule {index}: parent_chain entries need table, link_field and id_field"
            )));
        }
    }

    let patterns: Vec<&str> = match &rule.url {
        UrlSpec::Single(pattern) => vec![pattern.as_str()],
        UrlSpec::PerLang(patterns) if patterns.is_empty() => {
            return Err(Error::Config(format!(
                "rule {index}: url map for '{}' is empty",
                rule.controller
            )));
        }
        UrlSpec::PerLang(patterns) => patterns.values().map(String::as_str).collect(),
    };

    for raw in patterns {
        let pattern = parse_pattern(raw)?;
        let has_element = pattern.iter().any(|s| s.has_element());
        if !has_element && pattern.iter().any(|s| s.has_parent()) {
            return Err(Error::Config(format!(
                "rule {index}: '{raw}' specifies a category but not an element"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slugroute_core::{ParentLink, RouterSettings, RuleOptions};

    fn config(controller: &str, url: &str, options: RuleOptions) -> RulesConfig {
        RulesConfig {
            settings: RouterSettings::default(),
            rules: vec![RuleConfig {
                controller: controller.to_string(),
                url: UrlSpec::Single(url.to_string()),
                options,
            }],
        }
    }

    #[test]
    fn test_valid_rules() {
        let config = config("Product", "shop/[p:name]/[el:id]", RuleOptions::default());
        assert!(validate_rules(&config).is_ok());
    }

    #[test]
    fn test_empty_controller() {
        let config = config("", "shop", RuleOptions::default());
        assert!(validate_rules(&config).unwrap_err().is_config());
    }

    #[test]
    fn test_empty_id_field() {
        let config = config("Product", "[el:id]", RuleOptions::default().id_field(""));
        assert!(validate_rules(&config).is_err());
    }

    #[test]
    fn test_category_without_element() {
        let config = config("Category", "cat/[p:name]", RuleOptions::default());
        let err = validate_rules(&config).unwrap_err();
        assert!(err.to_string().contains("category but not an element"));
    }

    #[test]
    fn test_malformed_pattern() {
        let config = config("Product", "shop/[el:bad name]", RuleOptions::default());
        assert!(matches!(
            validate_rules(&config),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_bad_chain_entry() {
        let options = RuleOptions::default().parent(ParentLink::new("", "category"));
        let config = config("Product", "[p:name]/[el:id]", options);
        assert!(validate_rules(&config).is_err());
    }

    #[test]
    fn test_empty_lang_map() {
        let config = RulesConfig {
            settings: RouterSettings::default(),
            rules: vec![RuleConfig {
                controller: "Product".to_string(),
                url: UrlSpec::PerLang(Default::default()),
                options: RuleOptions::default(),
            }],
        };
        assert!(validate_rules(&config).is_err());
    }

    #[test]
    fn test_null_token_with_slash() {
        let config = config("News", "[el:id]", RuleOptions::default().null_token("a/b"));
        assert!(validate_rules(&config).is_err());
    }
}
