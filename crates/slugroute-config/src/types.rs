//! Rule file types

use serde::{Deserialize, Serialize};
use slugroute_core::{HierarchyProvider, Result, RouterSettings, RuleOptions};
use slugroute_router::{Router, RouterBuilder};
use std::collections::BTreeMap;

/// Tag set on rules registered from a language map
pub const LANG_TAG: &str = "lang";

/// Root of a rule file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Router settings
    #[serde(default)]
    pub settings: RouterSettings,

    /// Rules, in registration order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One declared rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Controller handling the rule
    pub controller: String,

    /// Pattern, or one pattern per language
    pub url: UrlSpec,

    /// Rule options
    #[serde(default)]
    pub options: RuleOptions,
}

/// The `url` of a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlSpec {
    /// Same pattern for every language
    Single(String),
    /// Language to pattern
    PerLang(BTreeMap<String, String>),
}

/// A rule ready for registration: one pattern, tags filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    /// Controller handling the rule
    pub controller: String,
    /// Raw pattern
    pub pattern: String,
    /// Options, including the language tag of a per-language pattern
    pub options: RuleOptions,
}

impl RuleConfig {
    /// Expand into one definition per pattern, languages in map order
    pub fn definitions(&self) -> Vec<RuleDefinition> {
        match &self.url {
            UrlSpec::Single(pattern) => vec![RuleDefinition {
                controller: self.controller.clone(),
                pattern: pattern.clone(),
                options: self.options.clone(),
            }],
            UrlSpec::PerLang(patterns) => patterns
                .iter()
                .map(|(lang, pattern)| RuleDefinition {
                    controller: self.controller.clone(),
                    pattern: pattern.clone(),
                    options: self.options.clone().tag(LANG_TAG, lang.clone()),
                })
                .collect(),
        }
    }
}

impl RulesConfig {
    /// Every rule definition, in registration order
    pub fn definitions(&self) -> Vec<RuleDefinition> {
        self.rules.iter().flat_map(RuleConfig::definitions).collect()
    }

    /// Router builder holding the settings and every definition
    pub fn router_builder<'h>(&self, hierarchy: Option<&'h dyn HierarchyProvider>) -> RouterBuilder<'h> {
        let mut builder = Router::builder().settings(self.settings.clone());
        if let Some(hierarchy) = hierarchy {
            builder = builder.hierarchy(hierarchy);
        }
        self.definitions()
            .into_iter()
            .fold(builder, |builder, def| builder.rule(def.controller, def.pattern, def.options))
    }

    /// Compile the rules into a router
    ///
    /// # Errors
    ///
    /// Returns the first compilation error, see [`RouterBuilder::build`].
    pub fn build_router(&self, hierarchy: Option<&dyn HierarchyProvider>) -> Result<Router> {
        self.router_builder(hierarchy).build()
    }
}
