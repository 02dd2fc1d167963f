//! Simplified matchers for coarse rule selection
//!
//! A simplified matcher only tells whether a path *could* belong to a rule.
//! It never extracts values: identifier placeholders become `[0-9]+`, other
//! placeholders the acceptable-character class, and the legacy `[*]`
//! wildcard any run without `/` or `?`.

use crate::rule::{Rule, Segment};
use regex::Regex;
use slugroute_core::{Error, Result, ACCEPTABLE_CHARACTERS};

/// Coarse matcher of one rule
#[derive(Debug, Clone)]
pub struct SimplifiedMatcher {
    /// Index of the rule in registration order
    pub rule_index: usize,

    /// Controller of the rule
    pub controller: String,

    regex: Regex,
}

impl SimplifiedMatcher {
    /// Derive the matcher of `rule`
    pub fn from_rule(rule_index: usize, rule: &Rule) -> Result<Self> {
        let source = simplified_source(rule);
        let regex = Regex::new(&format!("(?i)^{source}$")).map_err(|e| {
            Error::Internal(format!(
                "simplified matcher for '{}' does not compile: {e}",
                rule.pattern_string()
            ))
        })?;

        Ok(Self {
            rule_index,
            controller: rule.controller.clone(),
            regex,
        })
    }

    /// Does `path` fit the rule's shape?
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Regex text of the matcher
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Regex text (unanchored, without flags) derived from a rule's pattern
pub fn simplified_source(rule: &Rule) -> String {
    let class = format!("[{ACCEPTABLE_CHARACTERS}]*");

    rule.pattern
        .iter()
        .map(|segment| {
            segment
                .parts()
                .iter()
                .map(|part| match part {
                    Segment::Literal(text) => regex::escape(text),
                    Segment::Wildcard => "[^?/]*".to_string(),
                    placeholder if rule.is_identifier(placeholder) => "[0-9]+".to_string(),
                    _ => class.clone(),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Simplified matchers of every rule plus the deduplicated controller list
#[derive(Debug, Clone, Default)]
pub struct MatcherTable {
    matchers: Vec<SimplifiedMatcher>,
    controllers: Vec<String>,
}

impl MatcherTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the matcher of the next rule
    pub fn push(&mut self, matcher: SimplifiedMatcher) {
        if !self.controllers.contains(&matcher.controller) {
            self.controllers.push(matcher.controller.clone());
        }
        self.matchers.push(matcher);
    }

    /// Matchers in registration order
    pub fn matchers(&self) -> &[SimplifiedMatcher] {
        &self.matchers
    }

    /// Controllers in first-registration order
    pub fn controllers(&self) -> &[String] {
        &self.controllers
    }

    /// Rule indexes whose matcher accepts `path`, in registration order
    pub fn candidates<'a>(&'a self, path: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.matchers
            .iter()
            .filter(move |m| m.is_match(path))
            .map(|m| m.rule_index)
    }

    /// First rule index whose matcher accepts `path`
    pub fn first_match(&self, path: &str) -> Option<usize> {
        self.candidates(path).next()
    }

    /// Number of matchers
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}
