//! # Slugroute Router
//!
//! Bidirectional URL routing for content-driven sites:
//! - Pattern compilation (`products/[p:name]/[el:id]-[el:name]`)
//! - Forward resolution of human-readable slugs to entity ids
//! - Word segmentation of dash-joined multi-field segments
//! - Category chain resolution, root to element
//! - Reverse URL building, element up through its categories
//!
//! ## Usage
//!
//! Rules are compiled once into an immutable [`Router`]. Each incoming
//! request gets its own [`Session`], which carries the row cache and the
//! active controller/id; sessions are never shared between requests.
//!
//! The coarse choice of *which* rule applies to a path is left to the
//! caller (see [`MatcherTable`]); once chosen, that rule is authoritative.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod builder;
pub mod compiler;
pub mod matcher;
pub mod resolver;
pub mod rule;
pub mod session;
pub mod snapshot;
pub mod words;

pub use builder::UrlRequest;
pub use compiler::Compiler;
pub use matcher::{MatcherTable, SimplifiedMatcher};
pub use rule::{PathSegment, Rule, Segment, SegmentKind};
pub use session::{Resolution, RowCache, Session};
pub use snapshot::Snapshot;
pub use words::{word_combinations, Compositions, WordGroup, WordQuery};

use slugroute_core::{DataStore, HierarchyProvider, Result, RouterSettings, RuleOptions, Tags};

/// Compiled, immutable rule set
#[derive(Debug, Clone, Default)]
pub struct Router {
    rules: Vec<Rule>,
    matchers: MatcherTable,
    pub(crate) settings: RouterSettings,
}

impl Router {
    /// Create a router builder
    pub fn builder<'h>() -> RouterBuilder<'h> {
        RouterBuilder::new()
    }

    /// Rebuild a router from a compiled snapshot, without the element tree
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut matchers = MatcherTable::new();
        for (index, rule) in snapshot.rules.iter().enumerate() {
            matchers.push(SimplifiedMatcher::from_rule(index, rule)?);
        }

        tracing::debug!(rules = snapshot.rules.len(), "Router loaded from snapshot");

        Ok(Self {
            rules: snapshot.rules,
            matchers,
            settings: snapshot.settings,
        })
    }

    /// Snapshot of the compiled rules
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            settings: self.settings.clone(),
            rules: self.rules.clone(),
        }
    }

    /// Start a request-scoped session
    pub fn session<'r>(&'r self, store: &'r dyn DataStore) -> Session<'r> {
        Session::new(self, store)
    }

    /// All rules, in registration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rule at `index`
    pub fn rule(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Simplified matchers, for coarse dispatch
    pub fn matchers(&self) -> &MatcherTable {
        &self.matchers
    }

    /// Router settings
    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Rules of `controller` whose tags agree with `tags`, in registration order
    pub fn rules_for(&self, controller: &str, tags: &Tags) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.controller == controller && rule.matches_tags(tags))
            .collect()
    }

    /// Element key of the first rule registered for `controller`
    pub fn element_for(&self, controller: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.controller == controller)
            .and_then(|rule| rule.options.element.as_deref())
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Has no rules?
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone)]
struct Definition {
    controller: String,
    pattern: String,
    options: RuleOptions,
}

/// Builder collecting rule registrations
///
/// Rules are compiled by [`RouterBuilder::build`], in registration order.
#[derive(Debug, Default)]
pub struct RouterBuilder<'h> {
    compiler: Compiler<'h>,
    settings: RouterSettings,
    definitions: Vec<Definition>,
}

impl<'h> RouterBuilder<'h> {
    /// Create a new router builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `hierarchy` for missing tables and category chains
    pub fn hierarchy(mut self, hierarchy: &'h dyn HierarchyProvider) -> Self {
        self.compiler = Compiler::with_hierarchy(hierarchy);
        self
    }

    /// Set router settings
    pub fn settings(mut self, settings: RouterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a rule
    pub fn rule(
        mut self,
        controller: impl Into<String>,
        pattern: impl Into<String>,
        options: RuleOptions,
    ) -> Self {
        self.definitions.push(Definition {
            controller: controller.into(),
            pattern: pattern.into(),
            options,
        });
        self
    }

    /// Compile every registered rule
    ///
    /// # Errors
    ///
    /// Returns the first configuration error raised by the compiler.
    pub fn build(self) -> Result<Router> {
        let mut rules = Vec::with_capacity(self.definitions.len());
        let mut matchers = MatcherTable::new();

        for (index, def) in self.definitions.into_iter().enumerate() {
            let (rule, matcher) = self
                .compiler
                .compile(index, &def.controller, &def.pattern, def.options)?;
            rules.push(rule);
            matchers.push(matcher);
        }

        tracing::debug!(
            rules = rules.len(),
            controllers = matchers.controllers().len(),
            "Router built"
        );

        Ok(Router {
            rules,
            matchers,
            settings: self.settings,
        })
    }
}
