//! Rule compilation
//!
//! Turns a raw pattern plus options into a [`Rule`] and its
//! [`SimplifiedMatcher`]. When the pattern references an element or
//! categories that the options do not fully describe, the element tree of a
//! [`HierarchyProvider`] fills in the backing table and the category chain.

use crate::matcher::SimplifiedMatcher;
use crate::rule::{parse_pattern, Rule};
use slugroute_core::{
    Error, HierarchyProvider, ParentLink, Result, RuleOptions, DEFAULT_ID_FIELD,
};

/// Compiles raw patterns into rules
#[derive(Clone, Copy, Default)]
pub struct Compiler<'h> {
    hierarchy: Option<&'h dyn HierarchyProvider>,
}

impl std::fmt::Debug for Compiler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("hierarchy", &self.hierarchy.is_some())
            .finish()
    }
}

impl<'h> Compiler<'h> {
    /// Compiler without an element tree; rules must carry their tables and chains
    pub fn new() -> Self {
        Self { hierarchy: None }
    }

    /// Compiler consulting `hierarchy` for missing tables and category chains
    pub fn with_hierarchy(hierarchy: &'h dyn HierarchyProvider) -> Self {
        Self {
            hierarchy: Some(hierarchy),
        }
    }

    /// Compile one rule registered at `rule_index`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the pattern has a category placeholder
    /// but no element placeholder, or when the element tree cannot provide
    /// the table of the element or of a required category level, and
    /// [`Error::InvalidPattern`] when a placeholder is malformed.
    pub fn compile(
        &self,
        rule_index: usize,
        controller: &str,
        raw_pattern: &str,
        mut options: RuleOptions,
    ) -> Result<(Rule, SimplifiedMatcher)> {
        let pattern = parse_pattern(raw_pattern)?;
        let has_element = pattern.iter().any(|s| s.has_element());
        let levels = pattern.iter().filter(|s| s.has_parent()).count();

        if levels > 0 && !has_element {
            return Err(Error::Config(format!(
                "rule '{raw_pattern}' specifies a category but not an element"
            )));
        }

        if has_element && options.table.is_none() {
            let element = self.element_key(controller, &options, raw_pattern)?;
            let table = self.tree(raw_pattern)?.element_table(&element).ok_or_else(|| {
                Error::Config(format!(
                    "rule '{raw_pattern}': element '{element}' has no table"
                ))
            })?;
            options.element = Some(element);
            options.table = Some(table);
        }

        if levels > options.parent_chain.len() {
            let element = self.element_key(controller, &options, raw_pattern)?;
            options.parent_chain = self.walk_parents(&element, levels, raw_pattern)?;
            options.element.get_or_insert(element);
        }

        let rule = Rule {
            pattern,
            controller: controller.to_string(),
            options,
        };
        let matcher = SimplifiedMatcher::from_rule(rule_index, &rule)?;

        tracing::debug!(
            controller,
            pattern = raw_pattern,
            table = ?rule.options.table,
            levels = rule.options.parent_chain.len(),
            "Rule compiled"
        );

        Ok((rule, matcher))
    }

    fn tree(&self, raw_pattern: &str) -> Result<&'h dyn HierarchyProvider> {
        self.hierarchy.ok_or_else(|| {
            Error::Config(format!(
                "rule '{raw_pattern}' needs the element tree but none is configured"
            ))
        })
    }

    fn element_key(&self, controller: &str, options: &RuleOptions, raw_pattern: &str) -> Result<String> {
        if let Some(element) = &options.element {
            return Ok(element.clone());
        }
        self.tree(raw_pattern)?
            .controller_element(controller)
            .ok_or_else(|| {
                Error::Config(format!(
                    "rule '{raw_pattern}': no element is mapped to controller '{controller}'"
                ))
            })
    }

    /// Climb `levels` parents from `element`; the result is root first
    fn walk_parents(&self, element: &str, levels: usize, raw_pattern: &str) -> Result<Vec<ParentLink>> {
        let tree = self.tree(raw_pattern)?;
        let mut chain = Vec::with_capacity(levels);
        let mut current = element.to_string();

        while chain.len() < levels {
            let parent = tree.element_parent(&current).ok_or_else(|| {
                Error::Config(format!(
                    "can't find parent element of '{current}' for rule '{raw_pattern}'"
                ))
            })?;
            let table = tree.element_table(&parent.element).ok_or_else(|| {
                Error::Config(format!(
                    "can't find table of parent element '{}' for rule '{raw_pattern}'",
                    parent.element
                ))
            })?;

            chain.push(ParentLink {
                id_field: DEFAULT_ID_FIELD.to_string(),
                table,
                link_field: parent.field,
            });
            current = parent.element;
        }

        chain.reverse();
        Ok(chain)
    }
}
