//! Reverse URL building: controller and entity id to a canonical path
//!
//! Segments are processed in a fixed order: element segments first (in
//! pattern order), then category segments from the one nearest the element
//! up to the root (each level's id is only known once the row below it has
//! been fetched). Literals are copied as they are. The path is reassembled
//! in pattern order.
//!
//! The k-th segment holding a category placeholder, counted in pattern
//! order, is filled from level k of the rule's chain, whether or not it
//! also holds element placeholders.

use crate::rule::{PathSegment, Rule, Segment};
use crate::session::Session;
use serde_json::Value;
use slugroute_core::{value_to_id, value_to_text, EntityId, Error, FieldValues, Result, Tags};

/// Parameters of a reverse build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlRequest {
    /// Target controller
    pub controller: String,
    /// Entity id; when missing, the session's active id is reused for the active controller
    pub id: Option<EntityId>,
    /// Tags selecting the rule variant (e.g. `lang`)
    pub tags: Tags,
    /// Field values overriding what would be read from the element row
    pub fields: FieldValues,
    /// Only try the rule at this position among the controller's matching rules
    pub rule_index: Option<usize>,
    /// Substitute values without word encoding
    pub raw: bool,
}

impl UrlRequest {
    /// Build a URL for `controller`
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            ..Default::default()
        }
    }

    /// Set the entity id
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Add a tag
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Override a field value
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Restrict to one rule position
    pub fn rule_index(mut self, index: usize) -> Self {
        self.rule_index = Some(index);
        self
    }

    /// Skip word encoding
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

/// A pattern segment being filled in
#[derive(Debug, Clone)]
struct SegmentFill<'a> {
    parts: &'a [Segment],
    values: Vec<Option<String>>,
    replacement: Option<String>,
}

impl<'a> SegmentFill<'a> {
    fn new(segment: &'a PathSegment) -> Self {
        let parts = segment.parts();
        Self {
            parts,
            values: vec![None; parts.len()],
            replacement: None,
        }
    }

    /// Replace the whole segment (used for the null token)
    fn replace(&mut self, text: &str) {
        self.replacement = Some(text.to_string());
    }

    /// Fill every category placeholder with the same text
    fn fill_all_parents(&mut self, value: &str) {
        self.fill(|p| matches!(p, Segment::ParentPlaceholder(_)), value);
    }

    fn fill_element(&mut self, field: &str, value: &str) {
        self.fill(|p| matches!(p, Segment::ElementPlaceholder(f) if f == field), value);
    }

    fn fill_parent(&mut self, field: &str, value: &str) {
        self.fill(|p| matches!(p, Segment::ParentPlaceholder(f) if f == field), value);
    }

    fn fill(&mut self, target: impl Fn(&Segment) -> bool, value: &str) {
        for (part, slot) in self.parts.iter().zip(self.values.iter_mut()) {
            if slot.is_none() && target(part) {
                *slot = Some(value.to_string());
            }
        }
    }

    /// Unfilled placeholders keep their pattern text
    fn render(&self) -> String {
        if let Some(text) = &self.replacement {
            return text.clone();
        }
        self.parts
            .iter()
            .zip(&self.values)
            .map(|(part, value)| value.clone().unwrap_or_else(|| part.to_string()))
            .collect()
    }
}

impl<'r> Session<'r> {
    /// Build the URL of `request`, `Ok(None)` when no rule of the controller can produce one
    ///
    /// Rules of the controller whose tags agree with the request are tried
    /// in registration order; the first one that builds wins.
    ///
    /// # Errors
    ///
    /// Returns an error for data store failures or a rule lacking its table.
    pub fn build(&mut self, request: &UrlRequest) -> Result<Option<String>> {
        tracing::debug!(
            controller = %request.controller,
            id = ?request.id,
            tags = ?request.tags,
            rule_index = ?request.rule_index,
            "Building URL"
        );

        let router = self.router;
        let mut tags = request.tags.clone();
        if let Some(lang) = &router.settings.default_lang {
            tags.entry("lang".to_string()).or_insert_with(|| lang.clone());
        }

        for (position, rule) in router.rules_for(&request.controller, &tags).into_iter().enumerate() {
            if request.rule_index.is_some_and(|index| index != position) {
                continue;
            }
            if let Some(url) = self.build_from_rule(rule, request, &tags)? {
                return Ok(Some(url));
            }
        }

        tracing::debug!(controller = %request.controller, "No rule could build the URL");
        Ok(None)
    }

    /// Shorthand for [`Session::build`] with a controller and an id
    pub fn url_for(&mut self, controller: &str, id: EntityId) -> Result<Option<String>> {
        self.build(&UrlRequest::new(controller).id(id))
    }

    fn build_from_rule(
        &mut self,
        rule: &Rule,
        request: &UrlRequest,
        tags: &Tags,
    ) -> Result<Option<String>> {
        let options = &rule.options;
        let lang = tags.get("lang").map(String::as_str);
        let raw = request.raw || options.dont_encode;

        // Level k of the chain backs the k-th category segment
        let levels = category_segments(rule);
        if levels.len() > options.parent_chain.len() {
            return Err(Error::Config(format!(
                "rule '{}' has more category segments than chain levels",
                rule.pattern_string()
            )));
        }
        let chain = &options.parent_chain[..levels.len()];

        let mut fills: Vec<SegmentFill<'_>> = rule.pattern.iter().map(SegmentFill::new).collect();
        let mut fields = request.fields.clone();
        let mut next_parent: Option<EntityId> = None;

        for (index, segment) in rule.pattern.iter().enumerate() {
            if !segment.has_element() {
                continue;
            }
            let Some(id) = request.id.or_else(|| self.context.reusable_id(&rule.controller)) else {
                tracing::debug!(controller = %rule.controller, "No id to build the URL with");
                return Ok(None);
            };
            fills[index].fill_element(&options.id_field, &id.to_string());

            let nearest = chain.last();
            let mut needed: Vec<String> = segment
                .element_fields()
                .into_iter()
                .filter(|f| *f != options.id_field && !fields.contains_key(*f))
                .map(str::to_string)
                .collect();
            let mut parent_value = nearest.and_then(|link| fields.get(&link.link_field).cloned());
            if let Some(link) = nearest {
                if parent_value.is_none() && !needed.contains(&link.link_field) {
                    needed.push(link.link_field.clone());
                }
            }

            if !needed.is_empty() {
                let table = options.table.as_deref().ok_or_else(|| {
                    Error::Config(format!("rule '{}' has no table", rule.pattern_string()))
                })?;
                let Some(row) = self.fetch_row(table, &options.id_field, id, lang)? else {
                    tracing::debug!(table, id, "Element row not found");
                    return Ok(None);
                };
                for field in needed {
                    let value = row.get(&field).cloned().unwrap_or(Value::Null);
                    if nearest.is_some_and(|link| link.link_field == field) {
                        parent_value = Some(value.clone());
                    }
                    fields.insert(field, value);
                }
            }

            for (field, value) in &fields {
                if let Some(text) = value_to_text(value) {
                    let encoded = self.encode(&text, raw, options.lowercase);
                    fills[index].fill_element(field, &encoded);
                }
            }

            if let Some(value) = parent_value {
                next_parent = value_to_id(&value);
            }
        }

        // Categories, nearest to the element first
        for (level, &index) in levels.iter().enumerate().rev() {
            let link = &chain[level];
            let Some(parent_id) = next_parent.take() else {
                if rule.pattern[index].has_element() {
                    fills[index].fill_all_parents(&options.null_token);
                } else {
                    fills[index].replace(&options.null_token);
                }
                continue;
            };

            let Some(row) = self.fetch_row(&link.table, &link.id_field, parent_id, lang)? else {
                tracing::debug!(table = %link.table, id = parent_id, "Category row not found");
                return Ok(None);
            };
            if level > 0 {
                next_parent = row.get(&chain[level - 1].link_field).and_then(value_to_id);
            }

            for (field, value) in &row {
                if let Some(text) = value_to_text(value) {
                    let encoded = self.encode(&text, raw, options.lowercase);
                    fills[index].fill_parent(field, &encoded);
                }
            }
        }

        let url = fills.iter().map(SegmentFill::render).collect::<Vec<_>>().join("/");
        tracing::trace!(controller = %rule.controller, url = %url, "URL built");
        Ok(Some(url))
    }

    fn encode(&self, text: &str, raw: bool, lowercase: bool) -> String {
        if raw {
            text.to_string()
        } else {
            self.encoder.encode(text, lowercase)
        }
    }
}

/// Indices of the segments holding category placeholders, root level first
fn category_segments(rule: &Rule) -> Vec<usize> {
    rule.pattern
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.has_parent())
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::parse_pattern;
    use slugroute_core::RuleOptions;

    fn rule(pattern: &str) -> Rule {
        Rule {
            pattern: parse_pattern(pattern).unwrap(),
            controller: "Item".to_string(),
            options: RuleOptions::default(),
        }
    }

    #[test]
    fn test_category_segments() {
        let rule = rule("cat/[p:id]/sub/[p:id]/item/[el:id]");
        assert_eq!(category_segments(&rule), vec![1, 3]);
    }

    #[test]
    fn test_category_segments_mixed() {
        let rule = rule("[p:name]/[el:name]-[p:name]");
        assert_eq!(category_segments(&rule), vec![0, 1]);
    }

    #[test]
    fn test_segment_fill_render() {
        let segment = PathSegment::parse("[el:id]-[el:name]-[p:name]").unwrap();
        let mut fill = SegmentFill::new(&segment);
        fill.fill_element("id", "42");
        fill.fill_element("name", "red-shoes");
        assert_eq!(fill.render(), "42-red-shoes-[p:name]");

        fill.fill_parent("name", "footwear");
        assert_eq!(fill.render(), "42-red-shoes-footwear");
    }

    #[test]
    fn test_mixed_fill_with_null_token() {
        let segment = PathSegment::parse("[el:name]-[p:name]").unwrap();
        let mut fill = SegmentFill::new(&segment);
        fill.fill_element("name", "red-shoes");
        fill.fill_all_parents("none");
        assert_eq!(fill.render(), "red-shoes-none");
    }

    #[test]
    fn test_replaced_fill() {
        let segment = PathSegment::parse("[p:name]").unwrap();
        let mut fill = SegmentFill::new(&segment);
        fill.replace("none");
        assert_eq!(fill.render(), "none");

        fill.replace("");
        assert_eq!(fill.render(), "");
    }

    #[test]
    fn test_url_request_builder() {
        let request = UrlRequest::new("Product")
            .id(42)
            .tag("lang", "it")
            .field("name", "Scarpe Rosse")
            .rule_index(1)
            .raw(true);

        assert_eq!(request.controller, "Product");
        assert_eq!(request.id, Some(42));
        assert_eq!(request.tags.get("lang").map(String::as_str), Some("it"));
        assert_eq!(request.fields.get("name"), Some(&Value::from("Scarpe Rosse")));
        assert_eq!(request.rule_index, Some(1));
        assert!(request.raw);
    }
}
