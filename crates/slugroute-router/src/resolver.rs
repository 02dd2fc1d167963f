//! Forward resolution: request path segments to controller and entity id
//!
//! The rule handed in by the dispatcher is authoritative. Any failed lookup
//! along the way ends resolution with `Ok(None)`; no other rule is tried.

use crate::rule::{PathSegment, Rule, Segment, SegmentKind};
use crate::session::{Resolution, Session};
use crate::words::{group, WordQuery};
use regex::Regex;
use serde_json::Value;
use slugroute_core::{EntityId, Error, LookupOptions, Predicate, Result, SearchOptions};

/// Outcome of looking up one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Found(EntityId),
    /// The segment is the rule's null token
    Absent,
    NoMatch,
}

impl<'r> Session<'r> {
    /// Resolve `segments` (the request path split on `/`) with rule `rule_index`
    ///
    /// On success the controller and id become the session's active ones and
    /// the entity hydrator is notified.
    ///
    /// # Errors
    ///
    /// Returns an error only for data store failures or a rule whose category
    /// chain or table is inconsistent with its pattern.
    pub fn resolve(&mut self, segments: &[&str], rule_index: usize) -> Result<Option<Resolution>> {
        let router = self.router;
        let Some(rule) = router.rule(rule_index) else {
            tracing::debug!(rule_index, "No rule at this index");
            return Ok(None);
        };
        let options = &rule.options;

        // Categories, root first
        let mut scope: Option<Predicate> = None;
        let mut level = 0;
        for (segment, request) in aligned(rule, segments) {
            if !segment.has_parent() {
                continue;
            }
            let link = options.parent_chain.get(level).ok_or_else(|| {
                Error::Config(format!(
                    "rule '{}' has more category segments than chain levels",
                    rule.pattern_string()
                ))
            })?;
            level += 1;

            if segment.has_parent_field(&link.id_field) {
                let target = Segment::ParentPlaceholder(link.id_field.clone());
                if let Some(id) = numeric_id(segment, request, &target) {
                    scope = Some(Predicate::eq(link.link_field.clone(), id));
                    continue;
                }
            }

            let found = self.search_segment(
                rule,
                &segment.project(SegmentKind::Category),
                request,
                &link.table,
                &link.id_field,
                scope.take(),
            )?;
            scope = match found {
                Lookup::Found(id) => Some(Predicate::eq(link.link_field.clone(), id)),
                Lookup::Absent => Some(Predicate::eq(link.link_field.clone(), Value::Null)),
                Lookup::NoMatch => {
                    tracing::debug!(rule_index, level, segment = request, "Category not found");
                    return Ok(None);
                }
            };
        }

        // Element, by id if the path carries one, else by words
        let mut found = Lookup::NoMatch;
        if rule.has_element() {
            let table = options.table.as_deref().ok_or_else(|| {
                Error::Config(format!("rule '{}' has no table", rule.pattern_string()))
            })?;

            let target = Segment::ElementPlaceholder(options.id_field.clone());
            let direct = aligned(rule, segments)
                .filter(|(segment, _)| segment.has_element_field(&options.id_field))
                .find_map(|(segment, request)| numeric_id(segment, request, &target));

            if let Some(id) = direct {
                let mut conditions = vec![Predicate::eq(options.id_field.clone(), id)];
                conditions.extend(scope.clone());
                let row = self.store.point_lookup(
                    table,
                    &Predicate::and(conditions),
                    &LookupOptions::default(),
                )?;
                if row.is_none() {
                    tracing::debug!(rule_index, id, "Element id does not exist");
                    return Ok(None);
                }
                found = Lookup::Found(id);
            } else {
                for (segment, request) in aligned(rule, segments) {
                    if !segment.has_element() {
                        continue;
                    }
                    found = self.search_segment(
                        rule,
                        &segment.project(SegmentKind::Element),
                        request,
                        table,
                        &options.id_field,
                        scope.clone(),
                    )?;
                    if found != Lookup::NoMatch {
                        break;
                    }
                }
                if found == Lookup::NoMatch {
                    tracing::debug!(rule_index, "Element not found");
                    return Ok(None);
                }
            }
        }

        let id = match found {
            Lookup::Found(id) => {
                if let Some(element) = &options.element {
                    self.hydrator.load_main_entity(element, id);
                }
                Some(id)
            }
            _ => None,
        };

        self.context.active_controller = Some(rule.controller.clone());
        self.context.set_active_id(id);
        tracing::debug!(rule_index, controller = %rule.controller, id = ?id, "Request resolved");

        Ok(Some(Resolution {
            controller: rule.controller.clone(),
            id,
            rule_index,
        }))
    }

    /// Look up the row of `table` whose fields spell out `request`
    fn search_segment(
        &mut self,
        rule: &Rule,
        segment: &PathSegment,
        request: &str,
        table: &str,
        id_field: &str,
        scope: Option<Predicate>,
    ) -> Result<Lookup> {
        if request == rule.options.null_token {
            return Ok(Lookup::Absent);
        }

        let Some(groups) = group(segment, request) else {
            return Ok(Lookup::NoMatch);
        };
        if groups.is_empty() {
            return Ok(Lookup::NoMatch);
        }
        let Some(query) = WordQuery::build(&groups) else {
            return Ok(Lookup::NoMatch);
        };

        let query = query.scoped(scope);
        let search = SearchOptions {
            result_field: id_field.to_string(),
            order_by: query.order_by(&self.router.settings, table),
        };
        tracing::trace!(
            table,
            segment = request,
            leaves = query.predicate.leaf_count(),
            "Ranked search"
        );

        Ok(match self.store.ranked_search(table, &query.predicate, &search)? {
            Some(id) => Lookup::Found(id),
            None => Lookup::NoMatch,
        })
    }
}

/// Request segments paired with the pattern segment at the same position
fn aligned<'a>(
    rule: &'a Rule,
    segments: &'a [&'a str],
) -> impl Iterator<Item = (&'a PathSegment, &'a str)> + 'a {
    rule.pattern.iter().zip(segments.iter().copied())
}

/// Digits found at the position of `target` in `request`
///
/// Other placeholders match anything, so `[el:id]-[el:name]` yields `42`
/// for `42-red-shoes`.
fn numeric_id(segment: &PathSegment, request: &str, target: &Segment) -> Option<EntityId> {
    let mut source = String::from("(?i)^");
    let mut captured = false;
    for part in segment.parts() {
        match part {
            Segment::Literal(text) => source.push_str(&regex::escape(text)),
            Segment::Wildcard => source.push_str("[^?/]*"),
            p if p == target && !captured => {
                source.push_str("([0-9]+)");
                captured = true;
            }
            p if p == target => source.push_str("[0-9]+"),
            _ => source.push_str(".*"),
        }
    }
    source.push('$');

    let regex = Regex::new(&source).ok()?;
    regex.captures(request)?.get(1)?.as_str().parse().ok()
}
