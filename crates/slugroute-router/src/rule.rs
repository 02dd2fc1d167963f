//! Rule definition and pattern segments
//!
//! A pattern such as `shop/[p:name]/[el:id]-[el:name]` is split on `/` into
//! [`PathSegment`]s, each of which is a sequence of [`Segment`] tokens.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use slugroute_core::{Error, Result, RuleOptions};
use std::fmt;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[(el|p):([a-z0-9_-]+)\]|\[\*\]").expect("placeholder regex is valid")
});

/// One token of a pattern segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// `[el:field]` - a column of the element row
    ElementPlaceholder(String),
    /// `[p:field]` - a column of a category row
    ParentPlaceholder(String),
    /// `[*]` - legacy wildcard, matches any run without `/` or `?`
    Wildcard,
}

impl Segment {
    /// Field name of a placeholder
    pub fn field(&self) -> Option<&str> {
        match self {
            Segment::ElementPlaceholder(field) | Segment::ParentPlaceholder(field) => Some(field),
            _ => None,
        }
    }

    /// Is this an element or category placeholder?
    pub fn is_placeholder(&self) -> bool {
        self.field().is_some()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::ElementPlaceholder(field) => write!(f, "[el:{field}]"),
            Segment::ParentPlaceholder(field) => write!(f, "[p:{field}]"),
            Segment::Wildcard => f.write_str("[*]"),
        }
    }
}

/// What a path segment stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Holds at least one element placeholder (possibly mixed with category ones)
    Element,
    /// Holds category placeholders only
    Category,
    /// No placeholders
    Literal,
}

/// The text between two slashes of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathSegment {
    parts: Vec<Segment>,
}

impl PathSegment {
    /// Tokenize one segment of a pattern
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut last = 0;

        for m in PLACEHOLDER.find_iter(raw) {
            if m.start() > last {
                parts.push(Segment::Literal(raw[last..m.start()].to_string()));
            }
            parts.push(parse_placeholder(m.as_str()));
            last = m.end();
        }
        if last < raw.len() {
            parts.push(Segment::Literal(raw[last..].to_string()));
        }

        for part in &parts {
            if let Segment::Literal(text) = part {
                let lower = text.to_ascii_lowercase();
                if lower.contains("[el:") || lower.contains("[p:") {
                    return Err(Error::invalid_pattern(
                        raw,
                        "malformed placeholder (field names allow letters, digits, '_' and '-')",
                    ));
                }
            }
        }

        Ok(Self { parts })
    }

    /// Tokens of this segment
    pub fn parts(&self) -> &[Segment] {
        &self.parts
    }

    /// Classify the segment
    pub fn kind(&self) -> SegmentKind {
        if self.has_element() {
            SegmentKind::Element
        } else if self.has_parent() {
            SegmentKind::Category
        } else {
            SegmentKind::Literal
        }
    }

    /// Does the segment hold an element placeholder?
    pub fn has_element(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Segment::ElementPlaceholder(_)))
    }

    /// Does the segment hold a category placeholder?
    pub fn has_parent(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Segment::ParentPlaceholder(_)))
    }

    /// Does the segment hold `[el:field]`?
    pub fn has_element_field(&self, field: &str) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Segment::ElementPlaceholder(f) if f == field))
    }

    /// Does the segment hold `[p:field]`?
    pub fn has_parent_field(&self, field: &str) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Segment::ParentPlaceholder(f) if f == field))
    }

    /// Element fields referenced by the segment, in order, without duplicates
    pub fn element_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for part in &self.parts {
            if let Segment::ElementPlaceholder(field) = part {
                if !fields.contains(&field.as_str()) {
                    fields.push(field);
                }
            }
        }
        fields
    }

    /// Keep only the placeholders of `kind`; the others become wildcards
    ///
    /// Used to look up one half of a mixed segment such as
    /// `[el:name]-[p:name]` without constraining the other half.
    pub fn project(&self, kind: SegmentKind) -> PathSegment {
        let parts = self
            .parts
            .iter()
            .map(|part| match (part, kind) {
                (Segment::ElementPlaceholder(_), SegmentKind::Category)
                | (Segment::ParentPlaceholder(_), SegmentKind::Element) => Segment::Wildcard,
                _ => part.clone(),
            })
            .collect();
        PathSegment { parts }
    }
}

impl TryFrom<String> for PathSegment {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<PathSegment> for String {
    fn from(segment: PathSegment) -> Self {
        segment.to_string()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

fn parse_placeholder(token: &str) -> Segment {
    if token == "[*]" {
        return Segment::Wildcard;
    }
    let inner = &token[1..token.len() - 1];
    match inner.split_once(':') {
        Some((kind, field)) if kind.eq_ignore_ascii_case("el") => {
            Segment::ElementPlaceholder(field.to_string())
        }
        Some((_, field)) => Segment::ParentPlaceholder(field.to_string()),
        None => Segment::Literal(token.to_string()),
    }
}

/// Split a raw pattern on `/`
pub fn parse_pattern(raw: &str) -> Result<Vec<PathSegment>> {
    raw.split('/').map(PathSegment::parse).collect()
}

/// A compiled route rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Pattern segments, in path order
    pub pattern: Vec<PathSegment>,

    /// Controller handling the rule
    pub controller: String,

    /// Rule options, defaults applied
    pub options: RuleOptions,
}

impl Rule {
    /// Does any segment hold an element placeholder?
    pub fn has_element(&self) -> bool {
        self.pattern.iter().any(PathSegment::has_element)
    }

    /// Number of segments holding category placeholders
    pub fn category_levels(&self) -> usize {
        self.pattern.iter().filter(|s| s.has_parent()).count()
    }

    /// Is `part` the identifier placeholder of its kind?
    pub fn is_identifier(&self, part: &Segment) -> bool {
        part.field() == Some(self.options.id_field.as_str())
    }

    /// The pattern as registered
    pub fn pattern_string(&self) -> String {
        self.pattern
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Do the rule's tags agree with `tags`? A tag missing on the rule is a wildcard.
    pub fn matches_tags(&self, tags: &slugroute_core::Tags) -> bool {
        tags.iter().all(|(key, value)| {
            self.options
                .tags
                .get(key)
                .map_or(true, |declared| declared == value)
        })
    }
}
