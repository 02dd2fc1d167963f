//! Word segmentation of dash-joined URL segments
//!
//! A pattern like `[el:name]-[el:surname]-age-[el:age]` joins several fields
//! with dashes, so a request such as `diego-de-la-vega-age-17` does not say
//! where `name` ends and `surname` starts. The segment is first split into
//! [`WordGroup`]s (one per run of dash-joined placeholders), then every way
//! of distributing each group's words over its fields is enumerated and
//! turned into one ranked store query.
//!
//! For `W` words over `F` fields there are `C(W-1, F-1)` distributions, one
//! per choice of `F-1` break points among the `W-1` gaps between words.

use crate::rule::{PathSegment, Segment};
use regex::Regex;
use slugroute_core::{OrderBy, Predicate, RouterSettings, ACCEPTABLE_CHARACTERS};

/// Token joining the words assigned to one field; matches any run in a `Contains` predicate
pub const JOIN_TOKEN: &str = "%";

/// Words of a request segment that must be spread over some fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGroup {
    /// Destination fields, in pattern order
    pub fields: Vec<String>,
    /// Request words, in path order
    pub words: Vec<String>,
}

/// One assignment of words to fields: `(field, joined words)` in field order
pub type Combination = Vec<(String, String)>;

/// Split `request` into word groups following the shape of `segment`
///
/// Returns `None` when the request does not have the segment's shape, and an
/// empty list when the segment holds no placeholders.
pub fn group(segment: &PathSegment, request: &str) -> Option<Vec<WordGroup>> {
    let parts = segment.parts();
    let class = format!("([{ACCEPTABLE_CHARACTERS}]*)");
    let mut runs: Vec<Vec<String>> = Vec::new();
    let mut source = String::from("(?i)^");

    let mut i = 0;
    while i < parts.len() {
        match &parts[i] {
            Segment::Literal(text) => source.push_str(&regex::escape(text)),
            Segment::Wildcard => source.push_str("[^?/]*"),
            Segment::ElementPlaceholder(field) | Segment::ParentPlaceholder(field) => {
                let mut fields = vec![field.clone()];
                while i + 2 < parts.len() && is_dash(&parts[i + 1]) {
                    match parts[i + 2].field() {
                        Some(next) => fields.push(next.to_string()),
                        None => break,
                    }
                    i += 2;
                }
                runs.push(fields);
                source.push_str(&class);
            }
        }
        i += 1;
    }
    source.push('$');

    if runs.is_empty() {
        return Some(Vec::new());
    }

    let regex = match Regex::new(&source) {
        Ok(regex) => regex,
        Err(e) => {
            tracing::warn!(segment = %segment, error = %e, "Word group regex does not compile");
            return None;
        }
    };
    let captures = regex.captures(request)?;

    let groups = runs
        .into_iter()
        .enumerate()
        .map(|(k, fields)| {
            let value = captures.get(k + 1).map_or("", |m| m.as_str());
            WordGroup {
                fields,
                words: value.split('-').map(str::to_string).collect(),
            }
        })
        .collect();

    Some(groups)
}

fn is_dash(part: &Segment) -> bool {
    matches!(part, Segment::Literal(text) if text == "-")
}

/// Compositions of `words` into `fields` ordered positive parts
///
/// Yields part sizes in lexicographic order (`[1, 3]`, `[2, 2]`, `[3, 1]` for
/// four words over two fields). Iterative, so long word runs do not grow the
/// stack. Nothing is yielded when `fields` is zero or exceeds `words`.
#[derive(Debug, Clone)]
pub struct Compositions {
    words: usize,
    breaks: Vec<usize>,
    done: bool,
}

impl Compositions {
    /// Enumerate the compositions of `words` into `fields` parts
    pub fn new(words: usize, fields: usize) -> Self {
        let done = fields == 0 || fields > words;
        let breaks = if done { Vec::new() } else { (1..fields).collect() };
        Self {
            words,
            breaks,
            done,
        }
    }
}

impl Iterator for Compositions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut sizes = Vec::with_capacity(self.breaks.len() + 1);
        let mut prev = 0;
        for &b in &self.breaks {
            sizes.push(b - prev);
            prev = b;
        }
        sizes.push(self.words - prev);

        // Break points are a (F-1)-subset of 1..=W-1; advance it.
        let gaps = self.words - 1;
        let k = self.breaks.len();
        match (0..k).rev().find(|&j| self.breaks[j] < gaps - (k - 1 - j)) {
            Some(j) => {
                self.breaks[j] += 1;
                for t in j + 1..k {
                    self.breaks[t] = self.breaks[t - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(sizes)
    }
}

/// Every assignment of `words` to `fields`, preserving both orders
///
/// Each field receives at least one contiguous word; the words of a field
/// are joined with [`JOIN_TOKEN`]. Empty when there are more fields than
/// words.
pub fn word_combinations(words: &[String], fields: &[String]) -> Vec<Combination> {
    if fields.is_empty() || fields.len() > words.len() {
        return Vec::new();
    }

    if fields.len() == 1 {
        return vec![vec![(fields[0].clone(), words.join(JOIN_TOKEN))]];
    }

    if fields.len() == words.len() {
        return vec![fields.iter().cloned().zip(words.iter().cloned()).collect()];
    }

    Compositions::new(words.len(), fields.len())
        .map(|sizes| {
            let mut rest = words;
            fields
                .iter()
                .zip(sizes)
                .map(|(field, size)| {
                    let (taken, remaining) = rest.split_at(size);
                    rest = remaining;
                    (field.clone(), taken.join(JOIN_TOKEN))
                })
                .collect()
        })
        .collect()
}

/// Search predicate derived from the word groups of one segment
#[derive(Debug, Clone, PartialEq)]
pub struct WordQuery {
    /// Groups AND'd, combinations within a group OR'd, fields within a combination AND'd
    pub predicate: Predicate,
    /// Every field the predicate touches, in first-use order
    pub fields: Vec<String>,
}

impl WordQuery {
    /// Build the query; `None` when a group has more fields than words
    pub fn build(groups: &[WordGroup]) -> Option<Self> {
        let mut fields: Vec<String> = Vec::new();
        let mut conjuncts = Vec::with_capacity(groups.len());

        for group in groups {
            if group.words.len() < group.fields.len() {
                tracing::trace!(
                    fields = group.fields.len(),
                    words = group.words.len(),
                    "More fields than words, segment rejected"
                );
                return None;
            }

            let combinations = word_combinations(&group.words, &group.fields);
            tracing::trace!(
                fields = group.fields.len(),
                words = group.words.len(),
                combinations = combinations.len(),
                "Word combinations generated"
            );

            let alternatives = combinations
                .into_iter()
                .map(|combination| {
                    Predicate::and(
                        combination
                            .into_iter()
                            .map(|(field, value)| {
                                if !fields.contains(&field) {
                                    fields.push(field.clone());
                                }
                                Predicate::contains(field, value)
                            })
                            .collect(),
                    )
                })
                .collect();
            conjuncts.push(Predicate::or(alternatives));
        }

        Some(Self {
            predicate: Predicate::and(conjuncts),
            fields,
        })
    }

    /// Add a scoping condition (e.g. the resolved parent category)
    pub fn scoped(mut self, scope: Option<Predicate>) -> Self {
        if let Some(scope) = scope {
            if let Predicate::And(ref mut conjuncts) = self.predicate {
                conjuncts.push(scope);
            }
        }
        self
    }

    /// Ranking for `table`: its length column if indexed, else the summed field lengths
    pub fn order_by(&self, settings: &RouterSettings, table: &str) -> OrderBy {
        if settings.is_length_indexed(table) {
            OrderBy::Column(settings.length_column.clone())
        } else {
            OrderBy::SummedLength(self.fields.clone())
        }
    }
}
