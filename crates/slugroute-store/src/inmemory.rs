//! In-memory data store implementation

use crate::matching::{matches, rank};
use serde_json::Value;
use slugroute_core::{
    value_to_id, DataStore, EntityId, Error, LookupOptions, Predicate, Result, Row, SearchOptions,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, trace};

/// Column holding the language of a row
const LANG_COLUMN: &str = "lang";

/// Call counters, for asserting how often the engine hits the store
#[derive(Debug, Default)]
pub struct StoreStats {
    point_lookups: AtomicUsize,
    ranked_searches: AtomicUsize,
}

impl StoreStats {
    /// Point lookups served so far
    pub fn point_lookups(&self) -> usize {
        self.point_lookups.load(Ordering::Relaxed)
    }

    /// Ranked searches served so far
    pub fn ranked_searches(&self) -> usize {
        self.ranked_searches.load(Ordering::Relaxed)
    }

    /// Total calls
    pub fn total(&self) -> usize {
        self.point_lookups() + self.ranked_searches()
    }
}

/// In-memory data store
///
/// Tables are lists of JSON rows kept in insertion order; ranking ties go to
/// the row inserted first.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: BTreeMap<String, Vec<Row>>,
    stats: StoreStats,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `tables`
    pub fn from_tables(tables: BTreeMap<String, Vec<Row>>) -> Self {
        debug!(
            tables = tables.len(),
            rows = tables.values().map(Vec::len).sum::<usize>(),
            "In-memory store loaded"
        );
        Self {
            tables,
            stats: StoreStats::default(),
        }
    }

    /// Append a row to `table`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] when `row` is not a JSON object.
    pub fn insert(&mut self, table: impl Into<String>, row: Value) -> Result<()> {
        let Value::Object(row) = row else {
            return Err(Error::store("rows must be JSON objects"));
        };
        self.tables.entry(table.into()).or_default().push(row);
        Ok(())
    }

    /// Rows of `table`
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    /// Table names
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Call counters
    pub fn stats(&self) -> &StoreStats {
        &self.stats
    }

    fn table(&self, table: &str) -> Result<&[Row]> {
        self.tables
            .get(table)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::store(format!("unknown table '{table}'")))
    }
}

/// Rows without a language column match every language
fn in_lang(row: &Row, lang: Option<&str>) -> bool {
    match (lang, row.get(LANG_COLUMN).and_then(Value::as_str)) {
        (Some(wanted), Some(actual)) => wanted == actual,
        _ => true,
    }
}

impl DataStore for InMemoryStore {
    fn point_lookup(
        &self,
        table: &str,
        predicate: &Predicate,
        options: &LookupOptions,
    ) -> Result<Option<Row>> {
        self.stats.point_lookups.fetch_add(1, Ordering::Relaxed);
        trace!(table, lang = ?options.lang, "InMemory LOOKUP");

        let lang = options.lang.as_deref();
        Ok(self
            .table(table)?
            .iter()
            .find(|row| in_lang(row, lang) && matches(row, predicate))
            .cloned())
    }

    fn ranked_search(
        &self,
        table: &str,
        predicate: &Predicate,
        options: &SearchOptions,
    ) -> Result<Option<EntityId>> {
        self.stats.ranked_searches.fetch_add(1, Ordering::Relaxed);
        trace!(table, leaves = predicate.leaf_count(), "InMemory SEARCH");

        let best = self
            .table(table)?
            .iter()
            .filter(|row| matches(row, predicate))
            .min_by_key(|row| rank(row, &options.order_by));

        Ok(best
            .and_then(|row| row.get(&options.result_field))
            .and_then(value_to_id))
    }
}
