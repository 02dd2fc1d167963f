//! Request-scoped resolution state
//!
//! A [`Session`] is created for one incoming request. It owns the request
//! context (active controller and id) and the row cache, and must not be
//! shared across requests.

use crate::Router;
use serde::Serialize;
use slugroute_core::{
    DataStore, EntityHydrator, EntityId, LookupOptions, NoopHydrator, Predicate, RequestContext,
    Result, Row, UrlWordEncoder, WordEncoder,
};
use std::collections::HashMap;

static NOOP_HYDRATOR: NoopHydrator = NoopHydrator;
static DEFAULT_ENCODER: UrlWordEncoder = UrlWordEncoder;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RowKey {
    table: String,
    lang: Option<String>,
    id: EntityId,
}

/// Rows fetched during one session, keyed by table, language and id
#[derive(Debug, Default)]
pub struct RowCache {
    rows: HashMap<RowKey, Option<Row>>,
}

impl RowCache {
    /// Number of memoized lookups (hits and misses)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of a successful forward resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Controller of the rule
    pub controller: String,
    /// Resolved entity id, `None` when the rule resolves no entity
    pub id: Option<EntityId>,
    /// Index of the rule that resolved the request
    pub rule_index: usize,
}

/// Resolution state of one request
pub struct Session<'r> {
    pub(crate) router: &'r Router,
    pub(crate) store: &'r dyn DataStore,
    pub(crate) hydrator: &'r dyn EntityHydrator,
    pub(crate) encoder: &'r dyn WordEncoder,
    pub(crate) context: RequestContext,
    cache: RowCache,
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("rules", &self.router.rules().len())
            .field("context", &self.context)
            .field("cached_rows", &self.cache.len())
            .finish()
    }
}

impl<'r> Session<'r> {
    /// Start a session over `router` and `store`
    pub fn new(router: &'r Router, store: &'r dyn DataStore) -> Self {
        Self {
            router,
            store,
            hydrator: &NOOP_HYDRATOR,
            encoder: &DEFAULT_ENCODER,
            context: RequestContext::new(),
            cache: RowCache::default(),
        }
    }

    /// Notify `hydrator` of resolved entities
    pub fn with_hydrator(mut self, hydrator: &'r dyn EntityHydrator) -> Self {
        self.hydrator = hydrator;
        self
    }

    /// Encode URL words with `encoder`
    pub fn with_encoder(mut self, encoder: &'r dyn WordEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Start from an existing request context
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    /// Request context
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Mutable request context
    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.context
    }

    /// Row cache
    pub fn cache(&self) -> &RowCache {
        &self.cache
    }

    /// Fetch a row by id, memoized for the rest of the session
    pub(crate) fn fetch_row(
        &mut self,
        table: &str,
        id_field: &str,
        id: EntityId,
        lang: Option<&str>,
    ) -> Result<Option<Row>> {
        let key = RowKey {
            table: table.to_string(),
            lang: lang.map(str::to_string),
            id,
        };
        if let Some(cached) = self.cache.rows.get(&key) {
            tracing::trace!(table, id, "Row cache hit");
            return Ok(cached.clone());
        }

        tracing::trace!(table, id, lang = ?lang, "Fetching row");
        let row = self.store.point_lookup(
            table,
            &Predicate::eq(id_field, id),
            &LookupOptions::lang(lang),
        )?;
        self.cache.rows.insert(key, row.clone());
        Ok(row)
    }
}
