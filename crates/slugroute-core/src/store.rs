//! Collaborator traits: data store, hierarchy provider, entity hydrator
//!
//! The engine never owns its data. It issues point lookups and ranked
//! searches through [`DataStore`], reads the element tree through
//! [`HierarchyProvider`] while compiling, and notifies [`EntityHydrator`]
//! once a request has been resolved to an entity.

use crate::types::{EntityId, Row};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operator of a predicate leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateOp {
    /// Exact equality (`null` matches a missing or null column)
    Eq,
    /// SQL `LIKE '%value%'`, where `%` inside the value is an in-order wildcard
    Contains,
}

/// AND/OR tree of field conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Single condition
    Field {
        /// Column name
        field: String,
        /// Comparison operator
        op: PredicateOp,
        /// Compared value
        value: Value,
    },
    /// All sub-predicates must hold
    And(Vec<Predicate>),
    /// At least one sub-predicate must hold
    Or(Vec<Predicate>),
}

impl Predicate {
    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Field {
            field: field.into(),
            op: PredicateOp::Eq,
            value: value.into(),
        }
    }

    /// `field LIKE '%pattern%'`
    pub fn contains(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::Field {
            field: field.into(),
            op: PredicateOp::Contains,
            value: Value::String(pattern.into()),
        }
    }

    /// Conjunction
    pub fn and(predicates: Vec<Predicate>) -> Self {
        Predicate::And(predicates)
    }

    /// Disjunction
    pub fn or(predicates: Vec<Predicate>) -> Self {
        Predicate::Or(predicates)
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::Field { .. } => 1,
            Predicate::And(subs) | Predicate::Or(subs) => subs.iter().map(Self::leaf_count).sum(),
        }
    }
}

/// Options of a point lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupOptions {
    /// Language of the row to return
    pub lang: Option<String>,
}

impl LookupOptions {
    /// Lookup in the given language
    pub fn lang(lang: Option<&str>) -> Self {
        Self {
            lang: lang.map(str::to_string),
        }
    }
}

/// Ranking applied to a search, ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Sum of the character lengths of these columns
    SummedLength(Vec<String>),
    /// A precomputed length column
    Column(String),
}

/// Options of a ranked search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Column whose value is returned for the best row
    pub result_field: String,
    /// Ranking, shortest first
    pub order_by: OrderBy,
}

/// Data store consulted by the resolver and the reverse builder
///
/// Calls are blocking; the engine issues them sequentially.
#[cfg_attr(test, mockall::automock)]
pub trait DataStore {
    /// Fetch the first row of `table` satisfying `predicate`
    fn point_lookup(
        &self,
        table: &str,
        predicate: &Predicate,
        options: &LookupOptions,
    ) -> Result<Option<Row>>;

    /// Return `result_field` of the best-ranked row of `table` satisfying `predicate`
    fn ranked_search(
        &self,
        table: &str,
        predicate: &Predicate,
        options: &SearchOptions,
    ) -> Result<Option<EntityId>>;
}

/// Parent relation of an element in the element tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementParent {
    /// Column on the element's table pointing to the parent
    pub field: String,
    /// Parent element key
    pub element: String,
}

/// Element tree consulted while compiling rules
#[cfg_attr(test, mockall::automock)]
pub trait HierarchyProvider {
    /// Element rendered by a controller
    fn controller_element(&self, controller: &str) -> Option<String>;

    /// Table backing an element
    fn element_table(&self, element: &str) -> Option<String>;

    /// Parent of an element
    fn element_parent(&self, element: &str) -> Option<ElementParent>;
}

/// Receives the main entity of a resolved request
pub trait EntityHydrator {
    /// Load the main entity of the request
    fn load_main_entity(&self, element: &str, id: EntityId);
}

/// Hydrator that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHydrator;

impl EntityHydrator for NoopHydrator {
    fn load_main_entity(&self, element: &str, id: EntityId) {
        tracing::trace!(element, id, "No hydrator configured, skipping entity load");
    }
}

impl<T: DataStore + ?Sized> DataStore for &T {
    fn point_lookup(
        &self,
        table: &str,
        predicate: &Predicate,
        options: &LookupOptions,
    ) -> Result<Option<Row>> {
        (**self).point_lookup(table, predicate, options)
    }

    fn ranked_search(
        &self,
        table: &str,
        predicate: &Predicate,
        options: &SearchOptions,
    ) -> Result<Option<EntityId>> {
        (**self).ranked_search(table, predicate, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predicate_leaf_count() {
        let predicate = Predicate::and(vec![
            Predicate::or(vec![
                Predicate::and(vec![
                    Predicate::contains("name", "diego"),
                    Predicate::contains("surname", "de%la%vega"),
                ]),
                Predicate::and(vec![
                    Predicate::contains("name", "diego%de"),
                    Predicate::contains("surname", "la%vega"),
                ]),
            ]),
            Predicate::eq("category", 7),
        ]);
        assert_eq!(predicate.leaf_count(), 5);
    }

    #[test]
    fn test_predicate_serialization() {
        let predicate = Predicate::eq("id", 42);
        let value = serde_json::to_value(&predicate).unwrap();
        assert_eq!(
            value,
            json!({ "field": { "field": "id", "op": "eq", "value": 42 } })
        );
    }

    #[test]
    fn test_reference_forwards_to_store() {
        let mut store = MockDataStore::new();
        store
            .expect_point_lookup()
            .withf(|table, _, options| table == "products" && options.lang.as_deref() == Some("en"))
            .times(1)
            .returning(|_, _, _| Ok(Some(Row::new())));

        let by_ref = &store;
        let row = by_ref
            .point_lookup("products", &Predicate::eq("id", 1), &LookupOptions::lang(Some("en")))
            .unwrap();
        assert!(row.is_some());
    }
}
