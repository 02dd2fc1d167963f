//! Fixture documents: tables and element tree in one file
//!
//! ```yaml
//! controllers:
//!   Product: Product
//! elements:
//!   Category: { table: categories }
//!   Product:
//!     table: products
//!     parent: { field: category, element: Category }
//! tables:
//!   categories:
//!     - { id: 1, name: Shoes, category: null }
//!   products:
//!     - { id: 42, name: Red Shoes, category: 1 }
//! ```

use crate::hierarchy::{ElementDef, InMemoryHierarchy};
use crate::inmemory::InMemoryStore;
use serde::{Deserialize, Serialize};
use slugroute_core::{Error, Result, Row};
use std::collections::BTreeMap;
use std::path::Path;

/// Data and element tree loaded together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Controller name to element key
    #[serde(default)]
    pub controllers: BTreeMap<String, String>,

    /// Element key to definition
    #[serde(default)]
    pub elements: BTreeMap<String, ElementDef>,

    /// Table name to rows
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<Row>>,
}

impl Fixture {
    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml" | "yml") => Self::from_yaml(&content),
            _ => Err(Error::Config(format!(
                "unsupported fixture format: {}",
                path.display()
            ))),
        }
    }

    /// Parse JSON
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse fixture YAML: {e}")))
    }

    /// Split into the store and the element tree
    pub fn into_parts(self) -> (InMemoryStore, InMemoryHierarchy) {
        let hierarchy = InMemoryHierarchy {
            controllers: self.controllers,
            elements: self.elements,
        };
        (InMemoryStore::from_tables(self.tables), hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slugroute_core::{DataStore, HierarchyProvider, LookupOptions, Predicate};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
controllers:
  Product: Product
elements:
  Category: { table: categories }
  Product:
    table: products
    parent: { field: category, element: Category }
tables:
  categories:
    - { id: 1, name: Shoes, category: null }
  products:
    - { id: 42, name: Red Shoes, category: 1 }
"#;

    #[test]
    fn test_from_yaml() {
        let (store, tree) = Fixture::from_yaml(YAML).unwrap().into_parts();

        assert_eq!(tree.controller_element("Product").as_deref(), Some("Product"));
        assert_eq!(tree.element_parent("Product").unwrap().field, "category");

        let row = store
            .point_lookup("products", &Predicate::eq("id", 42), &LookupOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(row.get("category"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let fixture = Fixture::load(file.path()).unwrap();
        assert_eq!(fixture.tables.len(), 2);
        assert_eq!(fixture.elements.len(), 2);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{ "tables": { "t": [ { "id": 1 } ] } }"#).unwrap();

        let fixture = Fixture::load(file.path()).unwrap();
        assert_eq!(fixture.tables["t"].len(), 1);
        assert!(fixture.controllers.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::new().unwrap();
        let err = Fixture::load(file.path()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_bad_yaml() {
        assert!(Fixture::from_yaml("tables: [").unwrap_err().is_config());
    }
}
