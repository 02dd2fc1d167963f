//! In-memory element tree

use serde::{Deserialize, Serialize};
use slugroute_core::{ElementParent, HierarchyProvider};
use std::collections::BTreeMap;

/// One element of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDef {
    /// Backing table
    pub table: String,

    /// Parent element, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementParent>,
}

/// Element tree held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryHierarchy {
    /// Controller name to element key
    #[serde(default)]
    pub controllers: BTreeMap<String, String>,

    /// Element key to definition
    #[serde(default)]
    pub elements: BTreeMap<String, ElementDef>,
}

impl InMemoryHierarchy {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element backed by `table`
    pub fn element(mut self, key: impl Into<String>, table: impl Into<String>) -> Self {
        self.elements.insert(
            key.into(),
            ElementDef {
                table: table.into(),
                parent: None,
            },
        );
        self
    }

    /// Make `parent` the parent of `key`, linked through `field` on the child's table
    ///
    /// Does nothing when `key` has not been added.
    pub fn parent(
        mut self,
        key: &str,
        field: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        if let Some(def) = self.elements.get_mut(key) {
            def.parent = Some(ElementParent {
                field: field.into(),
                element: parent.into(),
            });
        }
        self
    }

    /// Map a controller to the element it renders
    pub fn controller(mut self, controller: impl Into<String>, element: impl Into<String>) -> Self {
        self.controllers.insert(controller.into(), element.into());
        self
    }
}

impl HierarchyProvider for InMemoryHierarchy {
    fn controller_element(&self, controller: &str) -> Option<String> {
        self.controllers.get(controller).cloned()
    }

    fn element_table(&self, element: &str) -> Option<String> {
        self.elements.get(element).map(|def| def.table.clone())
    }

    fn element_parent(&self, element: &str) -> Option<ElementParent> {
        self.elements.get(element).and_then(|def| def.parent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree() {
        let tree = InMemoryHierarchy::new()
            .element("Category", "categories")
            .element("Product", "products")
            .parent("Product", "category", "Category")
            .controller("Product", "Product");

        assert_eq!(tree.controller_element("Product").as_deref(), Some("Product"));
        assert_eq!(tree.element_table("Category").as_deref(), Some("categories"));
        assert_eq!(
            tree.element_parent("Product"),
            Some(ElementParent {
                field: "category".to_string(),
                element: "Category".to_string(),
            })
        );
        assert!(tree.element_parent("Category").is_none());
        assert!(tree.controller_element("News").is_none());
    }

    #[test]
    fn test_parent_of_unknown_element_is_ignored() {
        let tree = InMemoryHierarchy::new().parent("Ghost", "category", "Category");
        assert!(tree.elements.is_empty());
    }
}
