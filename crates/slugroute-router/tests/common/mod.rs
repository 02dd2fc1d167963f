//! Shared fixtures: a small catalog with two category levels

#![allow(dead_code)]

use serde_json::json;
use slugroute_core::{EntityHydrator, EntityId, RuleOptions};
use slugroute_router::Router;
use slugroute_store::{InMemoryHierarchy, InMemoryStore};
use std::cell::RefCell;

pub const HOME: usize = 0;
pub const PRODUCT: usize = 1;
pub const PERSON: usize = 2;
pub const NEWS: usize = 3;
pub const OUTLET: usize = 4;

pub fn tree() -> InMemoryHierarchy {
    InMemoryHierarchy::new()
        .element("Category", "categories")
        .element("Product", "products")
        .element("News", "news")
        .parent("Category", "parent", "Category")
        .parent("Product", "category", "Category")
        .parent("News", "category", "Category")
        .controller("Category", "Category")
        .controller("Product", "Product")
        .controller("News", "News")
}

pub fn store() -> InMemoryStore {
    let mut store = InMemoryStore::new();

    for row in [
        json!({ "id": 1, "name": "Clothing", "parent": null }),
        json!({ "id": 2, "name": "Shoes", "parent": 1 }),
        json!({ "id": 5, "name": "Sports", "parent": null }),
        json!({ "id": 3, "name": "Shoes", "parent": 5 }),
    ] {
        store.insert("categories", row).unwrap();
    }

    for row in [
        json!({ "id": 42, "name": "Red Shoes", "category": 2 }),
        json!({ "id": 43, "name": "Red Shoes", "category": 3 }),
        json!({ "id": 44, "name": "Blue Running Shoes", "category": 3 }),
    ] {
        store.insert("products", row).unwrap();
    }

    // Longer match first, so ranking rather than insertion order decides
    for row in [
        json!({ "id": 2, "name": "Diego", "surname": "de la Vega y Sanchez" }),
        json!({ "id": 1, "name": "Diego", "surname": "de la Vega" }),
        json!({ "id": 3, "name": "Bernardo", "surname": "Vega" }),
    ] {
        store.insert("people", row).unwrap();
    }

    for row in [
        json!({ "id": 7, "title": "Hello World", "category": null }),
        json!({ "id": 8, "title": "Season Opening", "category": 5 }),
    ] {
        store.insert("news", row).unwrap();
    }

    store
}

pub fn router() -> Router {
    let tree = tree();
    Router::builder()
        .hierarchy(&tree)
        .rule("Home", "", RuleOptions::default())
        .rule("Product", "shop/[p:name]/[p:name]/[el:id]-[el:name]", RuleOptions::default())
        .rule(
            "Person",
            "people/[el:name]-[el:surname]",
            RuleOptions::default().table("people"),
        )
        .rule(
            "News",
            "news/[p:name]/[el:title]",
            RuleOptions::default().null_token("none"),
        )
        .rule("Product", "outlet/[el:name]-[p:name]", RuleOptions::default())
        .build()
        .unwrap()
}

pub fn split(path: &str) -> Vec<&str> {
    path.split('/').collect()
}

/// Records every entity it is asked to load
#[derive(Debug, Default)]
pub struct RecordingHydrator {
    pub loaded: RefCell<Vec<(String, EntityId)>>,
}

impl EntityHydrator for RecordingHydrator {
    fn load_main_entity(&self, element: &str, id: EntityId) {
        self.loaded.borrow_mut().push((element.to_string(), id));
    }
}
