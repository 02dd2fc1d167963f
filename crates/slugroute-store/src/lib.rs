//! # Slugroute Store
//!
//! In-memory collaborators for the slug router:
//! - [`InMemoryStore`]: tables of JSON rows answering point lookups and
//!   ranked searches the way a SQL backend would
//! - [`InMemoryHierarchy`]: the element tree (controllers, element tables,
//!   parent relations) consulted while compiling rules
//! - [`Fixture`]: both of the above loaded from one JSON or YAML document
//!
//! Single-process only. Useful for development, tests and the CLI.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use slugroute_core::{DataStore, LookupOptions, Predicate};
//! use slugroute_store::InMemoryStore;
//!
//! let mut store = InMemoryStore::new();
//! store.insert("products", json!({ "id": 42, "name": "Red Shoes" })).unwrap();
//!
//! let row = store
//!     .point_lookup("products", &Predicate::eq("id", 42), &LookupOptions::default())
//!     .unwrap();
//! assert!(row.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

mod fixture;
mod hierarchy;
mod inmemory;
mod matching;

pub use fixture::Fixture;
pub use hierarchy::{ElementDef, InMemoryHierarchy};
pub use inmemory::{InMemoryStore, StoreStats};
