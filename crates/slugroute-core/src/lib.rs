//! # Slugroute Core
//!
//! Core types, traits, and error handling for the Slugroute URL engine.
//!
//! This crate provides the foundational abstractions shared by the compiler,
//! the resolver and the reverse builder:
//! - Rule options and parent-chain links
//! - Data-store predicates and rows
//! - Collaborator traits (data store, hierarchy provider, entity hydrator)
//! - The URL word encoder
//! - Error types

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod encode;
pub mod error;
pub mod request;
pub mod store;
pub mod types;

pub use encode::{is_acceptable_char, UrlWordEncoder, WordEncoder, ACCEPTABLE_CHARACTERS};
pub use error::{Error, Result};
pub use request::RequestContext;
pub use store::{
    DataStore, ElementParent, EntityHydrator, HierarchyProvider, LookupOptions, NoopHydrator,
    OrderBy, Predicate, PredicateOp, SearchOptions,
};
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::encode::{UrlWordEncoder, WordEncoder};
    pub use crate::error::{Error, Result};
    pub use crate::request::RequestContext;
    pub use crate::store::{
        DataStore, ElementParent, EntityHydrator, HierarchyProvider, LookupOptions, OrderBy,
        Predicate, PredicateOp, SearchOptions,
    };
    pub use crate::types::*;
}
