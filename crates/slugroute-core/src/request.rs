//! Request context

use crate::types::EntityId;

/// What the current request has been resolved to
///
/// Reverse builds for the active controller may omit the id and reuse
/// `active_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Controller handling the current request
    pub active_controller: Option<String>,

    /// Entity id resolved for the current request
    pub active_id: Option<EntityId>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a request already dispatched to `controller`
    pub fn with_controller(controller: impl Into<String>) -> Self {
        Self {
            active_controller: Some(controller.into()),
            active_id: None,
        }
    }

    /// Set the resolved entity id
    pub fn set_active_id(&mut self, id: Option<EntityId>) {
        self.active_id = id;
    }

    /// Id to reuse when building a URL for `controller` without an explicit id
    pub fn reusable_id(&self, controller: &str) -> Option<EntityId> {
        match self.active_controller.as_deref() {
            Some(active) if active == controller => self.active_id,
            _ => None,
        }
    }
}
