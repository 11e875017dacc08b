//! Element handle for resolved native elements

use std::sync::Arc;

use crate::geometry::ElementBounds;
use crate::node::LayoutNodeId;
use crate::watchable::Watchable;

use super::registry::ElementRegistry;

/// Handle to a queried element
///
/// Returned by [`ElementRegistry::query`]. The handle pins the node that the
/// selector matched at query time; it reads that node's bounds live but never
/// follows the string ID to a different node.
#[derive(Clone)]
pub struct ElementHandle {
    node_id: LayoutNodeId,
    registry: Arc<ElementRegistry>,
}

impl ElementHandle {
    pub(crate) fn new(node_id: LayoutNodeId, registry: Arc<ElementRegistry>) -> Self {
        Self { node_id, registry }
    }

    /// Get the underlying layout node ID
    pub fn node_id(&self) -> LayoutNodeId {
        self.node_id
    }

    /// Get the string ID of this element (if still registered)
    pub fn id(&self) -> Option<String> {
        self.registry.get_id(self.node_id)
    }

    /// Check whether the node is still part of the registry
    pub fn is_attached(&self) -> bool {
        self.registry.node_exists(self.node_id)
    }
}

impl std::fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementHandle")
            .field("node_id", &self.node_id)
            .field("id", &self.id())
            .finish()
    }
}

impl Watchable for ElementHandle {
    fn bounds(&self) -> Option<ElementBounds> {
        self.registry.bounds(self.node_id)
    }

    fn label(&self) -> Option<String> {
        self.id()
    }
}
