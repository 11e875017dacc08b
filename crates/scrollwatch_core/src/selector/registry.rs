//! Element registry for O(1) ID-based lookups

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::geometry::ElementBounds;
use crate::node::LayoutNodeId;
use crate::watchable::{ElementResolver, WatchHandle};

use super::handle::ElementHandle;

/// Layout state the registry keeps for each node
#[derive(Debug, Clone, Copy, Default)]
struct NodeLayout {
    bounds: Option<ElementBounds>,
}

/// Registry mapping string IDs to layout nodes and their bounds
///
/// The host inserts nodes, keeps their bounds current after each layout pass,
/// and assigns string IDs. Selectors resolve through [`ElementRegistry::query`].
pub struct ElementRegistry {
    /// Node storage with the last computed bounds
    nodes: RwLock<SlotMap<LayoutNodeId, NodeLayout>>,
    /// String ID → LayoutNodeId mapping
    ids: RwLock<FxHashMap<String, LayoutNodeId>>,
    /// Reverse lookup for debugging (LayoutNodeId → String ID)
    reverse: RwLock<FxHashMap<LayoutNodeId, String>>,
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("nodes", &self.nodes.read().map(|n| n.len()).unwrap_or(0))
            .field("ids", &self.ids)
            .finish()
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(SlotMap::with_key()),
            ids: RwLock::new(FxHashMap::default()),
            reverse: RwLock::new(FxHashMap::default()),
        }
    }

    /// Create a new registry wrapped in Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Insert a node with optional initial bounds
    pub fn insert_node(&self, bounds: Option<ElementBounds>) -> LayoutNodeId {
        match self.nodes.write() {
            Ok(mut nodes) => nodes.insert(NodeLayout { bounds }),
            Err(poisoned) => poisoned.into_inner().insert(NodeLayout { bounds }),
        }
    }

    /// Update the bounds of a node after layout
    ///
    /// Returns false if the node no longer exists.
    pub fn set_bounds(&self, node_id: LayoutNodeId, bounds: ElementBounds) -> bool {
        self.nodes
            .write()
            .ok()
            .and_then(|mut nodes| nodes.get_mut(node_id).map(|n| n.bounds = Some(bounds)))
            .is_some()
    }

    /// Get the last computed bounds of a node
    pub fn bounds(&self, node_id: LayoutNodeId) -> Option<ElementBounds> {
        self.nodes.read().ok()?.get(node_id)?.bounds
    }

    /// Check if a node still exists
    pub fn node_exists(&self, node_id: LayoutNodeId) -> bool {
        self.nodes
            .read()
            .ok()
            .is_some_and(|nodes| nodes.contains_key(node_id))
    }

    /// Remove a node and any string ID pointing at it (e.g., on unmount)
    pub fn remove_node(&self, node_id: LayoutNodeId) {
        self.unregister(node_id);
        if let Ok(mut nodes) = self.nodes.write() {
            nodes.remove(node_id);
        }
    }

    // =========================================================================
    // String IDs
    // =========================================================================

    /// Register an element ID
    ///
    /// If the ID already exists, the old mapping is replaced (last-wins).
    /// In debug builds, a warning is logged for duplicate IDs.
    pub fn register(&self, id: impl Into<String>, node_id: LayoutNodeId) {
        let id = id.into();

        #[cfg(debug_assertions)]
        {
            if let Ok(ids) = self.ids.read() {
                if ids.contains_key(&id) {
                    tracing::warn!("Duplicate element ID registered: {}", id);
                }
            }
        }

        if let Ok(mut ids) = self.ids.write() {
            if let Some(previous) = ids.insert(id.clone(), node_id) {
                if previous != node_id {
                    if let Ok(mut reverse) = self.reverse.write() {
                        reverse.remove(&previous);
                    }
                }
            }
        }
        let renamed_from = match self.reverse.write() {
            Ok(mut reverse) => reverse.insert(node_id, id.clone()),
            Err(_) => None,
        };

        // A node has one ID; drop the name it was known by before
        if let Some(old_id) = renamed_from.filter(|old_id| *old_id != id) {
            if let Ok(mut ids) = self.ids.write() {
                if ids.get(&old_id) == Some(&node_id) {
                    ids.remove(&old_id);
                }
            }
        }
    }

    /// Look up a node ID by string ID
    pub fn get(&self, id: &str) -> Option<LayoutNodeId> {
        self.ids.read().ok()?.get(id).copied()
    }

    /// Look up a string ID by node ID
    pub fn get_id(&self, node_id: LayoutNodeId) -> Option<String> {
        self.reverse.read().ok()?.get(&node_id).cloned()
    }

    /// Check if an ID is registered
    pub fn contains(&self, id: &str) -> bool {
        self.ids.read().ok().is_some_and(|ids| ids.contains_key(id))
    }

    /// Get the number of registered IDs
    pub fn len(&self) -> usize {
        self.ids.read().ok().map(|ids| ids.len()).unwrap_or(0)
    }

    /// Check if the registry has no registered IDs
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the string ID of a node, keeping the node itself
    pub fn unregister(&self, node_id: LayoutNodeId) {
        let id = match self.reverse.write() {
            Ok(mut reverse) => reverse.remove(&node_id),
            Err(_) => None,
        };

        if let Some(id) = id {
            if let Ok(mut ids) = self.ids.write() {
                if ids.get(&id) == Some(&node_id) {
                    ids.remove(&id);
                }
            }
        }
    }

    /// Clear all string IDs (nodes and their bounds are kept)
    pub fn clear(&self) {
        if let Ok(mut ids) = self.ids.write() {
            ids.clear();
        }
        if let Ok(mut reverse) = self.reverse.write() {
            reverse.clear();
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Find the element matching a selector
    ///
    /// Accepts a bare ID (`"hero"`) or an ID selector (`"#hero"`). The handle
    /// captures the node the ID points at right now; re-registering the ID
    /// later does not move existing handles.
    pub fn query(self: &Arc<Self>, selector: &str) -> Option<ElementHandle> {
        let id = selector.trim();
        let id = id.strip_prefix('#').unwrap_or(id);
        if id.is_empty() {
            return None;
        }

        let node_id = self.get(id)?;
        if !self.node_exists(node_id) {
            return None;
        }
        Some(ElementHandle::new(node_id, Arc::clone(self)))
    }
}

impl ElementResolver for Arc<ElementRegistry> {
    fn resolve(&self, selector: &str) -> Option<WatchHandle> {
        let handle = self.query(selector)?;
        Some(Arc::new(handle))
    }
}
