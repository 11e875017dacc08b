//! Node identifiers for elements tracked by the registry

use slotmap::new_key_type;

new_key_type! {
    /// Key of a node in the [`ElementRegistry`](crate::ElementRegistry)
    pub struct LayoutNodeId;
}
