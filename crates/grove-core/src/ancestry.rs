use crate::locate::{contains, find_node};
use crate::node::{NodeId, TreeNode};

/// True when `target_id` sits anywhere below `source_id`. A node is not its
/// own descendant.
///
/// Children are owned values, so a forest cannot contain a cycle and the
/// search is bounded by the size of the source subtree.
pub fn is_descendant(forest: &[TreeNode], source_id: NodeId, target_id: NodeId) -> bool {
    find_node(forest, source_id)
        .map(|source| contains(&source.children, target_id))
        .unwrap_or(false)
}
