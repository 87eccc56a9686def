//! Structural mutators. Each takes the current forest by reference and returns
//! a new one; the input is never modified.

use crate::node::{NodeId, TreeNode};

/// Replace the first node matching `id` with `transform(node)`.
///
/// Unknown ids return an equal copy of the input.
pub fn update_node<F>(forest: &[TreeNode], id: NodeId, transform: F) -> Vec<TreeNode>
where
    F: FnOnce(TreeNode) -> TreeNode,
{
    let mut transform = Some(transform);
    update_in(forest, id, &mut transform)
}

fn update_in<F>(nodes: &[TreeNode], id: NodeId, transform: &mut Option<F>) -> Vec<TreeNode>
where
    F: FnOnce(TreeNode) -> TreeNode,
{
    nodes
        .iter()
        .map(|node| {
            if node.id == id
                && let Some(apply) = transform.take()
            {
                return apply(node.clone());
            }
            if transform.is_none() || node.children.is_empty() {
                return node.clone();
            }
            TreeNode {
                children: update_in(&node.children, id, transform),
                ..node.clone_shallow()
            }
        })
        .collect()
}

/// Drop every node matching `id`, together with its subtree, at any depth.
pub fn remove_node(forest: &[TreeNode], id: NodeId) -> Vec<TreeNode> {
    forest
        .iter()
        .filter(|node| node.id != id)
        .map(|node| TreeNode {
            children: remove_node(&node.children, id),
            ..node.clone_shallow()
        })
        .collect()
}

/// Independent deep copy of `node` and all descendants, flags included.
pub fn clone_subtree(node: &TreeNode) -> TreeNode {
    TreeNode {
        children: node.children.iter().map(clone_subtree).collect(),
        ..node.clone_shallow()
    }
}

/// Append `child` to the node matching `parent_id` and expand it so the new
/// child is visible.
pub fn append_child(forest: &[TreeNode], parent_id: NodeId, child: TreeNode) -> Vec<TreeNode> {
    update_node(forest, parent_id, move |mut parent| {
        parent.children.push(child);
        parent.is_expanded = true;
        parent
    })
}

impl TreeNode {
    /// Copy of the node's own fields with no children.
    pub(crate) fn clone_shallow(&self) -> TreeNode {
        TreeNode {
            id: self.id,
            name: self.name.clone(),
            children: Vec::new(),
            is_expanded: self.is_expanded,
            is_loading: self.is_loading,
            has_children: self.has_children,
        }
    }
}
