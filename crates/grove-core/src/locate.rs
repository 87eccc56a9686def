//! Read-only searches over a forest.
//!
//! Nodes carry no parent pointers, so every lookup walks top-down from the
//! roots. Traversal order is always parent-before-child, siblings in order.

use crate::node::{NodeId, TreeNode};

/// First node with `id` in pre-order, or `None`.
pub fn find_node(forest: &[TreeNode], id: NodeId) -> Option<&TreeNode> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(forest: &[TreeNode], id: NodeId) -> bool {
    find_node(forest, id).is_some()
}

/// The node whose `children` directly hold `id`. Roots have no parent.
pub fn parent_of(forest: &[TreeNode], id: NodeId) -> Option<&TreeNode> {
    for node in forest {
        if node.children.iter().any(|child| child.id == id) {
            return Some(node);
        }
        if let Some(found) = parent_of(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Follows zero-based sibling indices from the roots down.
pub fn node_at_path<'a>(forest: &'a [TreeNode], path: &[usize]) -> Option<&'a TreeNode> {
    let (first, rest) = path.split_first()?;
    let mut current = forest.get(*first)?;
    for idx in rest {
        current = current.children.get(*idx)?;
    }
    Some(current)
}

/// Every node whose id starts with `prefix` (hex, hyphens ignored).
pub fn find_by_id_prefix<'a>(forest: &'a [TreeNode], prefix: &str) -> Vec<&'a TreeNode> {
    let needle: String = prefix
        .chars()
        .filter(|ch| *ch != '-')
        .collect::<String>()
        .to_ascii_lowercase();
    if needle.is_empty() {
        return vec![];
    }
    walk(forest)
        .filter(|(_, node)| node.id.as_uuid().simple().to_string().starts_with(&needle))
        .map(|(_, node)| node)
        .collect()
}

/// Pre-order walk of the whole forest, yielding `(depth, node)`.
pub fn walk(forest: &[TreeNode]) -> Walk<'_> {
    Walk {
        stack: forest.iter().rev().map(|node| (0, node)).collect(),
    }
}

pub struct Walk<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, current) = self.stack.pop()?;
        for child in current.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, current))
    }
}

/// A row as the tree view displays it.
#[derive(Debug, Clone)]
pub struct VisibleRow<'a> {
    /// Zero-based sibling indices from the roots.
    pub path: Vec<usize>,
    pub depth: usize,
    pub node: &'a TreeNode,
}

/// Rows in display order, descending only into expanded nodes.
pub fn visible_rows(forest: &[TreeNode]) -> Vec<VisibleRow<'_>> {
    fn collect<'a>(nodes: &'a [TreeNode], prefix: &[usize], out: &mut Vec<VisibleRow<'a>>) {
        for (idx, node) in nodes.iter().enumerate() {
            let mut path = prefix.to_vec();
            path.push(idx);
            out.push(VisibleRow {
                path: path.clone(),
                depth: prefix.len(),
                node,
            });
            if node.is_expanded {
                collect(&node.children, &path, out);
            }
        }
    }

    let mut out = Vec::new();
    collect(forest, &[], &mut out);
    out
}
