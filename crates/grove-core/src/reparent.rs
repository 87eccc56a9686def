use std::fmt;

use tracing::{debug, instrument};

use crate::ancestry::is_descendant;
use crate::locate::{contains, find_node};
use crate::mutate::{append_child, clone_subtree, remove_node};
use crate::node::{Forest, NodeId, TreeNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    SelfDrop,
    /// The target lies inside the dragged subtree.
    CycleRejected,
    SourceMissing,
    TargetMissing,
    NothingDragged,
}

impl MoveOutcome {
    pub fn is_moved(self) -> bool {
        self == MoveOutcome::Moved
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MoveOutcome::Moved => "moved",
            MoveOutcome::SelfDrop => "dropped onto itself",
            MoveOutcome::CycleRejected => "cannot move a node into its own subtree",
            MoveOutcome::SourceMissing => "dragged node no longer exists",
            MoveOutcome::TargetMissing => "drop target no longer exists",
            MoveOutcome::NothingDragged => "nothing is being dragged",
        };
        f.write_str(text)
    }
}

/// Move `source_id` with its whole subtree under `target_id`, as the last
/// child, and expand the target.
///
/// Every rejection returns an equal copy of `forest`. Moving a node onto one
/// of its ancestors is allowed.
#[instrument(skip(forest), fields(source = %source_id, target = %target_id))]
pub fn reparent(forest: &[TreeNode], source_id: NodeId, target_id: NodeId) -> (Forest, MoveOutcome) {
    if source_id == target_id {
        return (forest.to_vec(), MoveOutcome::SelfDrop);
    }

    if is_descendant(forest, source_id, target_id) {
        return (forest.to_vec(), MoveOutcome::CycleRejected);
    }

    let Some(source) = find_node(forest, source_id) else {
        return (forest.to_vec(), MoveOutcome::SourceMissing);
    };

    // The target must exist before the source is removed.
    if !contains(forest, target_id) {
        return (forest.to_vec(), MoveOutcome::TargetMissing);
    }

    let moved = clone_subtree(source);
    let size = moved.subtree_size();
    let without = remove_node(forest, source_id);
    let next = append_child(&without, target_id, moved);
    debug!(size, "reparented subtree");
    (next, MoveOutcome::Moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::parent_of;

    struct Fixture {
        forest: Vec<TreeNode>,
        a: NodeId,
        a_child: NodeId,
        a_grandchild: NodeId,
        b: NodeId,
    }

    fn fixture() -> Fixture {
        let grandchild = TreeNode::leaf("a.1.1");
        let child = TreeNode::branch("a.1", vec![grandchild.clone()]);
        let a = TreeNode::branch("a", vec![child.clone()]);
        let b = TreeNode::leaf("b");
        let root = TreeNode::branch("root", vec![a.clone(), b.clone()]);
        Fixture {
            forest: vec![root],
            a: a.id,
            a_child: child.id,
            a_grandchild: grandchild.id,
            b: b.id,
        }
    }

    #[test]
    fn moves_subtree_under_unrelated_target() {
        let fx = fixture();
        let original = find_node(&fx.forest, fx.a).expect("a").clone();
        let old_parent = parent_of(&fx.forest, fx.a).expect("parent").id;

        let (next, outcome) = reparent(&fx.forest, fx.a, fx.b);
        assert_eq!(outcome, MoveOutcome::Moved);

        let target = find_node(&next, fx.b).expect("b");
        assert!(target.is_expanded);
        assert_eq!(target.children, vec![original]);

        let old = find_node(&next, old_parent).expect("old parent");
        assert!(old.children.iter().all(|c| c.id != fx.a));
        assert_eq!(parent_of(&next, fx.a).map(|n| n.id), Some(fx.b));
        assert_eq!(parent_of(&next, fx.a_grandchild).map(|n| n.id), Some(fx.a_child));
    }

    #[test]
    fn rejects_drop_into_own_subtree() {
        let fx = fixture();
        for target in [fx.a_child, fx.a_grandchild] {
            let (next, outcome) = reparent(&fx.forest, fx.a, target);
            assert_eq!(outcome, MoveOutcome::CycleRejected);
            assert_eq!(next, fx.forest);
        }
    }

    #[test]
    fn self_drop_is_noop() {
        let fx = fixture();
        let (next, outcome) = reparent(&fx.forest, fx.a, fx.a);
        assert_eq!(outcome, MoveOutcome::SelfDrop);
        assert_eq!(next, fx.forest);
    }

    #[test]
    fn moving_onto_ancestor_lifts_node() {
        let fx = fixture();
        let root = fx.forest[0].id;
        let (next, outcome) = reparent(&fx.forest, fx.a_grandchild, root);
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(parent_of(&next, fx.a_grandchild).map(|n| n.id), Some(root));
        assert!(find_node(&next, fx.a_child).expect("child").children.is_empty());
        assert_eq!(next[0].children.last().map(|n| n.id), Some(fx.a_grandchild));
    }

    #[test]
    fn missing_endpoints_leave_forest_alone() {
        let fx = fixture();
        let (next, outcome) = reparent(&fx.forest, NodeId::new(), fx.b);
        assert_eq!(outcome, MoveOutcome::SourceMissing);
        assert_eq!(next, fx.forest);

        let (next, outcome) = reparent(&fx.forest, fx.a, NodeId::new());
        assert_eq!(outcome, MoveOutcome::TargetMissing);
        assert_eq!(next, fx.forest);
    }

    #[test]
    fn root_can_move_under_another_tree() {
        let lone = TreeNode::leaf("lone");
        let host = TreeNode::leaf("host");
        let forest = vec![lone.clone(), host.clone()];

        let (next, outcome) = reparent(&forest, lone.id, host.id);
        assert!(outcome.is_moved());
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].children[0].id, lone.id);
    }
}
