use std::fmt;
use std::str::FromStr;

use grove_shared::NodeDto;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a tree node. Assigned once at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First eight hex digits, as shown next to rows in the renderer.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for NodeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,

    pub name: String,

    #[serde(default)]
    pub children: Vec<TreeNode>,

    #[serde(default)]
    pub is_expanded: bool,

    #[serde(default)]
    pub is_loading: bool,

    /// Children exist upstream but have not been fetched into `children` yet.
    #[serde(default)]
    pub has_children: bool,
}

/// A set of independent rooted trees, in display order.
pub type Forest = Vec<TreeNode>;

impl TreeNode {
    /// A fresh node with no children, as created by an explicit add.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            children: vec![],
            is_expanded: false,
            is_loading: false,
            has_children: false,
        }
    }

    /// A collapsed node whose children still have to be fetched.
    pub fn lazy(name: impl Into<String>) -> Self {
        Self {
            has_children: true,
            ..Self::leaf(name)
        }
    }

    /// An expanded node with materialized children.
    pub fn branch(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            children,
            is_expanded: true,
            ..Self::leaf(name)
        }
    }

    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Whether toggling this node must go through the child fetcher rather
    /// than a plain expand/collapse flip.
    pub fn needs_fetch(&self) -> bool {
        self.has_children && self.children.is_empty() && !self.is_expanded
    }

    /// Whether the node shows an expand affordance at all.
    pub fn is_expandable(&self) -> bool {
        self.has_children || !self.children.is_empty()
    }

    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::subtree_size)
            .sum::<usize>()
    }

    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.subtree_size());
        collect_ids(self, &mut out);
        out
    }

    pub fn to_dto(&self) -> NodeDto {
        NodeDto {
            id: self.id.as_uuid(),
            name: self.name.clone(),
            children: self.children.iter().map(TreeNode::to_dto).collect(),
            is_expanded: self.is_expanded,
            is_loading: self.is_loading,
            has_children: self.has_children,
        }
    }
}

fn collect_ids(node: &TreeNode, out: &mut Vec<NodeId>) {
    out.push(node.id);
    for child in &node.children {
        collect_ids(child, out);
    }
}
