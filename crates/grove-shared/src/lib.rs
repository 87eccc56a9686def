use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct NodeDto {
  pub id:           Uuid,
  pub name:         String,
  #[serde(default)]
  pub children:     Vec<NodeDto>,
  #[serde(default)]
  pub is_expanded:  bool,
  #[serde(default)]
  pub is_loading:   bool,
  #[serde(default)]
  pub has_children: bool
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct DeleteTargetDto {
  pub id:   Uuid,
  pub name: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct TreeSnapshot {
  pub nodes:          Vec<NodeDto>,
  pub dragging:       Option<Uuid>,
  pub drag_over:      Option<Uuid>,
  pub pending_delete:
    Option<DeleteTargetDto>
}

impl TreeSnapshot {
  pub fn node_count(&self) -> usize {
    fn count(nodes: &[NodeDto]) -> usize {
      nodes
        .iter()
        .map(|node| {
          1 + count(&node.children)
        })
        .sum()
    }
    count(&self.nodes)
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct CardDto {
  pub id:    Uuid,
  pub title: String,
  pub color: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ColumnDto {
  pub id:    String,
  pub title: String,
  pub color: String,
  #[serde(default)]
  pub cards: Vec<CardDto>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct BoardSnapshot {
  pub columns:        Vec<ColumnDto>,
  pub dragging_card:  Option<Uuid>,
  pub drag_over_card: Option<Uuid>
}
