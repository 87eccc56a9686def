//! The tree controller: one forest plus the transient UI state around it.
//!
//! Every intent replaces the forest wholesale; nothing is edited in place.

use std::fmt;

use grove_shared::{DeleteTargetDto, TreeSnapshot};
use tracing::{debug, info, instrument, warn};

use crate::expand::{self, FetchReply, FetchResolution, ToggleOutcome};
use crate::loader::ChildFetcher;
use crate::locate::{contains, find_node};
use crate::mutate::{append_child, remove_node, update_node};
use crate::node::{NodeId, TreeNode};
use crate::reparent::{MoveOutcome, reparent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub dragging: Option<NodeId>,
    pub drag_over: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: NodeId,
    pub name: String,
}

/// Transient feedback for the presentation layer. Nodes never carry error
/// state themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    FetchFailed { id: NodeId, message: String },
    MoveRejected { reason: MoveOutcome },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FetchFailed { id, message } => {
                write!(f, "could not load children of {}: {message}", id.short())
            }
            Notice::MoveRejected { reason } => write!(f, "move rejected: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeSession {
    forest: Vec<TreeNode>,
    drag: DragState,
    pending_delete: Option<DeleteTarget>,
    notices: Vec<Notice>,
}

impl TreeSession {
    pub fn new(forest: Vec<TreeNode>) -> Self {
        info!(roots = forest.len(), "tree session started");
        Self {
            forest,
            ..Self::default()
        }
    }

    pub fn forest(&self) -> &[TreeNode] {
        &self.forest
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn pending_delete(&self) -> Option<&DeleteTarget> {
        self.pending_delete.as_ref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub fn toggle(&mut self, id: NodeId) -> ToggleOutcome {
        let (next, outcome) = expand::begin_toggle(&self.forest, id);
        self.forest = next;
        outcome
    }

    #[instrument(skip(self, reply), fields(id = %reply.ticket.node_id))]
    pub fn finish_fetch(&mut self, reply: FetchReply) -> FetchResolution {
        let id = reply.ticket.node_id;
        let (next, resolution) = expand::complete_fetch(&self.forest, reply);
        self.forest = next;
        if let FetchResolution::Failed { message } = &resolution {
            self.notices.push(Notice::FetchFailed {
                id,
                message: message.clone(),
            });
        }
        resolution
    }

    /// Toggle and, if that starts a fetch, wait for it before returning.
    pub async fn toggle_and_load(&mut self, fetcher: &dyn ChildFetcher, id: NodeId) -> ToggleOutcome {
        let outcome = self.toggle(id);
        if let ToggleOutcome::Fetch(ticket) = outcome {
            let reply = expand::run_fetch(fetcher, ticket).await;
            self.finish_fetch(reply);
        }
        outcome
    }

    #[instrument(skip(self))]
    pub fn add_root(&mut self, name: &str) -> NodeId {
        let node = TreeNode::leaf(name);
        let id = node.id;
        let mut next = self.forest.clone();
        next.push(node);
        self.forest = next;
        debug!(id = %id, "added root");
        id
    }

    /// `None` when the parent does not exist.
    #[instrument(skip(self), fields(parent = %parent_id))]
    pub fn add_child(&mut self, parent_id: NodeId, name: &str) -> Option<NodeId> {
        if !contains(&self.forest, parent_id) {
            debug!("add under unknown parent ignored");
            return None;
        }
        let node = TreeNode::leaf(name);
        let id = node.id;
        self.forest = append_child(&self.forest, parent_id, node);
        debug!(id = %id, "added child");
        Some(id)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> bool {
        let found = contains(&self.forest, id);
        self.forest = update_node(&self.forest, id, |mut node| {
            node.name = new_name.to_string();
            node
        });
        found
    }

    /// Open the delete confirmation for `id`.
    #[instrument(skip(self), fields(id = %id))]
    pub fn request_remove(&mut self, id: NodeId) -> bool {
        let Some(node) = find_node(&self.forest, id) else {
            return false;
        };
        self.pending_delete = Some(DeleteTarget {
            id,
            name: node.name.clone(),
        });
        true
    }

    #[instrument(skip(self))]
    pub fn confirm_remove(&mut self) -> Option<DeleteTarget> {
        let target = self.pending_delete.take()?;
        self.forest = remove_node(&self.forest, target.id);
        if self.drag.dragging.is_some_and(|id| !contains(&self.forest, id)) {
            self.drag = DragState::default();
        } else if self.drag.drag_over.is_some_and(|id| !contains(&self.forest, id)) {
            self.drag.drag_over = None;
        }
        debug!(id = %target.id, "removed subtree");
        Some(target)
    }

    pub fn cancel_remove(&mut self) {
        self.pending_delete = None;
    }

    #[instrument(skip(self), fields(id = %id))]
    pub fn drag_start(&mut self, id: NodeId) -> bool {
        if !contains(&self.forest, id) {
            return false;
        }
        self.drag = DragState {
            dragging: Some(id),
            drag_over: None,
        };
        true
    }

    /// Highlight a prospective drop target. Hovering the dragged node itself
    /// does not count.
    pub fn drag_over(&mut self, target_id: NodeId) {
        if let Some(dragging) = self.drag.dragging
            && dragging != target_id
        {
            self.drag.drag_over = Some(target_id);
        }
    }

    pub fn drag_end(&mut self) {
        self.drag = DragState::default();
    }

    /// Drop the dragged node onto `target_id`. Drag state clears whatever
    /// the outcome.
    #[instrument(skip(self), fields(target = %target_id))]
    pub fn drop_on(&mut self, target_id: NodeId) -> MoveOutcome {
        let dragging = self.drag.dragging;
        self.drag = DragState::default();

        let Some(source_id) = dragging else {
            return MoveOutcome::NothingDragged;
        };

        let (next, outcome) = reparent(&self.forest, source_id, target_id);
        if outcome.is_moved() {
            self.forest = next;
        } else {
            warn!(source = %source_id, reason = %outcome, "drop rejected");
            if outcome != MoveOutcome::SelfDrop {
                self.notices.push(Notice::MoveRejected { reason: outcome });
            }
        }
        outcome
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            nodes: self.forest.iter().map(TreeNode::to_dto).collect(),
            dragging: self.drag.dragging.map(|id| id.as_uuid()),
            drag_over: self.drag.drag_over.map(|id| id.as_uuid()),
            pending_delete: self.pending_delete.as_ref().map(|target| DeleteTargetDto {
                id: target.id.as_uuid(),
                name: target.name.clone(),
            }),
        }
    }
}
