//! Expand/collapse with on-demand child loading.
//!
//! A toggle either flips `is_expanded` on the spot or marks the node as
//! loading and hands back a [`FetchTicket`]. The ticket is redeemed with
//! [`complete_fetch`] once the fetcher answers, against whatever forest is
//! current by then.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::loader::ChildFetcher;
use crate::locate::find_node;
use crate::mutate::update_node;
use crate::node::{Forest, NodeId, TreeNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub node_id: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    NotFound,
    /// A fetch is already outstanding for the node.
    Busy,
    Flipped { expanded: bool },
    Fetch(FetchTicket),
}

#[derive(Debug)]
pub struct FetchReply {
    pub ticket: FetchTicket,
    pub result: anyhow::Result<Vec<TreeNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResolution {
    Loaded { count: usize },
    Failed { message: String },
    /// The node disappeared while the fetch was in flight.
    Stale,
}

#[instrument(skip(forest), fields(id = %id))]
pub fn begin_toggle(forest: &[TreeNode], id: NodeId) -> (Forest, ToggleOutcome) {
    let Some(node) = find_node(forest, id) else {
        debug!("toggle on unknown node");
        return (forest.to_vec(), ToggleOutcome::NotFound);
    };

    if node.is_loading {
        debug!("toggle ignored while loading");
        return (forest.to_vec(), ToggleOutcome::Busy);
    }

    if node.needs_fetch() {
        let next = update_node(forest, id, |mut n| {
            n.is_loading = true;
            n
        });
        debug!("starting child fetch");
        return (next, ToggleOutcome::Fetch(FetchTicket { node_id: id }));
    }

    let expanded = !node.is_expanded;
    let next = update_node(forest, id, |mut n| {
        n.is_expanded = expanded;
        n
    });
    debug!(expanded, "toggled");
    (next, ToggleOutcome::Flipped { expanded })
}

/// Apply a fetch result to the current forest.
///
/// On success the fetched children come first, followed by anything that was
/// added or dropped onto the node while it was loading.
#[instrument(skip(forest, reply), fields(id = %reply.ticket.node_id))]
pub fn complete_fetch(forest: &[TreeNode], reply: FetchReply) -> (Forest, FetchResolution) {
    let id = reply.ticket.node_id;
    if find_node(forest, id).is_none() {
        debug!("fetch resolved for a node that no longer exists");
        return (forest.to_vec(), FetchResolution::Stale);
    }

    match reply.result {
        Ok(mut fetched) => {
            let count = fetched.len();
            let next = update_node(forest, id, move |mut n| {
                fetched.append(&mut n.children);
                n.children = fetched;
                n.is_expanded = true;
                n.is_loading = false;
                n.has_children = false;
                n
            });
            debug!(count, "children loaded");
            (next, FetchResolution::Loaded { count })
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "child fetch failed; node stays collapsed");
            let next = update_node(forest, id, |mut n| {
                n.is_loading = false;
                n
            });
            (
                next,
                FetchResolution::Failed {
                    message: format!("{err:#}"),
                },
            )
        }
    }
}

pub async fn run_fetch(fetcher: &dyn ChildFetcher, ticket: FetchTicket) -> FetchReply {
    let result = fetcher.fetch_children(ticket.node_id).await;
    FetchReply { ticket, result }
}

/// Run the fetch for `ticket` on the runtime, delivering the reply through `set`.
pub fn spawn_fetch(set: &mut JoinSet<FetchReply>, fetcher: Arc<dyn ChildFetcher>, ticket: FetchTicket) {
    set.spawn(async move { run_fetch(fetcher.as_ref(), ticket).await });
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    fn lazy_forest() -> (Vec<TreeNode>, NodeId) {
        let x = TreeNode::lazy("X");
        let id = x.id;
        (vec![TreeNode::branch("root", vec![x])], id)
    }

    #[test]
    fn lazy_toggle_then_success_then_collapse() {
        let (forest, x) = lazy_forest();

        let (loading, outcome) = begin_toggle(&forest, x);
        assert_eq!(outcome, ToggleOutcome::Fetch(FetchTicket { node_id: x }));
        let node = find_node(&loading, x).expect("x");
        assert!(node.is_loading);
        assert!(!node.is_expanded);

        let y = TreeNode::leaf("Y");
        let z = TreeNode::leaf("Z");
        let reply = FetchReply {
            ticket: FetchTicket { node_id: x },
            result: Ok(vec![y.clone(), z.clone()]),
        };
        let (loaded, resolution) = complete_fetch(&loading, reply);
        assert_eq!(resolution, FetchResolution::Loaded { count: 2 });
        let node = find_node(&loaded, x).expect("x");
        assert_eq!(node.children, vec![y, z]);
        assert!(node.is_expanded);
        assert!(!node.is_loading);
        assert!(!node.has_children);

        let (collapsed, outcome) = begin_toggle(&loaded, x);
        assert_eq!(outcome, ToggleOutcome::Flipped { expanded: false });
        let node = find_node(&collapsed, x).expect("x");
        assert!(!node.is_expanded);
        assert_eq!(node.children.len(), 2);
    }

    #[test]
    fn failed_fetch_restores_starting_shape() {
        let (forest, x) = lazy_forest();
        let (loading, _) = begin_toggle(&forest, x);

        let reply = FetchReply {
            ticket: FetchTicket { node_id: x },
            result: Err(anyhow!("backend down")),
        };
        let (reverted, resolution) = complete_fetch(&loading, reply);
        assert!(matches!(resolution, FetchResolution::Failed { ref message } if message.contains("backend down")));
        assert_eq!(reverted, forest);
    }

    #[test]
    fn toggle_while_loading_is_ignored() {
        let (forest, x) = lazy_forest();
        let (loading, _) = begin_toggle(&forest, x);
        let (same, outcome) = begin_toggle(&loading, x);
        assert_eq!(outcome, ToggleOutcome::Busy);
        assert_eq!(same, loading);
    }

    #[test]
    fn plain_nodes_flip_without_fetch() {
        let leaf = TreeNode::leaf("empty");
        let id = leaf.id;
        let forest = vec![leaf];

        let (opened, outcome) = begin_toggle(&forest, id);
        assert_eq!(outcome, ToggleOutcome::Flipped { expanded: true });
        let (closed, outcome) = begin_toggle(&opened, id);
        assert_eq!(outcome, ToggleOutcome::Flipped { expanded: false });
        assert_eq!(closed, forest);
    }

    #[test]
    fn unknown_node_and_stale_reply_are_noops() {
        let (forest, x) = lazy_forest();
        let (same, outcome) = begin_toggle(&forest, NodeId::new());
        assert_eq!(outcome, ToggleOutcome::NotFound);
        assert_eq!(same, forest);

        let (loading, _) = begin_toggle(&forest, x);
        let removed = crate::mutate::remove_node(&loading, x);
        let reply = FetchReply {
            ticket: FetchTicket { node_id: x },
            result: Ok(vec![TreeNode::leaf("late")]),
        };
        let (after, resolution) = complete_fetch(&removed, reply);
        assert_eq!(resolution, FetchResolution::Stale);
        assert_eq!(after, removed);
    }

    #[test]
    fn children_added_while_loading_are_kept() {
        let (forest, x) = lazy_forest();
        let (loading, _) = begin_toggle(&forest, x);
        let extra = TreeNode::leaf("extra");
        let extra_id = extra.id;
        let loading = crate::mutate::append_child(&loading, x, extra);

        let fetched = TreeNode::leaf("fetched");
        let fetched_id = fetched.id;
        let reply = FetchReply {
            ticket: FetchTicket { node_id: x },
            result: Ok(vec![fetched]),
        };
        let (loaded, _) = complete_fetch(&loading, reply);
        let ids: Vec<_> = find_node(&loaded, x)
            .expect("x")
            .children
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![fetched_id, extra_id]);
    }
}
