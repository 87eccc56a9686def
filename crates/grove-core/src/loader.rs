//! The child-fetch collaborator used by lazy expansion.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::node::{NodeId, TreeNode};

/// Source of children for nodes that were declared lazy.
///
/// May be called repeatedly for the same id and may fail; the expansion
/// controller reverts the node on failure.
#[async_trait]
pub trait ChildFetcher: Send + Sync {
    async fn fetch_children(&self, id: NodeId) -> anyhow::Result<Vec<TreeNode>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub latency: Duration,
    pub cache: bool,
    /// Every Nth call fails. Zero never fails.
    pub fail_every: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(800),
            cache: true,
            fail_every: 0,
        }
    }
}

impl FetchSettings {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let latency = cfg
            .get_u64("fetch.latency_ms")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.latency);
        let cache = cfg.get_bool("fetch.cache").unwrap_or(defaults.cache);
        let fail_every = cfg.get_u64("fetch.fail_every")?.unwrap_or(defaults.fail_every);
        Ok(Self {
            latency,
            cache,
            fail_every,
        })
    }
}

/// Simulated backend: answers after a fixed delay with two generated
/// children, one of them lazy again.
pub struct MockFetcher {
    settings: FetchSettings,
    answers: Mutex<HashMap<NodeId, Vec<TreeNode>>>,
    calls: AtomicU64,
}

impl MockFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        debug!(?settings, "initialized mock child fetcher");
        Self {
            settings,
            answers: Mutex::new(HashMap::new()),
            calls: AtomicU64::new(0),
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn generate() -> Vec<TreeNode> {
        vec![TreeNode::lazy("Lazy Child 1"), TreeNode::leaf("Lazy Child 2")]
    }
}

#[async_trait]
impl ChildFetcher for MockFetcher {
    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_children(&self, id: NodeId) -> anyhow::Result<Vec<TreeNode>> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        tokio::time::sleep(self.settings.latency).await;

        if self.settings.fail_every > 0 && call % self.settings.fail_every == 0 {
            return Err(anyhow!("simulated fetch failure (call {call})"));
        }

        if !self.settings.cache {
            return Ok(Self::generate());
        }

        let mut answers = self.answers.lock();
        let children = answers.entry(id).or_insert_with(Self::generate).clone();
        debug!(count = children.len(), "serving children");
        Ok(children)
    }
}
