//! The user-facing searcher: sample configurations, report scores.
//!
//! One logical tree is shared for the searcher's lifetime. `sample` and
//! `update_result` may be called from multiple threads; every sample gets
//! its own space instance, so only the tree, the pending-sample map and
//! the ledger are shared, each behind its own lock. A single coarse tree
//! lock is enough at the tree sizes this search produces.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::MctsConfig;
use super::node::NodeId;
use super::tree::MctsTree;
use super::trial::{Trial, TrialLedger};
use super::Reward;
use crate::error::{Result, SearchError};
use crate::space::{SearchSpace, SpaceFn};

/// MCTS searcher over a conditional search space
pub struct MctsSearcher {
    tree: Mutex<MctsTree>,
    /// sample_id -> node touched by that sample, consumed on report
    pending: Mutex<HashMap<u64, NodeId>>,
    ledger: Mutex<TrialLedger>,
}

impl MctsSearcher {
    /// Create a searcher with an OS-seeded generator
    pub fn new(space_fn: SpaceFn, config: MctsConfig) -> Self {
        Self::with_rng(space_fn, config, StdRng::from_os_rng())
    }

    /// Create a searcher with a seed for reproducibility
    pub fn with_seed(space_fn: SpaceFn, config: MctsConfig, seed: u64) -> Self {
        Self::with_rng(space_fn, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(space_fn: SpaceFn, config: MctsConfig, rng: StdRng) -> Self {
        let direction = config.direction;
        Self {
            tree: Mutex::new(MctsTree::new(space_fn, &config, rng)),
            pending: Mutex::new(HashMap::new()),
            ledger: Mutex::new(TrialLedger::new(direction)),
        }
    }

    /// Produce one fully assigned configuration: selection and expansion
    /// against the shared tree, then a tree-invisible rollout.
    ///
    /// `history` is an externally maintained trial record; it is accepted
    /// for forward compatibility and not consulted by the tree.
    pub fn sample(&self, history: Option<&[Trial]>) -> Result<SearchSpace> {
        let _ = history;
        let (space, node) = {
            let mut tree = self.tree.lock().unwrap_or_else(PoisonError::into_inner);
            let (space, node) = tree.selection_and_expansion()?;
            let space = tree.roll_out(space)?;
            (space, node)
        };
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(space.sample_id(), node);
        tracing::debug!(sample = space.sample_id(), node = node.value(), "sampled configuration");
        Ok(space)
    }

    /// Report the evaluator's score for a sampled configuration:
    /// back-propagates along the touched node's path and records the trial.
    pub fn update_result(&self, space: &SearchSpace, reward: Reward) -> Result<()> {
        let node = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&space.sample_id())
            .ok_or(SearchError::UnknownSample(space.sample_id()))?;

        self.tree
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back_propagation(node, reward)?;

        let trial_id = {
            let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
            let id = ledger.next_id();
            let mut trial = Trial::new(id, space.params_summary());
            trial.complete(reward);
            ledger.record(trial);
            id
        };
        tracing::info!(trial = trial_id, score = reward, "recorded trial result");
        Ok(())
    }

    /// Report that a sampled configuration could not be evaluated. The
    /// tree is left untouched; the trial is recorded as failed.
    pub fn record_failed(&self, space: &SearchSpace) -> Result<()> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&space.sample_id())
            .ok_or(SearchError::UnknownSample(space.sample_id()))?;

        let trial_id = {
            let mut ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
            let id = ledger.next_id();
            let mut trial = Trial::new(id, space.params_summary());
            trial.fail();
            ledger.record(trial);
            id
        };
        tracing::warn!(trial = trial_id, "recorded failed trial");
        Ok(())
    }

    /// Best-K reported trials, best first
    pub fn top_trials(&self, k: usize) -> Vec<Trial> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner).top(k)
    }

    /// Number of reported trials (completed and failed)
    pub fn trials_len(&self) -> usize {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Root visit count: the number of completed search cycles
    pub fn root_visits(&self) -> usize {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner).root().stats.visits
    }

    /// Number of nodes in the shared tree
    pub fn tree_size(&self) -> usize {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner).size()
    }
}
