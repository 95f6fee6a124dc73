//! Trial records and the best-results ledger.

use serde::{Deserialize, Serialize};

use super::policy::OptimizeDirection;
use crate::space::ParamValue;

/// Trial status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Pending,
    Completed,
    Failed,
}

/// A single trial: one sampled configuration plus its observed score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Trial ID
    pub id: usize,
    /// Ordered (label, value) pairs of the sampled configuration
    pub params: Vec<(String, ParamValue)>,
    /// Objective score reported by the external evaluator
    pub score: f64,
    /// Trial status
    pub status: TrialStatus,
}

impl Trial {
    /// Create a new pending trial
    pub fn new(id: usize, params: Vec<(String, ParamValue)>) -> Self {
        Self { id, params, score: f64::INFINITY, status: TrialStatus::Pending }
    }

    /// Mark trial as complete with score
    pub fn complete(&mut self, score: f64) {
        self.score = score;
        self.status = TrialStatus::Completed;
    }

    /// Mark trial as failed
    pub fn fail(&mut self) {
        self.status = TrialStatus::Failed;
    }
}

/// Append-only record of every reported trial; retrieval sorts by score
/// under the configured direction.
#[derive(Debug)]
pub(crate) struct TrialLedger {
    direction: OptimizeDirection,
    trials: Vec<Trial>,
    next_id: usize,
}

impl TrialLedger {
    pub(crate) fn new(direction: OptimizeDirection) -> Self {
        Self { direction, trials: Vec::new(), next_id: 0 }
    }

    pub(crate) fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn record(&mut self, trial: Trial) {
        self.trials.push(trial);
    }

    pub(crate) fn len(&self) -> usize {
        self.trials.len()
    }

    /// Best-K completed trials, best first
    pub(crate) fn top(&self, k: usize) -> Vec<Trial> {
        let mut completed: Vec<Trial> = self
            .trials
            .iter()
            .filter(|t| t.status == TrialStatus::Completed)
            .cloned()
            .collect();
        completed.sort_by(|a, b| {
            let ordering = a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal);
            match self.direction {
                OptimizeDirection::Maximize => ordering.reverse(),
                OptimizeDirection::Minimize => ordering,
            }
        });
        completed.truncate(k);
        completed
    }
}
