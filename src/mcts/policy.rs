//! UCT selection policy.

use serde::{Deserialize, Serialize};

use super::node::NodeStats;

/// Whether larger or smaller rewards are better
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizeDirection {
    Maximize,
    Minimize,
}

/// Upper Confidence bound applied to Trees.
///
/// Stateless: the score is a pure function of (parent visits, child
/// statistics, exploration constant, optimize direction). A child with
/// zero visits scores infinite priority, so every known child is tried
/// once before any sibling is revisited.
#[derive(Debug, Clone, Copy)]
pub struct UctPolicy {
    /// Exploration constant (higher = more exploration)
    pub exploration_constant: f64,
    /// Optimize direction; minimizing negates the reward before scoring
    pub direction: OptimizeDirection,
}

impl UctPolicy {
    #[must_use]
    pub fn new(exploration_constant: f64, direction: OptimizeDirection) -> Self {
        Self { exploration_constant, direction }
    }

    /// UCT score of a child under its parent
    #[must_use]
    pub fn score(&self, parent_visits: usize, child: &NodeStats) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let exploitation = match self.direction {
            OptimizeDirection::Maximize => child.mean_reward,
            OptimizeDirection::Minimize => -child.mean_reward,
        };
        let exploration = self.exploration_constant
            * ((parent_visits as f64).max(1.0).ln() / child.visits as f64).sqrt();
        exploitation + exploration
    }
}
