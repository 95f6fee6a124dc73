//! Search configuration.

use serde::{Deserialize, Serialize};

use super::policy::OptimizeDirection;

/// Configuration for MCTS search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MctsConfig {
    /// Exploration constant for UCT (higher = more exploration)
    pub exploration_constant: f64,
    /// Branching-factor cap: maximum distinct children per node
    pub max_node_children: usize,
    /// Whether rewards are maximized or minimized
    pub direction: OptimizeDirection,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            max_node_children: 10,
            direction: OptimizeDirection::Maximize,
        }
    }
}
