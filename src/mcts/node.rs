//! Node types and statistics for the Monte Carlo tree.
//!
//! Nodes live in an arena owned by the tree; parent links are index-based
//! back-references used only for the upward back-propagation walk.

use crate::space::ParamValue;

/// Unique identifier for nodes in the search tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Creates a new NodeId
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the underlying id value
    #[must_use]
    pub const fn value(&self) -> usize {
        self.0
    }
}

/// Visit and reward statistics for a node
#[derive(Debug, Clone, Default)]
pub struct NodeStats {
    /// Total visits to this node
    pub visits: usize,
    /// Total accumulated reward
    pub total_reward: f64,
    /// Mean reward (total_reward / visits)
    pub mean_reward: f64,
}

impl NodeStats {
    /// Update statistics with a new reward
    pub fn update(&mut self, reward: f64) {
        self.visits += 1;
        self.total_reward += reward;
        self.mean_reward = self.total_reward / self.visits as f64;
    }
}

/// A node in the search tree: one (parameter label, candidate value)
/// choice at its depth. The root carries neither.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Unique identifier
    pub id: NodeId,
    /// Label of the parameter this node was expanded from (None for root)
    pub label: Option<String>,
    /// Candidate value chosen at this position (None for root)
    pub value: Option<ParamValue>,
    /// Parent node id (None for root)
    pub parent: Option<NodeId>,
    /// Child node ids, in creation order
    pub children: Vec<NodeId>,
    /// Statistics for this node
    pub stats: NodeStats,
}

impl MctsNode {
    /// Create the root node
    #[must_use]
    pub fn root() -> Self {
        Self {
            id: NodeId::new(0),
            label: None,
            value: None,
            parent: None,
            children: Vec::new(),
            stats: NodeStats::default(),
        }
    }

    /// Create a child node for a previously untried candidate value
    #[must_use]
    pub fn child(id: NodeId, label: String, value: ParamValue, parent: NodeId) -> Self {
        Self {
            id,
            label: Some(label),
            value: Some(value),
            parent: Some(parent),
            children: Vec::new(),
            stats: NodeStats::default(),
        }
    }

    /// Returns true if this node is a leaf (no children)
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this node holds the given candidate value
    #[must_use]
    pub fn matches_value(&self, value: &ParamValue) -> bool {
        self.value.as_ref() == Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_node_id_creation() {
        let id = NodeId::new(42);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_node_stats_default() {
        let stats = NodeStats::default();
        assert_eq!(stats.visits, 0);
        assert_eq!(stats.total_reward, 0.0);
        assert_eq!(stats.mean_reward, 0.0);
    }

    #[test]
    fn test_node_stats_update() {
        let mut stats = NodeStats::default();
        stats.update(1.0);
        assert_eq!(stats.visits, 1);
        assert_eq!(stats.total_reward, 1.0);
        assert_eq!(stats.mean_reward, 1.0);

        stats.update(0.0);
        assert_eq!(stats.visits, 2);
        assert_eq!(stats.total_reward, 1.0);
        assert_eq!(stats.mean_reward, 0.5);
    }

    #[test]
    fn test_root_creation() {
        let node = MctsNode::root();
        assert_eq!(node.id, NodeId::new(0));
        assert!(node.label.is_none());
        assert!(node.value.is_none());
        assert!(node.parent.is_none());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_child_creation() {
        let node = MctsNode::child(
            NodeId::new(1),
            "Param_Int_1-1-100".to_string(),
            ParamValue::Int(42),
            NodeId::new(0),
        );
        assert_eq!(node.id, NodeId::new(1));
        assert_eq!(node.label.as_deref(), Some("Param_Int_1-1-100"));
        assert_eq!(node.parent, Some(NodeId::new(0)));
        assert!(node.matches_value(&ParamValue::Int(42)));
        assert!(!node.matches_value(&ParamValue::Int(43)));
    }

    proptest! {
        #[test]
        fn test_stats_update_invariants(rewards in prop::collection::vec(0.0f64..=1.0, 1..100)) {
            let mut stats = NodeStats::default();

            for r in &rewards {
                stats.update(*r);
            }

            prop_assert_eq!(stats.visits, rewards.len());
            prop_assert!((stats.total_reward - rewards.iter().sum::<f64>()).abs() < 1e-10);
            prop_assert!((stats.mean_reward - rewards.iter().sum::<f64>() / rewards.len() as f64).abs() < 1e-10);
        }
    }
}
