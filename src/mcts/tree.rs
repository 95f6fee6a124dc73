//! The Monte Carlo tree: selection, expansion, rollout, back-propagation.
//!
//! Tree depth mirrors the assignment order of the space: the node at depth
//! `d` holds a candidate value for the `d`-th parameter revealed while
//! walking a fresh space instance. Children are revealed lazily (a node's
//! branching factor is unknown until visits sample new candidate values)
//! and capped by `max_node_children`.

use rand::rngs::StdRng;

use super::config::MctsConfig;
use super::node::{MctsNode, NodeId};
use super::policy::UctPolicy;
use super::Reward;
use crate::error::{Result, SearchError};
use crate::space::{build_space, ParamValue, SearchSpace, SpaceFn};

/// Monte Carlo tree over configurations of one search space
pub struct MctsTree {
    /// All nodes indexed by NodeId
    nodes: Vec<MctsNode>,
    root_id: NodeId,
    space_fn: SpaceFn,
    policy: UctPolicy,
    max_node_children: usize,
    rng: StdRng,
}

impl MctsTree {
    pub fn new(space_fn: SpaceFn, config: &MctsConfig, rng: StdRng) -> Self {
        Self {
            nodes: vec![MctsNode::root()],
            root_id: NodeId::new(0),
            space_fn,
            policy: UctPolicy::new(config.exploration_constant, config.direction),
            max_node_children: config.max_node_children,
            rng,
        }
    }

    /// Get the root node
    #[must_use]
    pub fn root(&self) -> &MctsNode {
        &self.nodes[self.root_id.value()]
    }

    /// Get a node by id
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&MctsNode> {
        self.nodes.get(id.value())
    }

    /// Get number of nodes in the tree
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// UCT-best existing child; ties keep the first-created child
    fn best_child(&self, parent: NodeId) -> Option<NodeId> {
        let node = &self.nodes[parent.value()];
        let parent_visits = node.stats.visits;
        let mut best: Option<(NodeId, f64)> = None;
        for &child in &node.children {
            let score = self.policy.score(parent_visits, &self.nodes[child.value()].stats);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((child, score));
            }
        }
        best.map(|(id, _)| id)
    }

    fn child_with_value(&self, parent: NodeId, value: &ParamValue) -> Option<NodeId> {
        self.nodes[parent.value()]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.value()].matches_value(value))
    }

    /// Walk the tree from the root along a fresh space instance, descending
    /// through known children until a new candidate value is introduced
    /// (expansion) or the space runs out of assignable parameters.
    ///
    /// Returns the partially assigned space and the node touched this
    /// cycle: the expansion point, or the last node reached when the
    /// branch cap blocked expansion along the whole path.
    pub fn selection_and_expansion(&mut self) -> Result<(SearchSpace, NodeId)> {
        let mut space = build_space(&self.space_fn)?;
        let mut current = self.root_id;

        while let Some(position) = space.next_assignable() {
            let child_count = self.nodes[current.value()].children.len();

            if child_count >= self.max_node_children {
                // Branch cap reached: exploit among known children.
                let Some(chosen) = self.best_child(current) else {
                    // a cap of zero leaves nothing to descend into;
                    // rollout covers the remaining parameters
                    break;
                };
                let chosen_node = &self.nodes[chosen.value()];
                if chosen_node.label.as_deref() != Some(space.label(position)) {
                    return Err(SearchError::TreeConsistency(format!(
                        "node {} holds {:?} but the graph position is {}",
                        chosen.value(),
                        chosen_node.label,
                        space.label(position),
                    )));
                }
                let value = chosen_node.value.clone().ok_or_else(|| {
                    SearchError::TreeConsistency(format!(
                        "non-root node {} carries no value",
                        chosen.value()
                    ))
                })?;
                space.assign(position, value)?;
                current = chosen;
                continue;
            }

            // Below the cap: draw a candidate for this position. Continuous
            // domains practically never repeat a draw, so they expand a
            // fresh child on essentially every visit until the cap bites.
            let value = space.domain(position).sample(&mut self.rng);

            if let Some(existing) = self.child_with_value(current, &value) {
                // Candidate already known at this position; descend.
                space.assign(position, value)?;
                current = existing;
                continue;
            }

            let id = NodeId::new(self.nodes.len());
            let label = space.label(position).to_string();
            self.nodes.push(MctsNode::child(id, label, value.clone(), current));
            self.nodes[current.value()].children.push(id);
            space.assign(position, value)?;
            return Ok((space, id));
        }

        Ok((space, current))
    }

    /// Complete the remaining assignments by independent uniform sampling.
    /// No tree nodes are created or consulted.
    pub fn roll_out(&mut self, mut space: SearchSpace) -> Result<SearchSpace> {
        while let Some(position) = space.next_assignable() {
            let value = space.domain(position).sample(&mut self.rng);
            space.assign(position, value)?;
        }
        if !space.all_assigned() {
            return Err(SearchError::SpaceBuild(
                "no assignable parameter left but the space is incomplete".to_string(),
            ));
        }
        Ok(space)
    }

    /// Update visit/reward statistics from `node` up to the root inclusive
    pub fn back_propagation(&mut self, node: NodeId, reward: Reward) -> Result<()> {
        let mut current = Some(node);
        let mut last = node;
        let mut steps = 0usize;

        while let Some(id) = current {
            if steps > self.nodes.len() {
                return Err(SearchError::TreeConsistency(format!(
                    "parent chain from node {} does not terminate",
                    node.value()
                )));
            }
            let n = self.nodes.get_mut(id.value()).ok_or_else(|| {
                SearchError::TreeConsistency(format!("node {} outside arena", id.value()))
            })?;
            n.stats.update(reward);
            last = id;
            current = n.parent;
            steps += 1;
        }

        if last != self.root_id {
            return Err(SearchError::TreeConsistency(format!(
                "parent chain from node {} ended at {} instead of the root",
                node.value(),
                last.value()
            )));
        }
        Ok(())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::mcts::policy::OptimizeDirection;
    use proptest::prelude::*;
    use rand::SeedableRng;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_visit_counts_conserved(cycles in 1usize..40, cap in 1usize..6, seed in 0u64..1000) {
            let config = MctsConfig {
                max_node_children: cap,
                direction: OptimizeDirection::Maximize,
                ..Default::default()
            };
            let mut tree = MctsTree::new(
                super::tests::chain_space_fn(),
                &config,
                StdRng::seed_from_u64(seed),
            );

            for i in 0..cycles {
                let (space, node) = tree.selection_and_expansion().unwrap();
                let space = tree.roll_out(space).unwrap();
                prop_assert!(space.all_assigned());
                tree.back_propagation(node, (i % 10) as f64 / 10.0).unwrap();
            }

            prop_assert_eq!(tree.root().stats.visits, cycles);
            for id in 0..tree.size() {
                let node = tree.get(NodeId::new(id)).unwrap();
                let child_visits: usize = node
                    .children
                    .iter()
                    .map(|&c| tree.get(c).unwrap().stats.visits)
                    .sum();
                prop_assert!(node.stats.visits >= child_visits);
                prop_assert!(node.children.len() <= cap);
            }
        }
    }
}
