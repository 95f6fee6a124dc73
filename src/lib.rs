//! buscar: Monte Carlo Tree Search over conditional hyperparameter spaces.
//!
//! # Overview
//!
//! A search space is a DAG of typed parameters (integer, choice, boolean,
//! real) and structural operators whose connectivity decides which
//! parameter is revealed next: later parameters may only become
//! assignable, or reachable at all, because of earlier choices. The
//! searcher builds a Monte Carlo tree isomorphic to that assignment order
//! and balances exploration against exploitation with a UCT policy.
//!
//! Each iteration samples one fully assigned configuration, hands it to an
//! external trainer/evaluator, and feeds the scalar score back:
//!
//! ```
//! use std::sync::Arc;
//! use buscar::{MctsConfig, MctsSearcher, SpaceBuilder};
//!
//! let space_fn: buscar::SpaceFn = Arc::new(|s: &mut SpaceBuilder| {
//!     let lr = s.param_real(1e-4, 1e-1);
//!     let layers = s.param_int(1, 8);
//!     let head = s.identity(&[lr]);
//!     let tail = s.identity(&[layers]);
//!     s.connect(head, tail);
//!     Ok(())
//! });
//!
//! let searcher = MctsSearcher::with_seed(space_fn, MctsConfig::default(), 42);
//!
//! let sample = searcher.sample(None)?;
//! assert!(sample.all_assigned());
//! // ... train and evaluate the configuration externally ...
//! searcher.update_result(&sample, 0.83)?;
//! assert_eq!(searcher.top_trials(1).len(), 1);
//! # Ok::<(), buscar::SearchError>(())
//! ```
//!
//! The space-generating function is re-invoked for every sample, so each
//! configuration lives in its own throwaway instance; tree positions are
//! matched across instances by deterministic parameter labels.

pub mod error;
pub mod mcts;
pub mod space;

pub use error::{Result, SearchError};
pub use mcts::{
    MctsConfig, MctsNode, MctsSearcher, MctsTree, NodeId, NodeStats, OptimizeDirection, Reward,
    Trial, TrialStatus, UctPolicy,
};
pub use space::{
    build_space, OpId, ParamDomain, ParamId, ParamKind, ParamValue, SearchSpace, SpaceBuilder,
    SpaceFn,
};
