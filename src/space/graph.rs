//! Built search-space instances.
//!
//! A `SearchSpace` is one throwaway instance of the space: the generating
//! function is re-invoked for every sample, so assignment state never leaks
//! between iterations. Tree positions are matched across instances by
//! parameter label, not by object identity.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, SearchError};
use crate::space::param::{ParamDomain, ParamValue};

static NEXT_SAMPLE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a parameter declared in a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub(crate) usize);

impl ParamId {
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Handle to a structural operator declared in a space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpId(pub(crate) usize);

/// Structural operator variants
#[derive(Debug, Clone)]
pub(crate) enum OpKind {
    /// Passthrough; attaches parameters and gates them on its predecessors
    Identity,
    /// Selects one branch via an implicit choice over branch indices
    Switch { selector: ParamId, branches: Vec<OpId> },
}

#[derive(Debug, Clone)]
pub(crate) struct OpNode {
    pub(crate) kind: OpKind,
    pub(crate) preds: Vec<OpId>,
    /// Set when this op is a branch of a switch: (switch, branch index)
    pub(crate) gated_by: Option<(OpId, usize)>,
}

#[derive(Debug, Clone)]
pub(crate) struct ParamNode {
    pub(crate) label: String,
    pub(crate) domain: ParamDomain,
    pub(crate) attached: Option<OpId>,
}

/// Gate state of an operator under the current assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Open,
    Closed,
    /// Branch of a switch whose selector is not assigned yet
    Undecided,
}

/// One instance of the search space DAG
#[derive(Debug, Clone)]
pub struct SearchSpace {
    sample_id: u64,
    params: Vec<ParamNode>,
    values: Vec<Option<ParamValue>>,
    ops: Vec<OpNode>,
}

impl SearchSpace {
    pub(crate) fn from_parts(params: Vec<ParamNode>, ops: Vec<OpNode>) -> Self {
        let values = vec![None; params.len()];
        Self {
            sample_id: NEXT_SAMPLE_ID.fetch_add(1, Ordering::Relaxed),
            params,
            values,
            ops,
        }
    }

    /// Unique id of this instance, used to pair `sample` with `update_result`
    pub fn sample_id(&self) -> u64 {
        self.sample_id
    }

    /// Number of declared parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn label(&self, param: ParamId) -> &str {
        &self.params[param.0].label
    }

    pub fn domain(&self, param: ParamId) -> &ParamDomain {
        &self.params[param.0].domain
    }

    pub fn value(&self, param: ParamId) -> Option<&ParamValue> {
        self.values[param.0].as_ref()
    }

    fn gate(&self, op: OpId) -> Gate {
        match self.ops[op.0].gated_by {
            None => Gate::Open,
            Some((switch, index)) => {
                let OpKind::Switch { selector, .. } = &self.ops[switch.0].kind else {
                    return Gate::Open;
                };
                match &self.values[selector.0] {
                    None => Gate::Undecided,
                    Some(ParamValue::Int(chosen)) if *chosen as usize == index => Gate::Open,
                    Some(_) => Gate::Closed,
                }
            }
        }
    }

    /// An op is satisfied when everything it gates on has been resolved:
    /// all predecessors satisfied, all attached reachable parameters
    /// assigned, and (for a switch) the selected branch satisfied.
    fn op_satisfied(&self, op: OpId) -> bool {
        match self.gate(op) {
            Gate::Closed => true,
            Gate::Undecided => false,
            Gate::Open => {
                let node = &self.ops[op.0];
                let preds_done = node.preds.iter().all(|&p| self.op_satisfied(p));
                let params_done = self
                    .params
                    .iter()
                    .enumerate()
                    .all(|(i, p)| p.attached != Some(op) || self.values[i].is_some());
                let kind_done = match &node.kind {
                    OpKind::Identity => true,
                    OpKind::Switch { selector, branches } => match &self.values[selector.0] {
                        Some(ParamValue::Int(chosen)) => branches
                            .get(*chosen as usize)
                            .is_some_and(|&b| self.op_satisfied(b)),
                        _ => false,
                    },
                };
                preds_done && params_done && kind_done
            }
        }
    }

    /// Whether the parameter counts toward `all_assigned` under the current
    /// assignments (params behind a closed switch branch do not).
    fn required(&self, param: ParamId) -> bool {
        match self.params[param.0].attached {
            None => true,
            Some(op) => self.gate(op) != Gate::Closed,
        }
    }

    fn assignable(&self, param: ParamId) -> bool {
        if self.values[param.0].is_some() {
            return false;
        }
        match self.params[param.0].attached {
            None => true,
            Some(op) => {
                self.gate(op) == Gate::Open
                    && self.ops[op.0].preds.iter().all(|&q| self.op_satisfied(q))
            }
        }
    }

    /// Next unassigned reachable parameter, in declaration order, whose
    /// structural predecessors are satisfied. `None` once all assigned.
    pub fn next_assignable(&self) -> Option<ParamId> {
        (0..self.params.len()).map(ParamId).find(|&p| self.assignable(p))
    }

    /// True iff every reachable parameter has a value
    pub fn all_assigned(&self) -> bool {
        (0..self.params.len())
            .map(ParamId)
            .all(|p| !self.required(p) || self.values[p.0].is_some())
    }

    /// Assign a concrete value; fails on re-assignment or a value outside
    /// the domain.
    pub fn assign(&mut self, param: ParamId, value: ParamValue) -> Result<()> {
        let node = &self.params[param.0];
        if self.values[param.0].is_some() {
            return Err(SearchError::AlreadyAssigned(node.label.clone()));
        }
        if !node.domain.contains(&value) {
            return Err(SearchError::InvalidValue(node.label.clone(), value.to_string()));
        }
        self.values[param.0] = Some(value);
        Ok(())
    }

    /// Ordered (label, value) pairs for every assigned parameter
    pub fn params_summary(&self) -> Vec<(String, ParamValue)> {
        self.params
            .iter()
            .zip(self.values.iter())
            .filter_map(|(p, v)| v.as_ref().map(|v| (p.label.clone(), v.clone())))
            .collect()
    }
}
