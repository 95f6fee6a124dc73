//! Recording scope for the space-generating function.
//!
//! `build_space` hands the generating function a fresh `SpaceBuilder` for
//! the duration of the call; every parameter and operator declared through
//! it is captured in declaration order. The scope lives only as long as the
//! call, so nothing global survives a build.

use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::space::graph::{OpId, OpKind, OpNode, ParamId, ParamNode, SearchSpace};
use crate::space::param::{param_label, ParamDomain, ParamKind, ParamValue};

/// The space-generating function. Must be referentially consistent: every
/// invocation declares the same parameters in the same order with the same
/// connectivity; only sampled values may differ between instances.
pub type SpaceFn = Arc<dyn Fn(&mut SpaceBuilder) -> Result<()> + Send + Sync>;

/// Records parameter and operator declarations during one build
#[derive(Debug, Default)]
pub struct SpaceBuilder {
    params: Vec<ParamNode>,
    ops: Vec<OpNode>,
    kind_seq: [usize; 4],
    issues: Vec<String>,
}

fn kind_index(kind: ParamKind) -> usize {
    match kind {
        ParamKind::Int => 0,
        ParamKind::Choice => 1,
        ParamKind::Bool => 2,
        ParamKind::Real => 3,
    }
}

impl SpaceBuilder {
    fn add_param(&mut self, domain: ParamDomain) -> ParamId {
        let seq = &mut self.kind_seq[kind_index(domain.kind())];
        *seq += 1;
        let label = param_label(&domain, *seq);
        self.params.push(ParamNode { label, domain, attached: None });
        ParamId(self.params.len() - 1)
    }

    /// Declare a bounded integer parameter (inclusive bounds)
    pub fn param_int(&mut self, low: i64, high: i64) -> ParamId {
        if low > high {
            self.issues.push(format!("integer bounds reversed: {low} > {high}"));
        }
        self.add_param(ParamDomain::Int { low, high })
    }

    /// Declare a categorical choice over an ordered option list
    pub fn param_choice(&mut self, options: Vec<ParamValue>) -> ParamId {
        if options.is_empty() {
            self.issues.push("choice declared with no options".to_string());
        }
        self.add_param(ParamDomain::Choice { options })
    }

    /// Declare a boolean parameter
    pub fn param_bool(&mut self) -> ParamId {
        self.add_param(ParamDomain::Bool)
    }

    /// Declare a bounded real parameter (inclusive bounds)
    pub fn param_real(&mut self, low: f64, high: f64) -> ParamId {
        if !(low.is_finite() && high.is_finite()) {
            self.issues.push(format!("real bounds not finite: {low:?}, {high:?}"));
        } else if low > high {
            self.issues.push(format!("real bounds reversed: {low:?} > {high:?}"));
        }
        self.add_param(ParamDomain::Real { low, high })
    }

    /// Declare a passthrough operator and attach the given parameters to it
    pub fn identity(&mut self, params: &[ParamId]) -> OpId {
        let op = OpId(self.ops.len());
        self.ops.push(OpNode { kind: OpKind::Identity, preds: Vec::new(), gated_by: None });
        for &p in params {
            match self.params.get_mut(p.0) {
                Some(node) if node.attached.is_none() => node.attached = Some(op),
                Some(node) => self
                    .issues
                    .push(format!("parameter {} attached to more than one operator", node.label)),
                None => self.issues.push(format!("unknown parameter handle {}", p.0)),
            }
        }
        op
    }

    /// Add a structural edge: `to` becomes assignable only after `from` is
    /// fully resolved.
    pub fn connect(&mut self, from: OpId, to: OpId) {
        if from.0 >= self.ops.len() || to.0 >= self.ops.len() {
            self.issues.push(format!("unknown operator handle in edge {} -> {}", from.0, to.0));
            return;
        }
        self.ops[to.0].preds.push(from);
    }

    /// Declare a switch over branch operators. An implicit choice parameter
    /// over branch indices decides which branch's parameters are reachable;
    /// the others are excluded from the configuration.
    pub fn module_choice(&mut self, branches: &[OpId]) -> OpId {
        if branches.is_empty() {
            self.issues.push("module_choice declared with no branches".to_string());
        }
        let options: Vec<ParamValue> =
            (0..branches.len()).map(|i| ParamValue::Int(i as i64)).collect();
        let selector = self.add_param(ParamDomain::Choice { options });

        let switch = OpId(self.ops.len());
        self.ops.push(OpNode {
            kind: OpKind::Switch { selector, branches: branches.to_vec() },
            preds: Vec::new(),
            gated_by: None,
        });
        self.params[selector.0].attached = Some(switch);

        for (index, &branch) in branches.iter().enumerate() {
            match self.ops.get_mut(branch.0) {
                Some(node) if node.gated_by.is_none() => node.gated_by = Some((switch, index)),
                Some(_) => self
                    .issues
                    .push(format!("operator {} is already a branch of another switch", branch.0)),
                None => self.issues.push(format!("unknown operator handle {}", branch.0)),
            }
        }
        switch
    }

    fn finish(self) -> Result<SearchSpace> {
        if !self.issues.is_empty() {
            return Err(SearchError::SpaceBuild(self.issues.join("; ")));
        }
        if self.params.is_empty() {
            return Err(SearchError::SpaceBuild("space declares no parameters".to_string()));
        }
        if has_cycle(&self.ops) {
            return Err(SearchError::SpaceBuild("operator graph contains a cycle".to_string()));
        }
        Ok(SearchSpace::from_parts(self.params, self.ops))
    }
}

/// Cycle check over the dependency digraph: ops depend on their
/// predecessors, switches additionally on their branches.
fn has_cycle(ops: &[OpNode]) -> bool {
    const IN_STACK: u8 = 1;
    const DONE: u8 = 2;

    fn visit(ops: &[OpNode], state: &mut [u8], i: usize) -> bool {
        match state[i] {
            IN_STACK => return true,
            DONE => return false,
            _ => {}
        }
        state[i] = IN_STACK;
        let node = &ops[i];
        let preds = node.preds.iter().map(|p| p.0);
        let branches = match &node.kind {
            OpKind::Switch { branches, .. } => branches.clone(),
            OpKind::Identity => Vec::new(),
        };
        for dep in preds.chain(branches.iter().map(|b| b.0)) {
            if visit(ops, state, dep) {
                return true;
            }
        }
        state[i] = DONE;
        false
    }

    let mut state = vec![0u8; ops.len()];
    (0..ops.len()).any(|i| visit(ops, &mut state, i))
}

/// Invoke the generating function inside a fresh recording scope and
/// return an independent, zero-assigned space instance.
pub fn build_space(space_fn: &SpaceFn) -> Result<SearchSpace> {
    let mut builder = SpaceBuilder::default();
    if let Err(e) = space_fn(&mut builder) {
        return Err(SearchError::SpaceBuild(format!("space function failed: {e}")));
    }
    builder.finish()
}
