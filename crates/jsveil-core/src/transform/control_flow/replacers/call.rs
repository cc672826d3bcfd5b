use super::{accessor_function, parameter, storage_call, ControlFlowReplacer};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::error::Result;
use crate::storage::{ControlFlowStorage, KeyReuseIndex};
use crate::transform::TransformContext;
use crate::util::{IdentifierNamesGenerator, RandomGenerator};
use tracing::trace;

/// Argument shape a call accessor is built for. Calls with the same shape can
/// share one accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    /// No spread argument.
    Fixed(usize),
    /// First spread argument at this position; later arguments are absorbed
    /// by the accessor's rest parameter.
    Spread(usize),
}

impl CallShape {
    fn of(ast: &Ast, arguments: &[NodeId]) -> Self {
        arguments
            .iter()
            .position(|argument| matches!(ast.kind(*argument), NodeKind::SpreadElement { .. }))
            .map_or(CallShape::Fixed(arguments.len()), CallShape::Spread)
    }
}

/// `f(a, b)` → `storage['key'](f, a, b)` with accessor
/// `function (callee, p1, p2) { return callee(p1, p2); }`.
///
/// Only plain identifier callees are handled: member callees would lose
/// their `this` binding, optional calls their short-circuit and `eval` its
/// direct-call semantics.
pub struct CallExpressionReplacer {
    reuse_chance: f64,
    keys: KeyReuseIndex<CallShape>,
}

impl CallExpressionReplacer {
    pub const REUSE_CHANCE: f64 = 0.5;

    pub fn new(reuse_chance: f64) -> Self {
        Self {
            reuse_chance,
            keys: KeyReuseIndex::new(),
        }
    }
}

/// Accessor for `shape`. Parameters declared after the first rest parameter
/// would be unreachable and are not emitted.
fn build_accessor(
    ast: &mut Ast,
    names: &mut IdentifierNamesGenerator,
    random: &mut RandomGenerator,
    shape: CallShape,
) -> NodeId {
    let (callee_param, callee) = parameter(ast, names, random);
    let (fixed, has_rest) = match shape {
        CallShape::Fixed(count) => (count, false),
        CallShape::Spread(position) => (position, true),
    };

    let mut params = vec![callee_param];
    let mut arguments = Vec::with_capacity(fixed + 1);
    for _ in 0..fixed {
        let (param, argument) = parameter(ast, names, random);
        params.push(param);
        arguments.push(argument);
    }
    if has_rest {
        let (param, argument) = parameter(ast, names, random);
        params.push(ast.rest(param));
        arguments.push(ast.spread(argument));
    }

    let call = ast.call(callee, arguments);
    accessor_function(ast, params, call)
}

impl ControlFlowReplacer for CallExpressionReplacer {
    fn replace(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        storage: &mut ControlFlowStorage,
    ) -> Result<Option<NodeId>> {
        let NodeKind::CallExpression {
            callee,
            arguments,
            optional,
        } = cx.ast.kind(node)
        else {
            return Ok(None);
        };
        if *optional {
            return Ok(None);
        }
        match cx.ast.kind(*callee).identifier_name() {
            Some(name) if name != "eval" => {}
            _ => return Ok(None),
        }

        let callee = *callee;
        let arguments = arguments.clone();
        let shape = CallShape::of(&cx.ast, &arguments);

        let TransformContext { ast, random, names } = cx;
        let key = self
            .keys
            .insert_or_reuse(storage, shape, self.reuse_chance, random, |random| {
                Ok(build_accessor(ast, names, random, shape))
            })?;

        trace!(?shape, key = %key, "replaced call expression");

        let mut call_arguments = Vec::with_capacity(arguments.len() + 1);
        call_arguments.push(callee);
        call_arguments.extend(arguments);
        Ok(Some(storage_call(ast, storage.id(), &key, call_arguments)))
    }
}
