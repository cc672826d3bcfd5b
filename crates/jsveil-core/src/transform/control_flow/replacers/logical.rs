use super::{accessor_function, parameter, storage_call, ControlFlowReplacer};
use crate::ast::{Ast, LogicalOperator, NodeId, NodeKind};
use crate::error::Result;
use crate::storage::{ControlFlowStorage, KeyReuseIndex};
use crate::transform::TransformContext;
use tracing::trace;

/// `l && r` → `storage['key'](l, r)`.
///
/// Passing both operands as arguments evaluates them eagerly, so only
/// operands without side effects or cost are accepted.
pub struct LogicalExpressionReplacer {
    reuse_chance: f64,
    keys: KeyReuseIndex<LogicalOperator>,
}

impl LogicalExpressionReplacer {
    pub const REUSE_CHANCE: f64 = 0.5;

    pub fn new(reuse_chance: f64) -> Self {
        Self {
            reuse_chance,
            keys: KeyReuseIndex::new(),
        }
    }

    /// Operand is not a literal, identifier or object literal once unary
    /// operators are stripped.
    fn is_prohibited_operand(ast: &Ast, mut operand: NodeId) -> bool {
        while let NodeKind::UnaryExpression { argument, .. } = ast.kind(operand) {
            operand = *argument;
        }
        !matches!(
            ast.kind(operand),
            NodeKind::Literal { .. } | NodeKind::Identifier { .. } | NodeKind::ObjectExpression { .. }
        )
    }
}

impl ControlFlowReplacer for LogicalExpressionReplacer {
    fn replace(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        storage: &mut ControlFlowStorage,
    ) -> Result<Option<NodeId>> {
        let NodeKind::LogicalExpression {
            operator,
            left,
            right,
        } = *cx.ast.kind(node)
        else {
            return Ok(None);
        };
        if Self::is_prohibited_operand(&cx.ast, left) || Self::is_prohibited_operand(&cx.ast, right)
        {
            return Ok(None);
        }

        let TransformContext { ast, random, names } = cx;
        let key = self
            .keys
            .insert_or_reuse(storage, operator, self.reuse_chance, random, |random| {
                let (param_a, a) = parameter(ast, names, random);
                let (param_b, b) = parameter(ast, names, random);
                let expression = ast.logical(operator, a, b);
                Ok(accessor_function(ast, vec![param_a, param_b], expression))
            })?;

        trace!(operator = operator.as_str(), key = %key, "replaced logical expression");
        Ok(Some(storage_call(ast, storage.id(), &key, vec![left, right])))
    }
}
