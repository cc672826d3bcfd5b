use super::{accessor_function, parameter, storage_call, ControlFlowReplacer};
use crate::ast::{BinaryOperator, NodeId, NodeKind};
use crate::error::Result;
use crate::storage::{ControlFlowStorage, KeyReuseIndex};
use crate::transform::TransformContext;
use tracing::trace;

/// `l <op> r` → `storage['key'](l, r)` with accessor
/// `function (a, b) { return a <op> b; }`. Sites share accessors per operator.
pub struct BinaryExpressionReplacer {
    reuse_chance: f64,
    keys: KeyReuseIndex<BinaryOperator>,
}

impl BinaryExpressionReplacer {
    pub const REUSE_CHANCE: f64 = 0.5;

    pub fn new(reuse_chance: f64) -> Self {
        Self {
            reuse_chance,
            keys: KeyReuseIndex::new(),
        }
    }
}

impl ControlFlowReplacer for BinaryExpressionReplacer {
    fn replace(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        storage: &mut ControlFlowStorage,
    ) -> Result<Option<NodeId>> {
        let NodeKind::BinaryExpression {
            operator,
            left,
            right,
        } = *cx.ast.kind(node)
        else {
            return Ok(None);
        };

        let TransformContext { ast, random, names } = cx;
        let key = self
            .keys
            .insert_or_reuse(storage, operator, self.reuse_chance, random, |random| {
                let (param_a, a) = parameter(ast, names, random);
                let (param_b, b) = parameter(ast, names, random);
                let expression = ast.binary(operator, a, b);
                Ok(accessor_function(ast, vec![param_a, param_b], expression))
            })?;

        trace!(operator = operator.as_str(), key = %key, "replaced binary expression");
        Ok(Some(storage_call(ast, storage.id(), &key, vec![left, right])))
    }
}
