use super::{storage_member, ControlFlowReplacer};
use crate::analysis::eligible_string_value;
use crate::ast::{Ast, NodeId, NodeKind};
use crate::error::Result;
use crate::storage::{ControlFlowStorage, KeyReuseIndex};
use crate::transform::TransformContext;
use tracing::trace;

/// `'value'` → `storage['key']`, the storage entry holding the literal itself.
/// Equal values always share one entry.
pub struct StringLiteralReplacer {
    reuse_chance: f64,
    keys: KeyReuseIndex<String>,
}

impl StringLiteralReplacer {
    pub const REUSE_CHANCE: f64 = 1.0;

    pub fn new(reuse_chance: f64) -> Self {
        Self {
            reuse_chance,
            keys: KeyReuseIndex::new(),
        }
    }
}

/// `'sum'` in `obj['sum'](...)`. Method calls are left intact by the call
/// replacer, so their property stays too.
fn is_method_name(ast: &Ast, node: NodeId) -> bool {
    let Some(member) = ast.parent(node) else {
        return false;
    };
    let NodeKind::MemberExpression {
        property,
        computed: true,
        ..
    } = *ast.kind(member)
    else {
        return false;
    };
    property == node
        && ast.parent(member).is_some_and(|call| {
            matches!(ast.kind(call), NodeKind::CallExpression { callee, .. } if *callee == member)
        })
}

impl ControlFlowReplacer for StringLiteralReplacer {
    fn replace(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        storage: &mut ControlFlowStorage,
    ) -> Result<Option<NodeId>> {
        if is_method_name(&cx.ast, node) {
            return Ok(None);
        }
        let Some(value) = eligible_string_value(&cx.ast, node).map(str::to_string) else {
            return Ok(None);
        };

        let TransformContext { ast, random, .. } = cx;
        let key = self.keys.insert_or_reuse(
            storage,
            value.clone(),
            self.reuse_chance,
            random,
            |_| Ok(ast.string_literal(value)),
        )?;

        trace!(key = %key, "replaced string literal");
        Ok(Some(storage_member(ast, storage.id(), &key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceType;

    #[test]
    fn test_computed_method_name_is_kept() {
        let mut ast = Ast::new(SourceType::Script);
        let object = ast.identifier("obj");
        let name = ast.string_literal("sum");
        let callee = ast.computed_member(object, name);
        let call = ast.call(callee, vec![]);
        let read_object = ast.identifier("obj");
        let read_name = ast.string_literal("total");
        let read = ast.computed_member(read_object, read_name);
        let array = ast.array(vec![call, read]);
        let statement = ast.expression_statement(array);
        let root = ast.root();
        ast.push_statement(root, statement).unwrap();

        assert!(is_method_name(&ast, name));
        assert!(!is_method_name(&ast, read_name));
    }
}
