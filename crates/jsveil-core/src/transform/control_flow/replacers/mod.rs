//! Per-expression-kind rewrite rules for control-flow flattening.
//!
//! A replacer moves the invariant shape of an expression into an accessor
//! stored in the function's [`ControlFlowStorage`] and returns an indirect
//! call through the storage. Replacers are stateless apart from their
//! [`KeyReuseIndex`](crate::storage::KeyReuseIndex), which decides when call
//! sites share an accessor.

mod binary;
mod call;
mod logical;
mod string_literal;

pub use binary::BinaryExpressionReplacer;
pub use call::{CallExpressionReplacer, CallShape};
pub use logical::LogicalExpressionReplacer;
pub use string_literal::StringLiteralReplacer;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::error::Result;
use crate::storage::ControlFlowStorage;
use crate::transform::TransformContext;
use crate::util::{IdentifierNamesGenerator, RandomGenerator};

pub trait ControlFlowReplacer {
    /// Replacement for `node`, or `None` when the node is ineligible and must
    /// stay as it is.
    fn replace(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        storage: &mut ControlFlowStorage,
    ) -> Result<Option<NodeId>>;
}

/// The replacer set used by one control-flow transformer.
pub struct ControlFlowReplacers {
    binary: BinaryExpressionReplacer,
    logical: LogicalExpressionReplacer,
    call: CallExpressionReplacer,
    string_literal: StringLiteralReplacer,
}

impl ControlFlowReplacers {
    pub fn new() -> Self {
        Self {
            binary: BinaryExpressionReplacer::new(BinaryExpressionReplacer::REUSE_CHANCE),
            logical: LogicalExpressionReplacer::new(LogicalExpressionReplacer::REUSE_CHANCE),
            call: CallExpressionReplacer::new(CallExpressionReplacer::REUSE_CHANCE),
            string_literal: StringLiteralReplacer::new(StringLiteralReplacer::REUSE_CHANCE),
        }
    }

    /// Replacer handling nodes of this kind, if any.
    pub fn for_kind(&mut self, kind: &NodeKind) -> Option<&mut dyn ControlFlowReplacer> {
        match kind {
            NodeKind::BinaryExpression { .. } => Some(&mut self.binary),
            NodeKind::LogicalExpression { .. } => Some(&mut self.logical),
            NodeKind::CallExpression { .. } => Some(&mut self.call),
            NodeKind::Literal { .. } if kind.string_value().is_some() => {
                Some(&mut self.string_literal)
            }
            _ => None,
        }
    }
}

impl Default for ControlFlowReplacers {
    fn default() -> Self {
        Self::new()
    }
}

/// `<storage>['<key>']`
pub(super) fn storage_member(ast: &mut Ast, storage_id: &str, key: &str) -> NodeId {
    let object = ast.identifier(storage_id);
    let property = ast.string_literal(key);
    ast.computed_member(object, property)
}

/// `<storage>['<key>'](arguments...)`
pub(super) fn storage_call(
    ast: &mut Ast,
    storage_id: &str,
    key: &str,
    arguments: Vec<NodeId>,
) -> NodeId {
    let callee = storage_member(ast, storage_id, key);
    ast.call(callee, arguments)
}

/// `function (<params>) { return <expression>; }`
pub(super) fn accessor_function(ast: &mut Ast, params: Vec<NodeId>, expression: NodeId) -> NodeId {
    let ret = ast.return_statement(Some(expression));
    let body = ast.block(vec![ret]);
    ast.function_expression(params, body)
}

/// Fresh parameter name, as a (declaration, reference) identifier pair.
pub(super) fn parameter(
    ast: &mut Ast,
    names: &mut IdentifierNamesGenerator,
    random: &mut RandomGenerator,
) -> (NodeId, NodeId) {
    let name = names.generate_next(random);
    (ast.identifier(name.as_str()), ast.identifier(name))
}
