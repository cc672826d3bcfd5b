//! Control-flow flattening.
//!
//! Every function with a block body gets its own [`ControlFlowStorage`].
//! Functions are handled on leave, so inner functions are flattened (and
//! their storages emitted) before the enclosing one. Within a body, eligible
//! expressions are replaced bottom-up: operands are rewritten before the
//! expression that uses them.
//!
//! The number of storage calls nested inside one another is bounded by
//! [`get_limit_index`] of the body's statement count. Bodies shorter than
//! [`MIN_BOUNDED_STATEMENTS`] get the bound of a body that long.

pub mod replacers;
mod storage_node;

pub use replacers::{ControlFlowReplacer, ControlFlowReplacers};
pub use storage_node::build_storage_declaration;

use crate::analysis::get_limit_index;
use crate::ast::{NodeFlags, NodeId};
use crate::error::Result;
use crate::storage::ControlFlowStorage;
use crate::transform::{
    traverse, NodeTransformer, TransformContext, TransformStage, Visitor, VisitorResult,
};
use rustc_hash::FxHashMap;
use std::any::Any;
use tracing::debug;

pub const MIN_BOUNDED_STATEMENTS: usize = 25;

/// Deepest nesting of storage calls allowed in a body of `statement_count`
/// statements.
pub fn indirection_limit(statement_count: usize) -> usize {
    get_limit_index(statement_count.max(MIN_BOUNDED_STATEMENTS))
}

pub struct FunctionControlFlowTransformer {
    threshold: f64,
    replacers: ControlFlowReplacers,
    storages: Vec<ControlFlowStorage>,
}

impl FunctionControlFlowTransformer {
    pub const NAME: &'static str = "function-control-flow";

    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            replacers: ControlFlowReplacers::new(),
            storages: Vec::new(),
        }
    }

    /// Storages emitted so far, in emission order.
    pub fn storages(&self) -> &[ControlFlowStorage] {
        &self.storages
    }

    pub fn take_storages(&mut self) -> Vec<ControlFlowStorage> {
        std::mem::take(&mut self.storages)
    }

    fn transform_function_body(&mut self, cx: &mut TransformContext, body: NodeId) -> Result<()> {
        let limit = indirection_limit(cx.ast.statement_count(body));
        let storage_id = cx.names.generate_next(&mut cx.random);
        let mut storage = ControlFlowStorage::new(storage_id);

        let mut visitor = BodyReplacer {
            body,
            threshold: self.threshold,
            limit,
            depths: FxHashMap::default(),
            replacers: &mut self.replacers,
            storage: &mut storage,
        };
        let parent = cx.ast.parent(body);
        traverse(cx, body, parent, &mut visitor)?;

        if storage.is_empty() {
            return Ok(());
        }
        let declaration = build_storage_declaration(&mut cx.ast, &storage);
        cx.ast.insert_after_directives(body, vec![declaration])?;
        debug!(
            storage = storage.id(),
            entries = storage.len(),
            limit,
            "emitted control flow storage"
        );
        self.storages.push(storage);
        Ok(())
    }
}

impl Visitor for FunctionControlFlowTransformer {
    fn enter(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        if cx
            .ast
            .has_flags(node, NodeFlags::IGNORED | NodeFlags::CONTROL_FLOW_GENERATED)
        {
            return Ok(VisitorResult::Skip);
        }
        Ok(VisitorResult::Continue)
    }

    fn leave(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        if let Some(body) = cx.ast.function_block_body(node) {
            self.transform_function_body(cx, body)?;
        }
        Ok(VisitorResult::Continue)
    }
}

impl NodeTransformer for FunctionControlFlowTransformer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> TransformStage {
        TransformStage::ControlFlowFlattening
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Applies the replacers to one function body. Nested functions with block
/// bodies are skipped: they own their storage.
struct BodyReplacer<'a> {
    body: NodeId,
    threshold: f64,
    limit: usize,
    /// Storage calls nested in each node left so far, itself included.
    depths: FxHashMap<NodeId, usize>,
    replacers: &'a mut ControlFlowReplacers,
    storage: &'a mut ControlFlowStorage,
}

impl Visitor for BodyReplacer<'_> {
    fn enter(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        if node == self.body {
            return Ok(VisitorResult::Continue);
        }
        if cx
            .ast
            .has_flags(node, NodeFlags::IGNORED | NodeFlags::CONTROL_FLOW_GENERATED)
            || cx.ast.function_block_body(node).is_some()
        {
            return Ok(VisitorResult::Skip);
        }
        Ok(VisitorResult::Continue)
    }

    fn leave(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        if node == self.body {
            return Ok(VisitorResult::Continue);
        }
        let nested = cx
            .ast
            .children(node)
            .into_iter()
            .filter_map(|child| self.depths.get(&child).copied())
            .max()
            .unwrap_or(0);

        let replacement = match self.replacers.for_kind(cx.ast.kind(node)) {
            Some(replacer)
                if nested < self.limit && cx.random.get_math_random() <= self.threshold =>
            {
                replacer.replace(cx, node, self.storage)?
            }
            _ => None,
        };

        Ok(match replacement {
            Some(replacement) => {
                self.depths.insert(replacement, nested + 1);
                VisitorResult::Replace(replacement)
            }
            None => {
                if nested > 0 {
                    self.depths.insert(node, nested);
                }
                VisitorResult::Continue
            }
        })
    }
}
