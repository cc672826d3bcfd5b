//! Node transformers and the machinery that runs them.
//!
//! Transformers are grouped into [`TransformStage`]s. Each stage is one
//! traversal of the whole program; within a stage, transformers are ordered
//! by their `runs_after` dependencies and share the traversal through a
//! composite visitor.

pub mod control_flow;
pub mod pipeline;
pub mod string_array;
pub mod traverse;

pub use pipeline::{StagePipeline, StageVisitor};
pub use traverse::traverse;

use crate::ast::{Ast, NodeId};
use crate::error::Result;
use crate::util::{IdentifierNamesGenerator, RandomGenerator};
use std::any::Any;

/// Ordered transformation stages. Declaration order is run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransformStage {
    ControlFlowFlattening,
    StringArray,
}

impl TransformStage {
    pub const ALL: [TransformStage; 2] = [
        TransformStage::ControlFlowFlattening,
        TransformStage::StringArray,
    ];
}

/// Outcome of visiting one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorResult {
    Continue,
    /// Do not descend into the node (enter only).
    Skip,
    /// Put this node in place of the visited one.
    Replace(NodeId),
}

/// State shared by every transformer of a run.
pub struct TransformContext {
    pub ast: Ast,
    pub random: RandomGenerator,
    pub names: IdentifierNamesGenerator,
}

impl TransformContext {
    /// Names already used by the program are reserved up front.
    pub fn new(ast: Ast, seed: Option<u64>, identifiers_prefix: &str) -> Self {
        let mut names = IdentifierNamesGenerator::new(identifiers_prefix);
        names.preserve_names(ast.identifier_names());
        Self {
            ast,
            random: RandomGenerator::new(seed),
            names,
        }
    }
}

pub trait Visitor {
    fn enter(
        &mut self,
        _cx: &mut TransformContext,
        _node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        Ok(VisitorResult::Continue)
    }

    fn leave(
        &mut self,
        _cx: &mut TransformContext,
        _node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        Ok(VisitorResult::Continue)
    }
}

/// A visitor that takes part in a stage.
pub trait NodeTransformer: Visitor {
    fn name(&self) -> &'static str;

    fn stage(&self) -> TransformStage;

    /// Names of transformers of the same stage that must see each node first.
    fn runs_after(&self) -> &'static [&'static str] {
        &[]
    }

    /// Downcast access, used to collect the storages a transformer produced.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
