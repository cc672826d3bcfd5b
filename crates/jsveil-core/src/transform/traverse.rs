use super::{TransformContext, Visitor, VisitorResult};
use crate::ast::NodeId;
use crate::error::{Result, TransformError};

/// Depth-first enter/leave walk starting at `node`.
///
/// Children are snapshotted before descending, so nodes a visitor inserts
/// into a statement list are not visited by the same walk. A `Replace` puts
/// the new node into the parent's slot; on enter the replacement is not
/// descended into. Returns the node that occupies the slot afterwards.
pub fn traverse(
    cx: &mut TransformContext,
    node: NodeId,
    parent: Option<NodeId>,
    visitor: &mut dyn Visitor,
) -> Result<NodeId> {
    match visitor.enter(cx, node, parent)? {
        VisitorResult::Continue => {}
        VisitorResult::Skip => return Ok(node),
        VisitorResult::Replace(replacement) => return replace(cx, parent, node, replacement),
    }

    for child in cx.ast.children(node) {
        traverse(cx, child, Some(node), visitor)?;
    }

    match visitor.leave(cx, node, parent)? {
        VisitorResult::Replace(replacement) => replace(cx, parent, node, replacement),
        VisitorResult::Continue | VisitorResult::Skip => Ok(node),
    }
}

fn replace(
    cx: &mut TransformContext,
    parent: Option<NodeId>,
    node: NodeId,
    replacement: NodeId,
) -> Result<NodeId> {
    if replacement == node {
        return Ok(node);
    }
    let parent = parent.ok_or_else(|| {
        TransformError::invariant(format!(
            "cannot replace parentless `{}` node",
            cx.ast.kind(node).type_name()
        ))
    })?;
    cx.ast.replace_child(parent, node, replacement)?;
    Ok(replacement)
}
