use crate::ast::{Ast, NodeFlags, NodeId};
use crate::storage::ControlFlowStorage;

/// `var <id> = { '<key>': <accessor>, ... };`, flagged so the control-flow
/// stage leaves it alone. Later stages still see its values.
pub fn build_storage_declaration(ast: &mut Ast, storage: &ControlFlowStorage) -> NodeId {
    let properties = storage
        .iter()
        .map(|(key, accessor)| {
            let key = ast.string_literal(key);
            ast.property(key, accessor)
        })
        .collect::<Vec<_>>();
    let object = ast.object(properties);
    let id = ast.identifier(storage.id());
    let declaration = ast.var_declaration(id, Some(object));
    ast.add_flags(declaration, NodeFlags::CONTROL_FLOW_GENERATED);
    declaration
}
