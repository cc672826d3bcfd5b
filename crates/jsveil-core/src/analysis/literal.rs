use crate::ast::{Ast, NodeFlags, NodeId, NodeKind};

/// String literals shorter than this are never moved into a storage.
pub const MIN_STRING_LENGTH: usize = 3;

/// Whether the literal `id` sits where its lexical form matters and a call
/// expression cannot stand in for it: non-computed keys, module specifiers
/// and sources, `import()` arguments and directive prologues.
pub fn is_prohibited_literal(ast: &Ast, id: NodeId) -> bool {
    let Some(parent) = ast.parent(id) else {
        return false;
    };

    match ast.kind(parent) {
        NodeKind::Property { key, computed, .. }
        | NodeKind::MethodDefinition { key, computed, .. }
        | NodeKind::PropertyDefinition { key, computed, .. } => *key == id && !computed,
        NodeKind::ImportDeclaration { .. }
        | NodeKind::ImportSpecifier { .. }
        | NodeKind::ImportDefaultSpecifier { .. }
        | NodeKind::ExportNamedDeclaration { .. }
        | NodeKind::ExportSpecifier { .. }
        | NodeKind::ExportAllDeclaration { .. }
        | NodeKind::ImportExpression { .. } => true,
        NodeKind::ExpressionStatement { directive, .. } => directive.is_some(),
        _ => false,
    }
}

/// String value of `id` if it is a string literal that may be replaced by an
/// indirect access: attached to the tree, not in a prohibited position, not
/// emitted by a string-array call and at least [`MIN_STRING_LENGTH`] chars.
pub fn eligible_string_value(ast: &Ast, id: NodeId) -> Option<&str> {
    let value = ast.kind(id).string_value()?;
    if ast.parent(id).is_none()
        || ast.has_flags(id, NodeFlags::STRING_ARRAY_CALL_LITERAL)
        || value.chars().count() < MIN_STRING_LENGTH
        || is_prohibited_literal(ast, id)
    {
        return None;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SourceType;

    #[test]
    fn test_object_keys() {
        let mut ast = Ast::new(SourceType::Script);
        let key = ast.string_literal("plain");
        let value = ast.string_literal("value");
        let computed_key = ast.string_literal("computed");
        let other = ast.number_literal(1.0);
        let plain = ast.property(key, value);
        let computed = ast.computed_property(computed_key, other);
        let object = ast.object(vec![plain, computed]);
        let statement = ast.expression_statement(object);
        let root = ast.root();
        ast.push_statement(root, statement).unwrap();

        assert!(is_prohibited_literal(&ast, key));
        assert!(!is_prohibited_literal(&ast, value));
        assert!(!is_prohibited_literal(&ast, computed_key));
        assert_eq!(eligible_string_value(&ast, value), Some("value"));
    }

    #[test]
    fn test_module_positions_and_directives() {
        let mut ast = Ast::new(SourceType::Module);
        let import = ast.import_declaration(&[("foo", "foo")], "./foo");
        let source = ast.children(import)[1];
        let directive = ast.directive("use strict");
        let directive_literal = ast.children(directive)[0];
        let dynamic_source = ast.string_literal("./lazy");
        let dynamic = ast.import_expression(dynamic_source);

        assert!(is_prohibited_literal(&ast, source));
        assert!(is_prohibited_literal(&ast, directive_literal));
        assert!(is_prohibited_literal(&ast, dynamic_source));
        assert_eq!(ast.parent(dynamic_source), Some(dynamic));
    }

    #[test]
    fn test_short_detached_and_flagged_literals() {
        let mut ast = Ast::new(SourceType::Script);
        let short = ast.string_literal("ab");
        let flagged = ast.string_literal("flagged");
        let detached = ast.string_literal("detached");
        let array = ast.array(vec![short, flagged]);
        let statement = ast.expression_statement(array);
        let root = ast.root();
        ast.push_statement(root, statement).unwrap();
        ast.add_flags(flagged, NodeFlags::STRING_ARRAY_CALL_LITERAL);

        assert_eq!(eligible_string_value(&ast, short), None);
        assert_eq!(eligible_string_value(&ast, flagged), None);
        assert_eq!(eligible_string_value(&ast, detached), None);
    }
}
