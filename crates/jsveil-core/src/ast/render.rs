//! Compact JS-like rendering of a subtree, for logs and tests.
//!
//! Not a code printer. Kinds without a rule of their own print as
//! `TypeName(child, ...)`.

use super::{Ast, Function, LiteralValue, NodeId, NodeKind};

impl Ast {
    pub fn render(&self, id: NodeId) -> String {
        let mut out = String::new();
        Renderer { ast: self, out: &mut out }.node(id);
        out
    }
}

struct Renderer<'a> {
    ast: &'a Ast,
    out: &'a mut String,
}

impl Renderer<'_> {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn list(&mut self, ids: &[NodeId], separator: &str) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            self.node(*id);
        }
    }

    fn wrapped(&mut self, id: NodeId, wrap: bool) {
        if wrap {
            self.push("(");
        }
        self.node(id);
        if wrap {
            self.push(")");
        }
    }

    /// Operand of a binary-like expression.
    fn operand(&mut self, id: NodeId) {
        let wrap = matches!(
            self.ast.kind(id),
            NodeKind::BinaryExpression { .. }
                | NodeKind::LogicalExpression { .. }
                | NodeKind::FunctionExpression(_)
        );
        self.wrapped(id, wrap);
    }

    fn infix(&mut self, left: NodeId, operator: &str, right: NodeId) {
        self.operand(left);
        self.push(" ");
        self.push(operator);
        self.push(" ");
        self.operand(right);
    }

    fn key(&mut self, key: NodeId, computed: bool) {
        if computed {
            self.push("[");
            self.node(key);
            self.push("]");
        } else {
            self.node(key);
        }
    }

    fn params_and_body(&mut self, function: &Function) {
        self.push("(");
        self.list(&function.params, ", ");
        self.push(")");
        self.node(function.body);
    }

    fn literal(&mut self, value: &LiteralValue) {
        match value {
            LiteralValue::String(value) => {
                self.push("'");
                self.push(&value.replace('\\', "\\\\").replace('\'', "\\'"));
                self.push("'");
            }
            LiteralValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                self.push(&(*value as i64).to_string());
            }
            LiteralValue::Number(value) => self.push(&value.to_string()),
            LiteralValue::Boolean(value) => self.push(&value.to_string()),
            LiteralValue::Null => self.push("null"),
        }
    }

    fn node(&mut self, id: NodeId) {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Program { body, .. } => self.list(body, "\n"),
            NodeKind::BlockStatement { body } => {
                self.push("{");
                self.list(body, "");
                self.push("}");
            }
            NodeKind::ExpressionStatement {
                directive: Some(text),
                ..
            } => {
                self.push("'");
                self.push(text);
                self.push("';");
            }
            NodeKind::ExpressionStatement { expression, .. } => {
                self.node(*expression);
                self.push(";");
            }
            NodeKind::ReturnStatement { argument } => {
                self.push("return");
                if let Some(argument) = argument {
                    self.push(" ");
                    self.node(*argument);
                }
                self.push(";");
            }
            NodeKind::VariableDeclaration { kind, declarations } => {
                self.push(kind.as_str());
                self.push(" ");
                self.list(declarations, ", ");
                self.push(";");
            }
            NodeKind::VariableDeclarator { id, init } => {
                self.node(*id);
                if let Some(init) = init {
                    self.push(" = ");
                    self.node(*init);
                }
            }
            NodeKind::FunctionDeclaration(function) | NodeKind::FunctionExpression(function) => {
                if function.is_async {
                    self.push("async ");
                }
                self.push("function");
                if let Some(id) = function.id {
                    self.push(" ");
                    self.node(id);
                }
                self.params_and_body(function);
            }
            NodeKind::ClassDeclaration { id, body, .. } => {
                self.push("class");
                if let Some(id) = id {
                    self.push(" ");
                    self.node(*id);
                }
                self.push(" {");
                self.list(body, "");
                self.push("}");
            }
            NodeKind::MethodDefinition {
                key,
                value,
                computed,
                ..
            } => {
                self.key(*key, *computed);
                match ast.kind(*value).as_function() {
                    Some(function) => self.params_and_body(function),
                    None => self.node(*value),
                }
            }
            NodeKind::ImportDeclaration { specifiers, source } => {
                self.push("import {");
                self.list(specifiers, ", ");
                self.push("} from ");
                self.node(*source);
                self.push(";");
            }
            NodeKind::ImportSpecifier {
                imported: first,
                local: second,
            }
            | NodeKind::ExportSpecifier {
                local: first,
                exported: second,
            } => {
                self.node(*first);
                if ast.kind(*first).identifier_name() != ast.kind(*second).identifier_name() {
                    self.push(" as ");
                    self.node(*second);
                }
            }
            NodeKind::ExportNamedDeclaration {
                declaration: Some(declaration),
                ..
            } => {
                self.push("export ");
                self.node(*declaration);
            }
            NodeKind::ExportNamedDeclaration {
                specifiers, source, ..
            } => {
                self.push("export {");
                self.list(specifiers, ", ");
                self.push("}");
                if let Some(source) = source {
                    self.push(" from ");
                    self.node(*source);
                }
                self.push(";");
            }
            NodeKind::ImportExpression { source } => {
                self.push("import(");
                self.node(*source);
                self.push(")");
            }
            NodeKind::Identifier { name } => self.push(name),
            NodeKind::Literal { value } => self.literal(value),
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            } => self.infix(*left, operator.as_str(), *right),
            NodeKind::LogicalExpression {
                operator,
                left,
                right,
            } => self.infix(*left, operator.as_str(), *right),
            NodeKind::UnaryExpression { operator, argument } => {
                self.push(operator.as_str());
                if operator.is_keyword() {
                    self.push(" ");
                }
                self.operand(*argument);
            }
            NodeKind::CallExpression {
                callee, arguments, ..
            } => {
                self.node(*callee);
                self.push("(");
                self.list(arguments, ", ");
                self.push(")");
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
                ..
            } => {
                self.node(*object);
                if !computed {
                    self.push(".");
                }
                self.key(*property, *computed);
            }
            NodeKind::ObjectExpression { properties } => {
                self.push("{");
                self.list(properties, ", ");
                self.push("}");
            }
            NodeKind::Property {
                key,
                value,
                computed,
                ..
            } => {
                self.key(*key, *computed);
                self.push(": ");
                self.node(*value);
            }
            NodeKind::ArrayExpression { elements } => {
                self.push("[");
                self.list(elements, ", ");
                self.push("]");
            }
            NodeKind::SpreadElement { argument } | NodeKind::RestElement { argument } => {
                self.push("...");
                self.node(*argument);
            }
            other => {
                self.push(other.type_name());
                self.push("(");
                self.list(&other.children(), ", ");
                self.push(")");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, BinaryOperator, LogicalOperator, SourceType, UnaryOperator};

    #[test]
    fn test_render_accessor_function() {
        let mut ast = Ast::new(SourceType::Script);
        let a = ast.identifier("a");
        let b = ast.identifier("b");
        let a_ref = ast.identifier("a");
        let b_ref = ast.identifier("b");
        let sum = ast.binary(BinaryOperator::Add, a_ref, b_ref);
        let ret = ast.return_statement(Some(sum));
        let body = ast.block(vec![ret]);
        let function = ast.function_expression(vec![a, b], body);

        assert_eq!(ast.render(function), "function(a, b){return a + b;}");
    }

    #[test]
    fn test_render_parenthesizes_compound_operands() {
        let mut ast = Ast::new(SourceType::Script);
        let a = ast.identifier("a");
        let b = ast.identifier("b");
        let c = ast.number_literal(2.0);
        let inner = ast.logical(LogicalOperator::Or, a, b);
        let not = ast.unary(UnaryOperator::Not, inner);
        let outer = ast.binary(BinaryOperator::Multiply, not, c);

        assert_eq!(ast.render(outer), "!(a || b) * 2");
    }

    #[test]
    fn test_render_literals() {
        let mut ast = Ast::new(SourceType::Script);
        let quoted = ast.string_literal("it's");
        let fraction = ast.number_literal(1.5);
        let typeof_ = {
            let x = ast.identifier("x");
            ast.unary(UnaryOperator::TypeOf, x)
        };

        assert_eq!(ast.render(quoted), "'it\\'s'");
        assert_eq!(ast.render(fraction), "1.5");
        assert_eq!(ast.render(typeof_), "typeof x");
    }

    #[test]
    fn test_render_storage_call_and_modules() {
        let mut ast = Ast::new(SourceType::Module);
        let storage = ast.identifier("_0xabc");
        let key = ast.string_literal("kEy12");
        let member = ast.computed_member(storage, key);
        let one = ast.number_literal(1.0);
        let call = ast.call(member, vec![one]);
        let import = ast.import_declaration(&[("foo", "bar")], "./module");

        assert_eq!(ast.render(call), "_0xabc['kEy12'](1)");
        assert_eq!(ast.render(import), "import {foo as bar} from './module';");
    }
}
