//! Node constructors.
//!
//! Used by the transformers to synthesize accessors, storages and call sites,
//! and by the test helpers in place of the external parser.

use super::{
    Ast, AssignmentOperator, BinaryOperator, Function, LiteralValue, LogicalOperator, MethodKind,
    NodeId, NodeKind, PropertyKind, UnaryOperator, VariableKind,
};

impl Ast {
    pub fn identifier(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Identifier { name: name.into() })
    }

    pub fn this_expression(&mut self) -> NodeId {
        self.alloc(NodeKind::ThisExpression)
    }

    pub fn literal(&mut self, value: LiteralValue) -> NodeId {
        self.alloc(NodeKind::Literal { value })
    }

    pub fn string_literal(&mut self, value: impl Into<String>) -> NodeId {
        self.literal(LiteralValue::String(value.into()))
    }

    pub fn number_literal(&mut self, value: f64) -> NodeId {
        self.literal(LiteralValue::Number(value))
    }

    pub fn boolean_literal(&mut self, value: bool) -> NodeId {
        self.literal(LiteralValue::Boolean(value))
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.literal(LiteralValue::Null)
    }

    pub fn binary(&mut self, operator: BinaryOperator, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::BinaryExpression {
            operator,
            left,
            right,
        })
    }

    pub fn logical(&mut self, operator: LogicalOperator, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::LogicalExpression {
            operator,
            left,
            right,
        })
    }

    pub fn unary(&mut self, operator: UnaryOperator, argument: NodeId) -> NodeId {
        self.alloc(NodeKind::UnaryExpression { operator, argument })
    }

    pub fn assignment(
        &mut self,
        operator: AssignmentOperator,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::AssignmentExpression {
            operator,
            left,
            right,
        })
    }

    pub fn conditional(&mut self, test: NodeId, consequent: NodeId, alternate: NodeId) -> NodeId {
        self.alloc(NodeKind::ConditionalExpression {
            test,
            consequent,
            alternate,
        })
    }

    pub fn call(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::CallExpression {
            callee,
            arguments,
            optional: false,
        })
    }

    pub fn optional_call(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::CallExpression {
            callee,
            arguments,
            optional: true,
        })
    }

    pub fn new_expression(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::NewExpression { callee, arguments })
    }

    /// `object.property`
    pub fn static_member(&mut self, object: NodeId, property: impl Into<String>) -> NodeId {
        let property = self.identifier(property);
        self.alloc(NodeKind::MemberExpression {
            object,
            property,
            computed: false,
            optional: false,
        })
    }

    /// `object[property]`
    pub fn computed_member(&mut self, object: NodeId, property: NodeId) -> NodeId {
        self.alloc(NodeKind::MemberExpression {
            object,
            property,
            computed: true,
            optional: false,
        })
    }

    pub fn object(&mut self, properties: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ObjectExpression { properties })
    }

    pub fn property(&mut self, key: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeKind::Property {
            key,
            value,
            computed: false,
            shorthand: false,
            kind: PropertyKind::Init,
        })
    }

    pub fn computed_property(&mut self, key: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeKind::Property {
            key,
            value,
            computed: true,
            shorthand: false,
            kind: PropertyKind::Init,
        })
    }

    /// `{ name }`: key and value are separate identifier nodes with one name.
    pub fn shorthand_property(&mut self, name: &str) -> NodeId {
        let key = self.identifier(name);
        let value = self.identifier(name);
        self.alloc(NodeKind::Property {
            key,
            value,
            computed: false,
            shorthand: true,
            kind: PropertyKind::Init,
        })
    }

    pub fn array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ArrayExpression { elements })
    }

    pub fn spread(&mut self, argument: NodeId) -> NodeId {
        self.alloc(NodeKind::SpreadElement { argument })
    }

    pub fn rest(&mut self, argument: NodeId) -> NodeId {
        self.alloc(NodeKind::RestElement { argument })
    }

    pub fn await_expression(&mut self, argument: NodeId) -> NodeId {
        self.alloc(NodeKind::AwaitExpression { argument })
    }

    pub fn import_expression(&mut self, source: NodeId) -> NodeId {
        self.alloc(NodeKind::ImportExpression { source })
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.alloc(NodeKind::ExpressionStatement {
            expression,
            directive: None,
        })
    }

    /// Directive prologue entry such as `'use strict';`.
    pub fn directive(&mut self, text: &str) -> NodeId {
        let expression = self.string_literal(text);
        self.alloc(NodeKind::ExpressionStatement {
            expression,
            directive: Some(text.to_string()),
        })
    }

    pub fn block(&mut self, body: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::BlockStatement { body })
    }

    pub fn return_statement(&mut self, argument: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::ReturnStatement { argument })
    }

    pub fn if_statement(
        &mut self,
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::IfStatement {
            test,
            consequent,
            alternate,
        })
    }

    pub fn variable_declaration(
        &mut self,
        kind: VariableKind,
        id: NodeId,
        init: Option<NodeId>,
    ) -> NodeId {
        let declarator = self.alloc(NodeKind::VariableDeclarator { id, init });
        self.alloc(NodeKind::VariableDeclaration {
            kind,
            declarations: vec![declarator],
        })
    }

    /// `var id = init;`
    pub fn var_declaration(&mut self, id: NodeId, init: Option<NodeId>) -> NodeId {
        self.variable_declaration(VariableKind::Var, id, init)
    }

    pub fn function_declaration(
        &mut self,
        id: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
        is_async: bool,
    ) -> NodeId {
        self.alloc(NodeKind::FunctionDeclaration(Function {
            id,
            params,
            body,
            is_async,
            is_generator: false,
        }))
    }

    /// Anonymous, synchronous `function (params) { ... }`.
    pub fn function_expression(&mut self, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.alloc(NodeKind::FunctionExpression(Function {
            id: None,
            params,
            body,
            is_async: false,
            is_generator: false,
        }))
    }

    pub fn async_function_expression(&mut self, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.alloc(NodeKind::FunctionExpression(Function {
            id: None,
            params,
            body,
            is_async: true,
            is_generator: false,
        }))
    }

    pub fn arrow_function(&mut self, params: Vec<NodeId>, body: NodeId, is_async: bool) -> NodeId {
        self.alloc(NodeKind::ArrowFunctionExpression(Function {
            id: None,
            params,
            body,
            is_async,
            is_generator: false,
        }))
    }

    pub fn class_declaration(
        &mut self,
        id: Option<NodeId>,
        super_class: Option<NodeId>,
        body: Vec<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::ClassDeclaration {
            id,
            super_class,
            body,
        })
    }

    pub fn method_definition(
        &mut self,
        key: NodeId,
        value: NodeId,
        computed: bool,
        kind: MethodKind,
    ) -> NodeId {
        self.alloc(NodeKind::MethodDefinition {
            key,
            value,
            computed,
            kind,
            is_static: false,
        })
    }

    pub fn property_definition(
        &mut self,
        key: NodeId,
        value: Option<NodeId>,
        computed: bool,
    ) -> NodeId {
        self.alloc(NodeKind::PropertyDefinition {
            key,
            value,
            computed,
            is_static: false,
        })
    }

    /// `import { imported as local } from 'source';` for each `(imported, local)` pair.
    pub fn import_declaration(&mut self, names: &[(&str, &str)], source: &str) -> NodeId {
        let specifiers = names
            .iter()
            .map(|(imported, local)| {
                let imported = self.identifier(*imported);
                let local = self.identifier(*local);
                self.alloc(NodeKind::ImportSpecifier { imported, local })
            })
            .collect();
        let source = self.string_literal(source);
        self.alloc(NodeKind::ImportDeclaration { specifiers, source })
    }

    pub fn import_default_declaration(&mut self, local: &str, source: &str) -> NodeId {
        let local = self.identifier(local);
        let specifier = self.alloc(NodeKind::ImportDefaultSpecifier { local });
        let source = self.string_literal(source);
        self.alloc(NodeKind::ImportDeclaration {
            specifiers: vec![specifier],
            source,
        })
    }

    /// `export { local as exported } from 'source';`, re-exporting when a source is given.
    pub fn export_named(&mut self, names: &[(&str, &str)], source: Option<&str>) -> NodeId {
        let specifiers = names
            .iter()
            .map(|(local, exported)| {
                let local = self.identifier(*local);
                let exported = self.identifier(*exported);
                self.alloc(NodeKind::ExportSpecifier { local, exported })
            })
            .collect();
        let source = source.map(|source| self.string_literal(source));
        self.alloc(NodeKind::ExportNamedDeclaration {
            declaration: None,
            specifiers,
            source,
        })
    }

    pub fn export_declaration(&mut self, declaration: NodeId) -> NodeId {
        self.alloc(NodeKind::ExportNamedDeclaration {
            declaration: Some(declaration),
            specifiers: Vec::new(),
            source: None,
        })
    }

    pub fn export_all(&mut self, source: &str) -> NodeId {
        let source = self.string_literal(source);
        self.alloc(NodeKind::ExportAllDeclaration {
            exported: None,
            source,
        })
    }
}
