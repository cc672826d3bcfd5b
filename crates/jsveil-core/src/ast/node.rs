//! Node taxonomy of the program tree.
//!
//! Nodes never own each other: every structural field is a [`NodeId`] handle
//! into the owning [`Ast`](super::Ast) arena, and the parent link is a plain
//! handle used only for context queries.

use super::metadata::NodeFlags;
use id_arena::Id;

/// Handle to a node stored in an [`Ast`](super::Ast).
pub type NodeId = Id<Node>;

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Syntactic parent. `None` for the program root and for detached nodes.
    pub parent: Option<NodeId>,
    pub flags: NodeFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    In,
    InstanceOf,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Equal => "==",
            NotEqual => "!=",
            StrictEqual => "===",
            StrictNotEqual => "!==",
            LessThan => "<",
            LessThanOrEqual => "<=",
            GreaterThan => ">",
            GreaterThanOrEqual => ">=",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            UnsignedShiftRight => ">>>",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Exponent => "**",
            BitwiseOr => "|",
            BitwiseXor => "^",
            BitwiseAnd => "&",
            In => "in",
            InstanceOf => "instanceof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
    NullishCoalescing,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::NullishCoalescing => "??",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    BitwiseNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::TypeOf => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            UnaryOperator::TypeOf | UnaryOperator::Void | UnaryOperator::Delete
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    OrAssign,
    AndAssign,
    NullishAssign,
}

impl AssignmentOperator {
    pub fn as_str(self) -> &'static str {
        use AssignmentOperator::*;
        match self {
            Assign => "=",
            AddAssign => "+=",
            SubtractAssign => "-=",
            MultiplyAssign => "*=",
            DivideAssign => "/=",
            ModuloAssign => "%=",
            OrAssign => "||=",
            AndAssign => "&&=",
            NullishAssign => "??=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// Shared shape of function declarations, function expressions and arrows.
#[derive(Debug, Clone)]
pub struct Function {
    pub id: Option<NodeId>,
    pub params: Vec<NodeId>,
    /// A `BlockStatement`, or any expression for concise arrow bodies.
    pub body: NodeId,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Program {
        source_type: SourceType,
        body: Vec<NodeId>,
    },
    ExpressionStatement {
        expression: NodeId,
        /// Raw directive text when the statement belongs to a directive prologue.
        directive: Option<String>,
    },
    BlockStatement {
        body: Vec<NodeId>,
    },
    ReturnStatement {
        argument: Option<NodeId>,
    },
    IfStatement {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    VariableDeclaration {
        kind: VariableKind,
        declarations: Vec<NodeId>,
    },
    VariableDeclarator {
        id: NodeId,
        init: Option<NodeId>,
    },
    FunctionDeclaration(Function),
    FunctionExpression(Function),
    ArrowFunctionExpression(Function),
    ClassDeclaration {
        id: Option<NodeId>,
        super_class: Option<NodeId>,
        body: Vec<NodeId>,
    },
    MethodDefinition {
        key: NodeId,
        value: NodeId,
        computed: bool,
        kind: MethodKind,
        is_static: bool,
    },
    PropertyDefinition {
        key: NodeId,
        value: Option<NodeId>,
        computed: bool,
        is_static: bool,
    },
    ImportDeclaration {
        specifiers: Vec<NodeId>,
        source: NodeId,
    },
    ImportSpecifier {
        imported: NodeId,
        local: NodeId,
    },
    ImportDefaultSpecifier {
        local: NodeId,
    },
    ExportNamedDeclaration {
        declaration: Option<NodeId>,
        specifiers: Vec<NodeId>,
        source: Option<NodeId>,
    },
    ExportSpecifier {
        local: NodeId,
        exported: NodeId,
    },
    ExportAllDeclaration {
        exported: Option<NodeId>,
        source: NodeId,
    },
    ImportExpression {
        source: NodeId,
    },
    Identifier {
        name: String,
    },
    ThisExpression,
    Literal {
        value: LiteralValue,
    },
    BinaryExpression {
        operator: BinaryOperator,
        left: NodeId,
        right: NodeId,
    },
    LogicalExpression {
        operator: LogicalOperator,
        left: NodeId,
        right: NodeId,
    },
    UnaryExpression {
        operator: UnaryOperator,
        argument: NodeId,
    },
    AssignmentExpression {
        operator: AssignmentOperator,
        left: NodeId,
        right: NodeId,
    },
    ConditionalExpression {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    CallExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
        optional: bool,
    },
    NewExpression {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    MemberExpression {
        object: NodeId,
        property: NodeId,
        computed: bool,
        optional: bool,
    },
    ObjectExpression {
        properties: Vec<NodeId>,
    },
    Property {
        key: NodeId,
        value: NodeId,
        computed: bool,
        shorthand: bool,
        kind: PropertyKind,
    },
    ArrayExpression {
        elements: Vec<NodeId>,
    },
    SpreadElement {
        argument: NodeId,
    },
    RestElement {
        argument: NodeId,
    },
    AwaitExpression {
        argument: NodeId,
    },
}

/// Calls `$f` on every child slot of `$kind` in source order. Binding modes
/// make the slots `&NodeId` or `&mut NodeId` depending on how `$kind` is
/// borrowed, so one body serves both traversal directions.
macro_rules! for_each_slot {
    ($kind:expr, $f:ident) => {
        match $kind {
            NodeKind::Program { body, .. } | NodeKind::BlockStatement { body } => {
                for id in body {
                    $f(id);
                }
            }
            NodeKind::ExpressionStatement { expression, .. } => $f(expression),
            NodeKind::ReturnStatement { argument } => {
                if let Some(id) = argument {
                    $f(id);
                }
            }
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                $f(test);
                $f(consequent);
                if let Some(id) = alternate {
                    $f(id);
                }
            }
            NodeKind::VariableDeclaration { declarations, .. } => {
                for id in declarations {
                    $f(id);
                }
            }
            NodeKind::VariableDeclarator { id, init } => {
                $f(id);
                if let Some(init) = init {
                    $f(init);
                }
            }
            NodeKind::FunctionDeclaration(Function {
                id, params, body, ..
            })
            | NodeKind::FunctionExpression(Function {
                id, params, body, ..
            })
            | NodeKind::ArrowFunctionExpression(Function {
                id, params, body, ..
            }) => {
                if let Some(id) = id {
                    $f(id);
                }
                for id in params {
                    $f(id);
                }
                $f(body);
            }
            NodeKind::ClassDeclaration {
                id,
                super_class,
                body,
            } => {
                if let Some(id) = id {
                    $f(id);
                }
                if let Some(id) = super_class {
                    $f(id);
                }
                for id in body {
                    $f(id);
                }
            }
            NodeKind::MethodDefinition { key, value, .. } => {
                $f(key);
                $f(value);
            }
            NodeKind::PropertyDefinition { key, value, .. } => {
                $f(key);
                if let Some(id) = value {
                    $f(id);
                }
            }
            NodeKind::ImportDeclaration { specifiers, source } => {
                for id in specifiers {
                    $f(id);
                }
                $f(source);
            }
            NodeKind::ImportSpecifier { imported, local } => {
                $f(imported);
                $f(local);
            }
            NodeKind::ImportDefaultSpecifier { local } => $f(local),
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
            } => {
                if let Some(id) = declaration {
                    $f(id);
                }
                for id in specifiers {
                    $f(id);
                }
                if let Some(id) = source {
                    $f(id);
                }
            }
            NodeKind::ExportSpecifier { local, exported } => {
                $f(local);
                $f(exported);
            }
            NodeKind::ExportAllDeclaration { exported, source } => {
                if let Some(id) = exported {
                    $f(id);
                }
                $f(source);
            }
            NodeKind::ImportExpression { source } => $f(source),
            NodeKind::Identifier { .. } | NodeKind::ThisExpression | NodeKind::Literal { .. } => {}
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. } => {
                $f(left);
                $f(right);
            }
            NodeKind::UnaryExpression { argument, .. }
            | NodeKind::SpreadElement { argument }
            | NodeKind::RestElement { argument }
            | NodeKind::AwaitExpression { argument } => $f(argument),
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                $f(test);
                $f(consequent);
                $f(alternate);
            }
            NodeKind::CallExpression {
                callee, arguments, ..
            }
            | NodeKind::NewExpression { callee, arguments } => {
                $f(callee);
                for id in arguments {
                    $f(id);
                }
            }
            NodeKind::MemberExpression {
                object, property, ..
            } => {
                $f(object);
                $f(property);
            }
            NodeKind::ObjectExpression { properties } => {
                for id in properties {
                    $f(id);
                }
            }
            NodeKind::Property { key, value, .. } => {
                $f(key);
                $f(value);
            }
            NodeKind::ArrayExpression { elements } => {
                for id in elements {
                    $f(id);
                }
            }
        }
    };
}

impl NodeKind {
    /// Child handles in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut push = |id: &NodeId| children.push(*id);
        for_each_slot!(self, push);
        children
    }

    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut NodeId)) {
        let mut visit = |id: &mut NodeId| f(id);
        for_each_slot!(self, visit);
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::BlockStatement { .. } => "BlockStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableDeclarator { .. } => "VariableDeclarator",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            NodeKind::ClassDeclaration { .. } => "ClassDeclaration",
            NodeKind::MethodDefinition { .. } => "MethodDefinition",
            NodeKind::PropertyDefinition { .. } => "PropertyDefinition",
            NodeKind::ImportDeclaration { .. } => "ImportDeclaration",
            NodeKind::ImportSpecifier { .. } => "ImportSpecifier",
            NodeKind::ImportDefaultSpecifier { .. } => "ImportDefaultSpecifier",
            NodeKind::ExportNamedDeclaration { .. } => "ExportNamedDeclaration",
            NodeKind::ExportSpecifier { .. } => "ExportSpecifier",
            NodeKind::ExportAllDeclaration { .. } => "ExportAllDeclaration",
            NodeKind::ImportExpression { .. } => "ImportExpression",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::NewExpression { .. } => "NewExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::ObjectExpression { .. } => "ObjectExpression",
            NodeKind::Property { .. } => "Property",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::SpreadElement { .. } => "SpreadElement",
            NodeKind::RestElement { .. } => "RestElement",
            NodeKind::AwaitExpression { .. } => "AwaitExpression",
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            NodeKind::FunctionDeclaration(function)
            | NodeKind::FunctionExpression(function)
            | NodeKind::ArrowFunctionExpression(function) => Some(function),
            _ => None,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match self {
            NodeKind::Literal {
                value: LiteralValue::String(value),
            } => Some(value),
            _ => None,
        }
    }

    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Statement list of a program or block.
    pub fn statements(&self) -> Option<&[NodeId]> {
        match self {
            NodeKind::Program { body, .. } | NodeKind::BlockStatement { body } => Some(body),
            _ => None,
        }
    }

    pub fn statements_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Program { body, .. } | NodeKind::BlockStatement { body } => Some(body),
            _ => None,
        }
    }
}
