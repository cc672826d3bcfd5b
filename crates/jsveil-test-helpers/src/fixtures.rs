//! Fixture programs.
//!
//! Each builder documents the JavaScript it stands for. Function fixtures
//! return the function's block body so tests can render just that part.

use jsveil_core::ast::{BinaryOperator, LogicalOperator, MethodKind};
use jsveil_core::{Ast, NodeId, SourceType};

/// Parse a compact argument list: `...x` is a spread, numbers are numeric
/// literals, `'text'` is a string literal, anything else an identifier.
pub fn arguments(ast: &mut Ast, args: &[&str]) -> Vec<NodeId> {
    args.iter()
        .map(|arg| {
            if let Some(name) = arg.strip_prefix("...") {
                let argument = ast.identifier(name);
                ast.spread(argument)
            } else if let Ok(number) = arg.parse::<f64>() {
                ast.number_literal(number)
            } else if let Some(text) = arg.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
                ast.string_literal(text)
            } else {
                ast.identifier(*arg)
            }
        })
        .collect()
}

/// `var v0 = 0; var v1 = 1; ...`
fn padding(ast: &mut Ast, count: usize) -> Vec<NodeId> {
    (0..count)
        .map(|i| {
            let id = ast.identifier(format!("v{i}"));
            let init = ast.number_literal(i as f64);
            ast.var_declaration(id, Some(init))
        })
        .collect()
}

/// `function <name>() { <padding> <statements> }` at program level.
pub fn function_program(
    name: &str,
    padding_count: usize,
    statements: impl FnOnce(&mut Ast) -> Vec<NodeId>,
) -> (Ast, NodeId) {
    let mut ast = Ast::new(SourceType::Script);
    let mut body = padding(&mut ast, padding_count);
    body.extend(statements(&mut ast));
    let body = ast.block(body);
    let id = ast.identifier(name);
    let function = ast.function_declaration(Some(id), vec![], body, false);
    let root = ast.root();
    ast.push_statement(root, function).expect("program accepts statements");
    (ast, body)
}

/// `function test() { <padding> callee(<args>); ... }` with `count` calls.
pub fn function_with_calls(
    callee: &str,
    args: &[&str],
    count: usize,
    padding_count: usize,
) -> (Ast, NodeId) {
    function_program("test", padding_count, |ast| {
        (0..count)
            .map(|_| {
                let callee = ast.identifier(callee);
                let arguments = arguments(ast, args);
                let call = ast.call(callee, arguments);
                ast.expression_statement(call)
            })
            .collect()
    })
}

/// `function test() { <padding> obj['sum'](1, 2); }`
pub fn function_with_member_call(padding_count: usize) -> (Ast, NodeId) {
    function_program("test", padding_count, |ast| {
        let object = ast.identifier("obj");
        let property = ast.string_literal("sum");
        let callee = ast.computed_member(object, property);
        let arguments = arguments(ast, &["1", "2"]);
        let call = ast.call(callee, arguments);
        vec![ast.expression_statement(call)]
    })
}

/// `function test() { <padding> return a + b; }`
pub fn function_with_binary(padding_count: usize) -> (Ast, NodeId) {
    function_program("test", padding_count, |ast| {
        let a = ast.identifier("a");
        let b = ast.identifier("b");
        let sum = ast.binary(BinaryOperator::Add, a, b);
        vec![ast.return_statement(Some(sum))]
    })
}

/// `function test() { <padding> return a && b; }`, or `return a.b && c;`
/// when `member_operand` is set.
pub fn function_with_logical(member_operand: bool, padding_count: usize) -> (Ast, NodeId) {
    function_program("test", padding_count, |ast| {
        let (left, right) = if member_operand {
            let object = ast.identifier("a");
            (ast.static_member(object, "b"), ast.identifier("c"))
        } else {
            (ast.identifier("a"), ast.identifier("b"))
        };
        let logical = ast.logical(LogicalOperator::And, left, right);
        vec![ast.return_statement(Some(logical))]
    })
}

/// `function test() { <padding> var s = 'string literal'; return s + 'string literal'; }`
pub fn function_with_strings(padding_count: usize) -> (Ast, NodeId) {
    function_program("test", padding_count, |ast| {
        let id = ast.identifier("s");
        let init = ast.string_literal("string literal");
        let declaration = ast.var_declaration(id, Some(init));
        let s = ast.identifier("s");
        let literal = ast.string_literal("string literal");
        let sum = ast.binary(BinaryOperator::Add, s, literal);
        vec![declaration, ast.return_statement(Some(sum))]
    })
}

/// `function test() { var s = 'string literal'; return foo(a + b - c, a && b, s); }`
pub fn function_with_mixed_expressions() -> (Ast, NodeId) {
    function_program("test", 0, |ast| {
        let id = ast.identifier("s");
        let init = ast.string_literal("string literal");
        let declaration = ast.var_declaration(id, Some(init));

        let a = ast.identifier("a");
        let b = ast.identifier("b");
        let sum = ast.binary(BinaryOperator::Add, a, b);
        let c = ast.identifier("c");
        let difference = ast.binary(BinaryOperator::Subtract, sum, c);
        let a = ast.identifier("a");
        let b = ast.identifier("b");
        let both = ast.logical(LogicalOperator::And, a, b);
        let s = ast.identifier("s");
        let callee = ast.identifier("foo");
        let call = ast.call(callee, vec![difference, both, s]);
        vec![declaration, ast.return_statement(Some(call))]
    })
}

/// ```js
/// 'use strict';
/// import {foo as bar} from './module';
/// var config = {'name': 'value', key: 'second'};
/// class Widget { 'render'() {} }
/// var lazy = import('./lazy');
/// var greeting = 'hello world';
/// export {bar as baz} from './reexported';
/// ```
pub fn module_program() -> Ast {
    let mut ast = Ast::new(SourceType::Module);
    let mut body = vec![
        ast.directive("use strict"),
        ast.import_declaration(&[("foo", "bar")], "./module"),
    ];

    let name_key = ast.string_literal("name");
    let name_value = ast.string_literal("value");
    let name = ast.property(name_key, name_value);
    let key_key = ast.identifier("key");
    let key_value = ast.string_literal("second");
    let key = ast.property(key_key, key_value);
    let object = ast.object(vec![name, key]);
    let config = ast.identifier("config");
    body.push(ast.var_declaration(config, Some(object)));

    let method_key = ast.string_literal("render");
    let method_body = ast.block(vec![]);
    let method_value = ast.function_expression(vec![], method_body);
    let method = ast.method_definition(method_key, method_value, false, MethodKind::Method);
    let class_id = ast.identifier("Widget");
    body.push(ast.class_declaration(Some(class_id), None, vec![method]));

    let lazy_source = ast.string_literal("./lazy");
    let import = ast.import_expression(lazy_source);
    let lazy = ast.identifier("lazy");
    body.push(ast.var_declaration(lazy, Some(import)));

    let greeting_value = ast.string_literal("hello world");
    let greeting = ast.identifier("greeting");
    body.push(ast.var_declaration(greeting, Some(greeting_value)));

    body.push(ast.export_named(&[("bar", "baz")], Some("./reexported")));

    let root = ast.root();
    for statement in body {
        ast.push_statement(root, statement).expect("program accepts statements");
    }
    ast
}

/// ```js
/// var top = 'alpha';
/// function outer() {
///     var first = 'beta';
///     var second = 'beta';
///     function inner() { return 'gamma'; }
///     return 'alpha';
/// }
/// ```
///
/// Returns the program with the bodies of `outer` and `inner`.
pub fn nested_scopes_program() -> (Ast, NodeId, NodeId) {
    let mut ast = Ast::new(SourceType::Script);

    let gamma = ast.string_literal("gamma");
    let inner_return = ast.return_statement(Some(gamma));
    let inner_body = ast.block(vec![inner_return]);
    let inner_id = ast.identifier("inner");
    let inner = ast.function_declaration(Some(inner_id), vec![], inner_body, false);

    let mut outer_statements = Vec::new();
    for name in ["first", "second"] {
        let id = ast.identifier(name);
        let init = ast.string_literal("beta");
        outer_statements.push(ast.var_declaration(id, Some(init)));
    }
    outer_statements.push(inner);
    let alpha = ast.string_literal("alpha");
    outer_statements.push(ast.return_statement(Some(alpha)));
    let outer_body = ast.block(outer_statements);
    let outer_id = ast.identifier("outer");
    let outer = ast.function_declaration(Some(outer_id), vec![], outer_body, false);

    let top_id = ast.identifier("top");
    let top_init = ast.string_literal("alpha");
    let top = ast.var_declaration(top_id, Some(top_init));

    let root = ast.root();
    ast.push_statement(root, top).expect("program accepts statements");
    ast.push_statement(root, outer).expect("program accepts statements");
    (ast, outer_body, inner_body)
}

/// ```js
/// async function load() { return 'inside async'; }
/// var sync = 'outside async';
/// ```
pub fn async_program() -> Ast {
    let mut ast = Ast::new(SourceType::Script);
    let inside = ast.string_literal("inside async");
    let return_statement = ast.return_statement(Some(inside));
    let body = ast.block(vec![return_statement]);
    let id = ast.identifier("load");
    let load = ast.function_declaration(Some(id), vec![], body, true);

    let outside = ast.string_literal("outside async");
    let sync = ast.identifier("sync");
    let declaration = ast.var_declaration(sync, Some(outside));

    let root = ast.root();
    ast.push_statement(root, load).expect("program accepts statements");
    ast.push_statement(root, declaration).expect("program accepts statements");
    ast
}

/// `var s0 = 'string_0'; var s1 = 'string_1'; ...`
pub fn many_strings_program(count: usize) -> Ast {
    let mut ast = Ast::new(SourceType::Script);
    let root = ast.root();
    for i in 0..count {
        let id = ast.identifier(format!("s{i}"));
        let init = ast.string_literal(format!("string_{i}"));
        let declaration = ast.var_declaration(id, Some(init));
        ast.push_statement(root, declaration).expect("program accepts statements");
    }
    ast
}
