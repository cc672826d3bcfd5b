use super::StringArrayTransformer;
use crate::ast::{BinaryOperator, NodeFlags, NodeId};
use crate::config::StringArrayEncoding;
use crate::error::Result;
use crate::storage::{ScopeCallsWrapperData, ScopeCallsWrappersStorage};
use crate::transform::{NodeTransformer, TransformContext, TransformStage, Visitor, VisitorResult};
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Emits the calls wrappers allocated for a lexical scope once its body has
/// been fully rewritten.
///
/// Plain wrappers alias the root accessor:
///
/// ```text
/// var w = root;
/// ```
///
/// Function wrappers take every parameter slot and forward the two that
/// matter:
///
/// ```text
/// function w(p0, p1, p2) { return root(p2 - shift, p0); }
/// ```
pub struct StringArrayScopeCallsWrapperTransformer {
    wrappers: Rc<RefCell<ScopeCallsWrappersStorage>>,
    parameters_count: usize,
}

impl StringArrayScopeCallsWrapperTransformer {
    pub const NAME: &'static str = "string-array-scope-calls-wrapper";

    pub fn new(wrappers: Rc<RefCell<ScopeCallsWrappersStorage>>, parameters_count: usize) -> Self {
        Self {
            wrappers,
            parameters_count,
        }
    }

    fn build_wrapper(
        &self,
        cx: &mut TransformContext,
        root_name: &str,
        encoding: StringArrayEncoding,
        wrapper: &ScopeCallsWrapperData,
    ) -> NodeId {
        let Some(slots) = wrapper.parameter_indexes else {
            let id = cx.ast.identifier(wrapper.name.as_str());
            let root = cx.ast.identifier(root_name);
            return cx.ast.var_declaration(id, Some(root));
        };

        let names: Vec<String> = (0..self.parameters_count)
            .map(|_| cx.names.generate_next(&mut cx.random))
            .collect();
        let ast = &mut cx.ast;
        let params = names
            .iter()
            .map(|name| ast.identifier(name.as_str()))
            .collect();

        let received = ast.identifier(names[slots.value_index_param_pos].as_str());
        let index = match wrapper.index_shift {
            0 => received,
            shift if shift > 0 => {
                let shift = ast.number_literal(shift as f64);
                ast.binary(BinaryOperator::Subtract, received, shift)
            }
            shift => {
                let shift = ast.number_literal(shift.unsigned_abs() as f64);
                ast.binary(BinaryOperator::Add, received, shift)
            }
        };
        let mut arguments = vec![index];
        if encoding == StringArrayEncoding::Rc4 {
            arguments.push(ast.identifier(names[slots.decode_key_param_pos].as_str()));
        }

        let callee = ast.identifier(root_name);
        let call = ast.call(callee, arguments);
        let return_statement = ast.return_statement(Some(call));
        let body = ast.block(vec![return_statement]);
        let id = ast.identifier(wrapper.name.as_str());
        ast.function_declaration(Some(id), params, body, false)
    }
}

impl Visitor for StringArrayScopeCallsWrapperTransformer {
    fn leave(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        if !cx.ast.is_lexical_scope_body(node) {
            return Ok(VisitorResult::Continue);
        }
        let groups = self.wrappers.borrow_mut().take_scope(node);
        if groups.is_empty() {
            return Ok(VisitorResult::Continue);
        }

        let mut declarations = Vec::new();
        for (encoding, group) in &groups {
            for wrapper in &group.wrappers {
                let declaration = self.build_wrapper(cx, &group.root_name, *encoding, wrapper);
                cx.ast.add_flags(declaration, NodeFlags::IGNORED);
                declarations.push(declaration);
            }
        }
        debug!(scope = ?node, wrappers = declarations.len(), "emitted calls wrappers");
        cx.ast.insert_after_directives(node, declarations)?;
        Ok(VisitorResult::Continue)
    }
}

impl NodeTransformer for StringArrayScopeCallsWrapperTransformer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> TransformStage {
        TransformStage::StringArray
    }

    fn runs_after(&self) -> &'static [&'static str] {
        &[StringArrayTransformer::NAME]
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, SourceType};
    use crate::storage::ParameterIndexes;

    fn context() -> TransformContext {
        let mut ast = Ast::new(SourceType::Script);
        let directive = ast.directive("use strict");
        let root = ast.root();
        ast.push_statement(root, directive).unwrap();
        TransformContext::new(ast, Some(3), "")
    }

    #[test]
    fn test_plain_wrapper_after_directives() {
        let mut cx = context();
        let root = cx.ast.root();
        let wrappers = Rc::new(RefCell::new(ScopeCallsWrappersStorage::new()));
        wrappers.borrow_mut().push(
            root,
            StringArrayEncoding::None,
            "_0xroot",
            ScopeCallsWrapperData {
                name: "_0xw".to_string(),
                index_shift: 0,
                parameter_indexes: None,
            },
        );
        let mut transformer = StringArrayScopeCallsWrapperTransformer::new(wrappers.clone(), 2);
        transformer.leave(&mut cx, root, None).unwrap();

        let statements = cx.ast.kind(root).statements().unwrap().to_vec();
        assert_eq!(statements.len(), 2);
        assert_eq!(cx.ast.render(statements[1]), "var _0xw = _0xroot;");
        assert!(cx.ast.has_flags(statements[1], NodeFlags::IGNORED));
        assert!(wrappers.borrow().is_empty());
    }

    #[test]
    fn test_function_wrapper_undoes_its_shift() {
        let mut cx = context();
        let root = cx.ast.root();
        let wrappers = Rc::new(RefCell::new(ScopeCallsWrappersStorage::new()));
        wrappers.borrow_mut().push(
            root,
            StringArrayEncoding::Rc4,
            "_0xroot",
            ScopeCallsWrapperData {
                name: "_0xw".to_string(),
                index_shift: 42,
                parameter_indexes: Some(ParameterIndexes {
                    value_index_param_pos: 2,
                    decode_key_param_pos: 0,
                }),
            },
        );
        let mut transformer = StringArrayScopeCallsWrapperTransformer::new(wrappers, 3);
        transformer.leave(&mut cx, root, None).unwrap();

        let statements = cx.ast.kind(root).statements().unwrap().to_vec();
        let rendered = cx.ast.render(statements[1]);
        let pattern = regex_lite::Regex::new(
            r"^function _0xw\((_0x\w+), _0x\w+, (_0x\w+)\)\{return _0xroot\((_0x\w+) - 42, (_0x\w+)\);\}$",
        )
        .unwrap();
        let captures = pattern
            .captures(&rendered)
            .unwrap_or_else(|| panic!("unexpected wrapper: {rendered}"));
        assert_eq!(&captures[2], &captures[3]);
        assert_eq!(&captures[1], &captures[4]);
    }
}
