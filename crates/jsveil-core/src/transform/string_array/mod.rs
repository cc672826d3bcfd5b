//! String-array extraction.
//!
//! On entering the program the whole tree is analysed once: selected
//! literals become items of a single [`StringArrayStorage`], which is then
//! shuffled and rotated. The traversal that follows replaces each selected
//! literal with a call through either the root accessor of its encoding or a
//! calls wrapper local to the enclosing lexical scope. Wrapper declarations
//! are emitted by [`StringArrayScopeCallsWrapperTransformer`] when the scope
//! body is left.

mod call_node;
mod scope_calls_wrapper;

pub use call_node::{build_string_array_call, CallTarget};
pub use scope_calls_wrapper::StringArrayScopeCallsWrapperTransformer;

use crate::analysis::{StringArrayAnalysis, StringArrayStorageAnalyzer};
use crate::ast::{NodeFlags, NodeId, NodeKind};
use crate::config::{ObfuscatorConfig, StringArrayEncoding, StringArrayWrappersType};
use crate::error::{Result, TransformError};
use crate::storage::{
    LexicalScopeStack, LiteralCache, LiteralCacheKey, ParameterIndexes, ScopeCallsWrapperData,
    ScopeCallsWrappersStorage, StringArrayStorage,
};
use crate::transform::{NodeTransformer, TransformContext, TransformStage, Visitor, VisitorResult};
use indexmap::IndexMap;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

const MIN_INDEX_SHIFT: i64 = 100;
const MAX_INDEX_SHIFT: i64 = 1000;
const MAX_WRAPPER_INDEX_SHIFT: i64 = 1000;

#[derive(Debug, Clone)]
pub struct StringArrayOptions {
    pub threshold: f64,
    pub encodings: Vec<StringArrayEncoding>,
    pub index_shift: bool,
    pub rotate: bool,
    pub shuffle: bool,
    pub wrappers_count: usize,
    pub wrappers_type: StringArrayWrappersType,
    pub wrappers_parameters_max_count: usize,
    pub skip_async_functions: bool,
}

impl From<&ObfuscatorConfig> for StringArrayOptions {
    fn from(config: &ObfuscatorConfig) -> Self {
        Self {
            threshold: config.string_array_threshold,
            encodings: config.encodings(),
            index_shift: config.string_array_index_shift,
            rotate: config.string_array_rotate,
            shuffle: config.string_array_shuffle,
            wrappers_count: config.string_array_wrappers_count,
            wrappers_type: config.string_array_wrappers_type,
            wrappers_parameters_max_count: config.string_array_wrappers_parameters_max_count,
            skip_async_functions: config.string_array_skip_async_functions,
        }
    }
}

pub struct StringArrayTransformer {
    options: StringArrayOptions,
    storage: Option<StringArrayStorage>,
    analysis: StringArrayAnalysis,
    scopes: LexicalScopeStack,
    wrappers: Rc<RefCell<ScopeCallsWrappersStorage>>,
    cache: LiteralCache,
}

impl StringArrayTransformer {
    pub const NAME: &'static str = "string-array";

    pub fn new(
        options: StringArrayOptions,
        wrappers: Rc<RefCell<ScopeCallsWrappersStorage>>,
    ) -> Self {
        Self {
            options,
            storage: None,
            analysis: StringArrayAnalysis::default(),
            scopes: LexicalScopeStack::new(),
            wrappers,
            cache: LiteralCache::new(),
        }
    }

    pub fn storage(&self) -> Option<&StringArrayStorage> {
        self.storage.as_ref()
    }

    pub fn take_storage(&mut self) -> Option<StringArrayStorage> {
        self.storage.take()
    }

    /// Build the storage and select its items. Called on entering the program.
    pub fn prepare(&mut self, cx: &mut TransformContext) -> Result<()> {
        let storage_name = cx.names.generate_for_global_scope(&mut cx.random);
        let root_wrapper_names: IndexMap<StringArrayEncoding, String> = self
            .options
            .encodings
            .iter()
            .map(|encoding| {
                (
                    *encoding,
                    cx.names.generate_for_global_scope(&mut cx.random),
                )
            })
            .collect();
        let index_shift = if self.options.index_shift {
            cx.random.get_random_integer(MIN_INDEX_SHIFT, MAX_INDEX_SHIFT)
        } else {
            0
        };
        let mut storage = StringArrayStorage::new(storage_name, root_wrapper_names, index_shift);

        let analyzer = StringArrayStorageAnalyzer::new(
            self.options.threshold,
            self.options.encodings.clone(),
            self.options.skip_async_functions,
        );
        self.analysis = analyzer.analyze(&cx.ast, &mut storage, &mut cx.random);

        if self.options.shuffle {
            storage.shuffle(&mut cx.random);
        }
        if self.options.rotate {
            storage.rotate(&mut cx.random);
        }
        debug!(
            storage = storage.storage_name(),
            items = storage.len(),
            index_shift,
            rotation = storage.rotation_amount(),
            "prepared string array"
        );
        self.storage = Some(storage);
        Ok(())
    }

    /// Replacement for a literal selected by the analysis, `None` for any
    /// other literal.
    fn transform_literal(&mut self, cx: &mut TransformContext, node: NodeId) -> Result<Option<NodeId>> {
        let Some((value, encoding)) = self.analysis.item_key(node) else {
            return Ok(None);
        };
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| TransformError::invariant("string array used before preparation"))?;
        let item = storage
            .get(value, encoding)
            .cloned()
            .ok_or_else(|| {
                TransformError::invariant(format!("no string array item for `{value}`"))
            })?;
        let storage_index_shift = storage.index_shift_amount();

        let scope = if self.options.wrappers_count > 0 {
            Some(self.scopes.current().ok_or(TransformError::MissingLexicalScope)?)
        } else {
            None
        };
        let cache_key = LiteralCacheKey::new(&item.value, Some(&item), scope);
        if let Some(template) = self.cache.get(&cache_key) {
            return Ok(Some(cx.ast.clone_subtree(template)));
        }

        let target = self.call_target(cx, encoding, scope)?;
        let statements =
            build_string_array_call(&mut cx.ast, &mut cx.random, &item, storage_index_shift, &target);
        let expression = match statements.as_slice() {
            [statement] => match cx.ast.kind(*statement) {
                NodeKind::ExpressionStatement { expression, .. } => *expression,
                other => {
                    return Err(TransformError::invariant(format!(
                        "string array call built a `{}` node",
                        other.type_name()
                    )))
                }
            },
            _ => {
                return Err(TransformError::invariant(format!(
                    "string array call built {} statements",
                    statements.len()
                )))
            }
        };

        let template = cx.ast.clone_subtree(expression);
        self.cache.insert(cache_key, template);
        trace!(value = %item.value, index = item.index, wrapper = %target.name, "replaced literal");
        Ok(Some(expression))
    }

    /// Accessor for a new call site: the root accessor when wrappers are off,
    /// otherwise a fresh wrapper of `scope` until the cap is reached and a
    /// random existing one after.
    fn call_target(
        &mut self,
        cx: &mut TransformContext,
        encoding: StringArrayEncoding,
        scope: Option<NodeId>,
    ) -> Result<CallTarget> {
        let root_name = self
            .storage
            .as_ref()
            .and_then(|storage| storage.root_wrapper_name(encoding))
            .ok_or_else(|| {
                TransformError::invariant(format!("no root accessor for `{}`", encoding.as_str()))
            })?
            .to_string();
        let parameters_count = self.options.wrappers_parameters_max_count;

        let Some(scope) = scope else {
            return Ok(CallTarget {
                name: root_name,
                index_shift: 0,
                parameters: None,
            });
        };

        let mut wrappers = self.wrappers.borrow_mut();
        let existing = wrappers.wrappers(scope, encoding);
        let data = if existing.len() < self.options.wrappers_count {
            let data = self.new_wrapper(cx, scope);
            wrappers.push(scope, encoding, &root_name, data.clone());
            data
        } else {
            cx.random
                .pick_one(existing)
                .cloned()
                .ok_or_else(|| TransformError::invariant("empty calls wrapper group"))?
        };

        Ok(CallTarget {
            name: data.name,
            index_shift: data.index_shift,
            parameters: data
                .parameter_indexes
                .map(|indexes| (indexes, parameters_count)),
        })
    }

    fn new_wrapper(&self, cx: &mut TransformContext, scope: NodeId) -> ScopeCallsWrapperData {
        let name = if matches!(cx.ast.kind(scope), NodeKind::Program { .. }) {
            cx.names.generate_for_global_scope(&mut cx.random)
        } else {
            cx.names.generate_next(&mut cx.random)
        };

        match self.options.wrappers_type {
            StringArrayWrappersType::Plain => ScopeCallsWrapperData {
                name,
                index_shift: 0,
                parameter_indexes: None,
            },
            StringArrayWrappersType::Function => {
                let index_shift = cx
                    .random
                    .get_random_integer(-MAX_WRAPPER_INDEX_SHIFT, MAX_WRAPPER_INDEX_SHIFT);
                let last = self.options.wrappers_parameters_max_count as i64 - 1;
                let value_pos = cx.random.get_random_integer(0, last);
                // at least two slots are guaranteed by config validation
                let key_pos = cx
                    .random
                    .get_random_integer_excluding(0, last, &[value_pos])
                    .unwrap_or(value_pos);
                ScopeCallsWrapperData {
                    name,
                    index_shift,
                    parameter_indexes: Some(ParameterIndexes {
                        value_index_param_pos: value_pos as usize,
                        decode_key_param_pos: key_pos as usize,
                    }),
                }
            }
        }
    }
}

impl Visitor for StringArrayTransformer {
    fn enter(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        if node == cx.ast.root() {
            self.prepare(cx)?;
            self.scopes.push(node);
            return Ok(VisitorResult::Continue);
        }
        if cx.ast.has_flags(node, NodeFlags::IGNORED) {
            return Ok(VisitorResult::Skip);
        }
        if cx.ast.is_lexical_scope_body(node) {
            self.scopes.push(node);
            return Ok(VisitorResult::Continue);
        }
        if matches!(cx.ast.kind(node), NodeKind::Literal { .. }) {
            if let Some(replacement) = self.transform_literal(cx, node)? {
                return Ok(VisitorResult::Replace(replacement));
            }
        }
        Ok(VisitorResult::Continue)
    }

    fn leave(
        &mut self,
        cx: &mut TransformContext,
        node: NodeId,
        _parent: Option<NodeId>,
    ) -> Result<VisitorResult> {
        if cx.ast.is_lexical_scope_body(node) && !self.scopes.pop_if(node) {
            return Err(TransformError::invariant(format!(
                "left scope {node:?} that is not the innermost open scope"
            )));
        }
        Ok(VisitorResult::Continue)
    }
}

impl NodeTransformer for StringArrayTransformer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn stage(&self) -> TransformStage {
        TransformStage::StringArray
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Ast, SourceType};
    use crate::transform::traverse;

    fn options() -> StringArrayOptions {
        StringArrayOptions {
            threshold: 1.0,
            encodings: vec![StringArrayEncoding::None],
            index_shift: false,
            rotate: false,
            shuffle: false,
            wrappers_count: 0,
            wrappers_type: StringArrayWrappersType::Plain,
            wrappers_parameters_max_count: 2,
            skip_async_functions: false,
        }
    }

    /// `var greeting = 'hello'; var again = 'hello'; var short = 'hi';`
    fn program() -> Ast {
        let mut ast = Ast::new(SourceType::Script);
        let root = ast.root();
        for (name, value) in [("greeting", "hello"), ("again", "hello"), ("short", "hi")] {
            let id = ast.identifier(name);
            let init = ast.string_literal(value);
            let declaration = ast.var_declaration(id, Some(init));
            ast.push_statement(root, declaration).unwrap();
        }
        ast
    }

    fn run(options: StringArrayOptions) -> (TransformContext, StringArrayStorage) {
        let mut cx = TransformContext::new(program(), Some(11), "");
        let wrappers = Rc::new(RefCell::new(ScopeCallsWrappersStorage::new()));
        let mut transformer = StringArrayTransformer::new(options, wrappers);
        let root = cx.ast.root();
        traverse(&mut cx, root, None, &mut transformer).unwrap();
        let storage = transformer.take_storage().unwrap();
        (cx, storage)
    }

    #[test]
    fn test_literals_become_root_calls() {
        let (cx, storage) = run(options());
        let root_name = storage
            .root_wrapper_name(StringArrayEncoding::None)
            .unwrap()
            .to_string();

        assert_eq!(storage.len(), 1);
        let rendered = cx.ast.render(cx.ast.root());
        assert_eq!(
            rendered,
            format!("var greeting = {root_name}(0);\nvar again = {root_name}(0);\nvar short = 'hi';")
        );
    }

    #[test]
    fn test_index_shift_is_added_to_call_index() {
        let (cx, storage) = run(StringArrayOptions {
            index_shift: true,
            ..options()
        });
        let shift = storage.index_shift_amount();
        assert!((MIN_INDEX_SHIFT..=MAX_INDEX_SHIFT).contains(&shift));

        let rendered = cx.ast.render(cx.ast.root());
        assert!(rendered.contains(&format!("({shift});")), "unexpected program: {rendered}");
    }

    #[test]
    fn test_global_wrapper_is_shared_by_equal_literals() {
        let (cx, _) = run(StringArrayOptions {
            wrappers_count: 1,
            ..options()
        });
        let statements = cx.ast.kind(cx.ast.root()).statements().unwrap().to_vec();
        let first = cx.ast.render(statements[0]);
        let second = cx.ast.render(statements[1]);
        assert_eq!(
            first.trim_start_matches("var greeting = "),
            second.trim_start_matches("var again = ")
        );
    }

    #[test]
    fn test_literal_outside_any_scope_is_an_error() {
        let mut cx = TransformContext::new(program(), Some(5), "");
        let wrappers = Rc::new(RefCell::new(ScopeCallsWrappersStorage::new()));
        let mut transformer = StringArrayTransformer::new(
            StringArrayOptions {
                wrappers_count: 2,
                ..options()
            },
            wrappers,
        );
        transformer.prepare(&mut cx).unwrap();

        let statements = cx.ast.kind(cx.ast.root()).statements().unwrap().to_vec();
        let literal = cx.ast.children(statements[0])[0];
        let literal = cx.ast.children(literal)[1];
        let result = transformer.enter(&mut cx, literal, None);
        assert!(matches!(result, Err(TransformError::MissingLexicalScope)));
    }
}
