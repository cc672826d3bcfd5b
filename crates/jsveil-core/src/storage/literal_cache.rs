use super::string_array::StringArrayStorageItem;
use crate::ast::NodeId;
use crate::config::StringArrayEncoding;
use rustc_hash::FxHashMap;

/// Identity of a literal replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralCacheKey {
    value: String,
    item: Option<(usize, StringArrayEncoding, Option<String>)>,
    /// Lexical scope of the call site when replacements go through
    /// scope-local wrappers; `None` otherwise.
    scope: Option<NodeId>,
}

impl LiteralCacheKey {
    pub fn new(value: &str, item: Option<&StringArrayStorageItem>, scope: Option<NodeId>) -> Self {
        Self {
            value: value.to_string(),
            item: item.map(|item| (item.index, item.encoding, item.decode_key.clone())),
            scope,
        }
    }
}

/// Replacement templates already produced for a literal.
///
/// Templates are detached subtrees; callers clone them before inserting, so
/// no cached node is ever linked into the live tree.
#[derive(Debug, Default)]
pub struct LiteralCache {
    templates: FxHashMap<LiteralCacheKey, NodeId>,
}

impl LiteralCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &LiteralCacheKey) -> Option<NodeId> {
        self.templates.get(key).copied()
    }

    pub fn insert(&mut self, key: LiteralCacheKey, template: NodeId) {
        self.templates.insert(key, template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
