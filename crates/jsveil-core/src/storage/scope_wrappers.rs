use crate::ast::NodeId;
use crate::config::StringArrayEncoding;
use indexmap::IndexMap;

/// Parameter slots of a function-type calls wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterIndexes {
    pub value_index_param_pos: usize,
    pub decode_key_param_pos: usize,
}

/// One scope-local calls wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeCallsWrapperData {
    pub name: String,
    /// Subtracted from the received index before calling the root accessor.
    pub index_shift: i64,
    /// `None` for plain (variable) wrappers.
    pub parameter_indexes: Option<ParameterIndexes>,
}

/// Wrappers of one (scope, encoding) pair and the root accessor they forward to.
#[derive(Debug, Clone)]
pub struct ScopeCallsWrappers {
    pub root_name: String,
    pub wrappers: Vec<ScopeCallsWrapperData>,
}

/// Calls wrappers allocated per lexical scope body.
#[derive(Debug, Default)]
pub struct ScopeCallsWrappersStorage {
    by_scope: IndexMap<NodeId, IndexMap<StringArrayEncoding, ScopeCallsWrappers>>,
}

impl ScopeCallsWrappersStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrappers(&self, scope: NodeId, encoding: StringArrayEncoding) -> &[ScopeCallsWrapperData] {
        self.by_scope
            .get(&scope)
            .and_then(|groups| groups.get(&encoding))
            .map_or(&[], |group| group.wrappers.as_slice())
    }

    pub fn push(
        &mut self,
        scope: NodeId,
        encoding: StringArrayEncoding,
        root_name: &str,
        wrapper: ScopeCallsWrapperData,
    ) {
        self.by_scope
            .entry(scope)
            .or_default()
            .entry(encoding)
            .or_insert_with(|| ScopeCallsWrappers {
                root_name: root_name.to_string(),
                wrappers: Vec::new(),
            })
            .wrappers
            .push(wrapper);
    }

    /// Remove and return every wrapper group of `scope`, in allocation order.
    pub fn take_scope(&mut self, scope: NodeId) -> Vec<(StringArrayEncoding, ScopeCallsWrappers)> {
        self.by_scope
            .shift_remove(&scope)
            .map(|groups| groups.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scope.is_empty()
    }
}
