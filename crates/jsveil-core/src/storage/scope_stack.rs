use crate::ast::NodeId;

/// Lexical scope bodies currently open during a traversal, innermost last.
#[derive(Debug, Default)]
pub struct LexicalScopeStack {
    scopes: Vec<NodeId>,
}

impl LexicalScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: NodeId) {
        self.scopes.push(scope);
    }

    /// Pop `scope` if it is the innermost open scope.
    pub fn pop_if(&mut self, scope: NodeId) -> bool {
        if self.scopes.last() == Some(&scope) {
            self.scopes.pop();
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<NodeId> {
        self.scopes.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
