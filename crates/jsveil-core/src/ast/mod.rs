//! Arena-backed program tree.
//!
//! The front-end parser hands over a tree in this taxonomy; the transformers
//! mutate it in place and the printer consumes it afterwards. All nodes of
//! one program live in a single [`id_arena::Arena`], so children and parent
//! links are plain [`NodeId`] handles and no ownership cycles exist.
//!
//! Detached nodes (replaced originals, cache templates) simply stay in the
//! arena unreferenced; the arena is dropped with the program.

mod builder;
pub mod metadata;
pub mod node;
mod render;

pub use metadata::NodeFlags;
pub use node::{
    AssignmentOperator, BinaryOperator, Function, LiteralValue, LogicalOperator, MethodKind,
    Node, NodeId, NodeKind, PropertyKind, SourceType, UnaryOperator, VariableKind,
};

use crate::error::{Result, TransformError};
use id_arena::Arena;
use rustc_hash::FxHashSet;
use std::ops::Index;

#[derive(Debug)]
pub struct Ast {
    nodes: Arena<Node>,
    root: NodeId,
}

impl Ast {
    /// Create a tree holding an empty program.
    pub fn new(source_type: SourceType) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node {
            kind: NodeKind::Program {
                source_type,
                body: Vec::new(),
            },
            parent: None,
            flags: NodeFlags::empty(),
        });
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Allocate a node and point the parent link of each of its children at it.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let children = kind.children();
        let id = self.nodes.alloc(Node {
            kind,
            parent: None,
            flags: NodeFlags::empty(),
        });
        for child in children {
            self.nodes[child].parent = Some(id);
        }
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.nodes[id].flags
    }

    pub fn has_flags(&self, id: NodeId, flags: NodeFlags) -> bool {
        self.nodes[id].flags.intersects(flags)
    }

    pub fn add_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.nodes[id].flags.insert(flags);
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id].kind.children()
    }

    /// Append a statement to a program or block body.
    pub fn push_statement(&mut self, scope: NodeId, statement: NodeId) -> Result<()> {
        let type_name = self.nodes[scope].kind.type_name();
        let body = self.nodes[scope].kind.statements_mut().ok_or_else(|| {
            TransformError::invariant(format!(
                "cannot append a statement to a `{type_name}` node"
            ))
        })?;
        body.push(statement);
        self.nodes[statement].parent = Some(scope);
        Ok(())
    }

    /// Put `new` in the slot of `parent` currently holding `old`.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        let mut replaced = false;
        self.nodes[parent].kind.for_each_child_mut(|slot| {
            if !replaced && *slot == old {
                *slot = new;
                replaced = true;
            }
        });
        if !replaced {
            return Err(TransformError::invariant(format!(
                "node {:?} is not a child of `{}` node {:?}",
                old,
                self.nodes[parent].kind.type_name(),
                parent
            )));
        }
        self.nodes[new].parent = Some(parent);
        Ok(())
    }

    /// Deep copy of a subtree. Every copied node gets a fresh id; the copy's
    /// root is detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let Node { mut kind, flags, .. } = self.nodes[id].clone();
        let copies: Vec<NodeId> = kind
            .children()
            .into_iter()
            .map(|child| self.clone_subtree(child))
            .collect();
        let mut copies = copies.into_iter();
        kind.for_each_child_mut(|slot| {
            if let Some(copy) = copies.next() {
                *slot = copy;
            }
        });
        let copy = self.alloc(kind);
        self.nodes[copy].flags = flags;
        copy
    }

    /// Insert statements at the start of a program or block body, after its
    /// directive prologue.
    pub fn insert_after_directives(&mut self, scope: NodeId, statements: Vec<NodeId>) -> Result<()> {
        let prologue_len = match self.nodes[scope].kind.statements() {
            Some(body) => body
                .iter()
                .take_while(|statement| self.is_directive(**statement))
                .count(),
            None => {
                return Err(TransformError::invariant(format!(
                    "cannot insert statements into a `{}` node",
                    self.nodes[scope].kind.type_name()
                )))
            }
        };
        for statement in &statements {
            self.nodes[*statement].parent = Some(scope);
        }
        if let Some(body) = self.nodes[scope].kind.statements_mut() {
            body.splice(prologue_len..prologue_len, statements);
        }
        Ok(())
    }

    pub fn is_directive(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::ExpressionStatement {
                directive: Some(_),
                ..
            }
        )
    }

    pub fn is_function(&self, id: NodeId) -> bool {
        self.kind(id).as_function().is_some()
    }

    /// Block body of a function, if the function has one.
    pub fn function_block_body(&self, id: NodeId) -> Option<NodeId> {
        let function = self.kind(id).as_function()?;
        matches!(self.kind(function.body), NodeKind::BlockStatement { .. }).then_some(function.body)
    }

    /// True for the program node and for block bodies of functions: the nodes
    /// that own a lexical scope's statement list.
    pub fn is_lexical_scope_body(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::Program { .. } => true,
            NodeKind::BlockStatement { .. } => self
                .parent(id)
                .and_then(|parent| self.function_block_body(parent))
                == Some(id),
            _ => false,
        }
    }

    /// Number of statements directly in a program or block body.
    pub fn statement_count(&self, scope: NodeId) -> usize {
        self.kind(scope).statements().map_or(0, <[NodeId]>::len)
    }

    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: self.parent(id),
        }
    }

    pub fn enclosing_function(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|ancestor| self.is_function(*ancestor))
    }

    /// Whether any function enclosing `id` is declared `async`.
    pub fn is_inside_async_function(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|ancestor| {
            self.kind(ancestor)
                .as_function()
                .is_some_and(|function| function.is_async)
        })
    }

    /// Names of every identifier currently stored in the arena.
    pub fn identifier_names(&self) -> FxHashSet<String> {
        self.nodes
            .iter()
            .filter_map(|(_, node)| node.kind.identifier_name().map(str::to_string))
            .collect()
    }

    /// Ids of the nodes reachable from the root, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            let mut children = self.children(current);
            children.reverse();
            stack.extend(children);
        }
        result
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}

pub struct Ancestors<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.ast.parent(current);
        Some(current)
    }
}
