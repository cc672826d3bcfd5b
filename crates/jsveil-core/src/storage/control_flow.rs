use crate::ast::NodeId;
use crate::util::random::{RandomGenerator, ALPHANUMERIC};
use indexmap::IndexMap;

/// Length of generated storage keys. Matches the minimum length the string
/// array picks up, so keys emitted here are re-indirected by the later stage.
pub const STORAGE_KEY_LENGTH: usize = 5;

/// Per-function map from generated keys to accessor nodes.
///
/// Printed as `var <id> = { '<key>': <accessor>, ... };` at the top of the
/// function body. Entry order is insertion order.
#[derive(Debug, Clone)]
pub struct ControlFlowStorage {
    id: String,
    entries: IndexMap<String, NodeId>,
}

impl ControlFlowStorage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.entries.get(key).copied()
    }

    pub fn set(&mut self, key: String, node: NodeId) {
        self.entries.insert(key, node);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), *node))
    }

    /// Fresh random key not yet present in this storage.
    pub fn generate_key(&self, random: &mut RandomGenerator) -> String {
        loop {
            let key = random.get_random_string(STORAGE_KEY_LENGTH, ALPHANUMERIC);
            if !self.has(&key) {
                return key;
            }
        }
    }
}
