use super::literal::eligible_string_value;
use crate::ast::{Ast, NodeFlags, NodeId};
use crate::config::StringArrayEncoding;
use crate::storage::StringArrayStorage;
use crate::util::RandomGenerator;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Storage item chosen for each selected literal node.
#[derive(Debug, Default)]
pub struct StringArrayAnalysis {
    items_by_node: FxHashMap<NodeId, (String, StringArrayEncoding)>,
}

impl StringArrayAnalysis {
    /// Value and encoding of the item assigned to `node`, if it was selected.
    pub fn item_key(&self, node: NodeId) -> Option<(&str, StringArrayEncoding)> {
        self.items_by_node
            .get(&node)
            .map(|(value, encoding)| (value.as_str(), *encoding))
    }

    pub fn len(&self) -> usize {
        self.items_by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_by_node.is_empty()
    }
}

/// Selects the string literals that go into the string array.
///
/// Runs once over the whole program before any literal is rewritten, so the
/// array is complete (and can be shuffled or rotated) by the time call sites
/// are built.
pub struct StringArrayStorageAnalyzer {
    threshold: f64,
    encodings: Vec<StringArrayEncoding>,
    skip_async_functions: bool,
}

impl StringArrayStorageAnalyzer {
    pub fn new(
        threshold: f64,
        encodings: Vec<StringArrayEncoding>,
        skip_async_functions: bool,
    ) -> Self {
        Self {
            threshold,
            encodings,
            skip_async_functions,
        }
    }

    pub fn analyze(
        &self,
        ast: &Ast,
        storage: &mut StringArrayStorage,
        random: &mut RandomGenerator,
    ) -> StringArrayAnalysis {
        let mut analysis = StringArrayAnalysis::default();
        let mut stack = vec![ast.root()];

        while let Some(id) = stack.pop() {
            if ast.has_flags(id, NodeFlags::IGNORED) {
                continue;
            }
            let mut children = ast.children(id);
            children.reverse();
            stack.extend(children);

            let Some(value) = eligible_string_value(ast, id) else {
                continue;
            };
            if self.skip_async_functions && ast.is_inside_async_function(id) {
                continue;
            }
            if random.get_math_random() > self.threshold {
                continue;
            }
            let Some(encoding) = random.pick_one(&self.encodings).copied() else {
                continue;
            };

            storage.get_or_insert(value, encoding, random);
            analysis
                .items_by_node
                .insert(id, (value.to_string(), encoding));
        }

        debug!(
            literals = analysis.len(),
            items = storage.len(),
            "analyzed string array storage"
        );
        analysis
    }
}
