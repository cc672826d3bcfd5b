use super::control_flow::ControlFlowStorage;
use crate::ast::NodeId;
use crate::error::Result;
use crate::util::RandomGenerator;
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Keys previously generated per (storage id, grouping id).
///
/// A grouping id clusters call sites that may share one accessor: the
/// operator of a binary expression, the argument shape of a call, the value
/// of a string literal. Lists only grow.
#[derive(Debug)]
pub struct KeyReuseIndex<G> {
    keys_by_storage: FxHashMap<String, FxHashMap<G, Vec<String>>>,
}

impl<G: Hash + Eq> Default for KeyReuseIndex<G> {
    fn default() -> Self {
        Self {
            keys_by_storage: FxHashMap::default(),
        }
    }
}

impl<G: Hash + Eq> KeyReuseIndex<G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self, storage_id: &str, grouping: &G) -> &[String] {
        self.keys_by_storage
            .get(storage_id)
            .and_then(|groups| groups.get(grouping))
            .map_or(&[], Vec::as_slice)
    }

    /// Reuse a key of `grouping` with probability `reuse_chance`, otherwise
    /// insert the accessor produced by `build` under a fresh key. `build`
    /// receives the random source back for its own draws.
    pub fn insert_or_reuse(
        &mut self,
        storage: &mut ControlFlowStorage,
        grouping: G,
        reuse_chance: f64,
        random: &mut RandomGenerator,
        build: impl FnOnce(&mut RandomGenerator) -> Result<NodeId>,
    ) -> Result<String> {
        let keys = self
            .keys_by_storage
            .entry(storage.id().to_string())
            .or_default()
            .entry(grouping)
            .or_default();

        if random.get_math_random() < reuse_chance {
            if let Some(key) = random.pick_one(keys) {
                return Ok(key.clone());
            }
        }

        let key = storage.generate_key(random);
        let accessor = build(random)?;
        storage.set(key.clone(), accessor);
        keys.push(key.clone());
        Ok(key)
    }
}
