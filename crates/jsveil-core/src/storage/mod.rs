//! Indirection storages and the lookup tables around them.
//!
//! All of them are plain owned data mutated by one transformer during a
//! single traversal; nothing here is shared across threads.

pub mod control_flow;
pub mod key_reuse;
pub mod literal_cache;
pub mod scope_stack;
pub mod scope_wrappers;
pub mod string_array;

pub use control_flow::{ControlFlowStorage, STORAGE_KEY_LENGTH};
pub use key_reuse::KeyReuseIndex;
pub use literal_cache::{LiteralCache, LiteralCacheKey};
pub use scope_stack::LexicalScopeStack;
pub use scope_wrappers::{
    ParameterIndexes, ScopeCallsWrapperData, ScopeCallsWrappers, ScopeCallsWrappersStorage,
};
pub use string_array::{StringArrayStorage, StringArrayStorageItem};
