//! Read-only analyses over the program tree.
//!
//! - `calls_graph`: bound on the entries one block scope may accumulate
//! - `literal`: eligibility of string literals for indirection
//! - `string_array_storage`: whole-program selection of string-array items

pub mod calls_graph;
pub mod literal;
pub mod string_array_storage;

pub use calls_graph::get_limit_index;
pub use literal::{eligible_string_value, is_prohibited_literal, MIN_STRING_LENGTH};
pub use string_array_storage::{StringArrayAnalysis, StringArrayStorageAnalyzer};
