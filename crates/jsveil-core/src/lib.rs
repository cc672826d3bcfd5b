//! Indirection passes of a JavaScript obfuscator.
//!
//! The crate works on an already parsed program tree ([`ast::Ast`]) and
//! rewrites it in place:
//!
//! - control-flow flattening moves operators, calls and string literals of
//!   each function into a per-function storage object
//! - the string array moves string literals into one program-wide array read
//!   back through accessor calls
//!
//! Parsing, printing and the runtime decoder templates live outside this
//! crate; [`obfuscator::ObfuscationResult`] carries everything a printer
//! needs besides the tree.

pub mod analysis;
pub mod ast;
pub mod config;
pub mod error;
pub mod obfuscator;
pub mod storage;
pub mod transform;
pub mod util;

pub use ast::{Ast, NodeFlags, NodeId, NodeKind, SourceType};
pub use config::{ObfuscatorConfig, StringArrayEncoding, StringArrayWrappersType};
pub use error::{ConfigError, Result, TransformError};
pub use obfuscator::{ObfuscationResult, Obfuscator};
