//! Test helpers for jsveil
//!
//! The core crate has no parser, so fixture programs are assembled with the
//! [`Ast`] builder API in [`fixtures`].

pub mod fixtures;

use jsveil_core::{Ast, ObfuscationResult, Obfuscator, ObfuscatorConfig, Result};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. Controlled by `RUST_LOG`;
/// silent by default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Run the obfuscator over `ast` with `config`.
pub fn obfuscate(ast: Ast, config: ObfuscatorConfig) -> Result<ObfuscationResult> {
    init_tracing();
    Obfuscator::new(config)?.obfuscate(ast)
}

/// Debug rendering of the whole program.
pub fn render_program(ast: &Ast) -> String {
    ast.render(ast.root())
}

/// Control-flow flattening only, every eligible node extracted.
pub fn control_flow_only(seed: u64) -> ObfuscatorConfig {
    ObfuscatorConfig {
        control_flow_flattening: true,
        control_flow_flattening_threshold: 1.0,
        string_array: false,
        seed: Some(seed),
        ..ObfuscatorConfig::default()
    }
}

/// String array only, every eligible literal extracted, no shuffling,
/// rotation, index shift or wrappers.
pub fn string_array_only(seed: u64) -> ObfuscatorConfig {
    ObfuscatorConfig {
        control_flow_flattening: false,
        string_array: true,
        string_array_threshold: 1.0,
        string_array_index_shift: false,
        string_array_rotate: false,
        string_array_shuffle: false,
        string_array_wrappers_count: 0,
        seed: Some(seed),
        ..ObfuscatorConfig::default()
    }
}
