//! Atelier Setup - The `<script setup>` workshop for vesm.
//!
//! Compiles a Vue `<script setup>` block into a CommonJS component module
//! without parsing it. A single lexical scan classifies every byte of the
//! script, and macro calls, imports and top-level declarations are found by
//! text search guarded by that scan. Rewrites are collected as edits and
//! applied once.
//!
//! Supported macros are `defineProps`, `defineEmits`, `withDefaults` and
//! `defineExpose`. `defineModel`, `defineSlots` and `defineOptions` make
//! compilation fail with [`CompileError::Unsupported`], which a
//! [`FallbackChain`] can route to another compiler.
//!
//! # Example
//!
//! ```
//! use vesm_atelier_setup::{compile_script_setup, ScriptSetupOptions};
//!
//! let options = ScriptSetupOptions::with_component_name("Counter");
//! let code = compile_script_setup("const count = ref(0)", &options).unwrap();
//! assert!(code.starts_with("module.exports = {\n  name: \"Counter\","));
//! assert!(code.contains("      count: count\n"));
//! ```

pub mod compile_setup;
pub mod error;
pub mod es_module;
pub mod fallback;
pub mod macros;
pub mod options;
pub mod script;

pub use compile_setup::{
    compile_script_setup, compile_script_setup_full, BindingSet, ComponentImport, ImportKind,
    ImportRecord, ScriptSetupResult,
};
pub use error::CompileError;
pub use es_module::transform_es_module;
pub use fallback::{FallbackChain, FnCompiler, MiniCompiler, ScriptSetupCompiler};
pub use macros::{MacroKind, MacroResult};
pub use options::ScriptSetupOptions;
