//! Lexical primitives for script setup rewriting.
//!
//! Every primitive here works on plain text guarded by a shared
//! [`ScanTable`](vesm_carton::ScanTable); nothing builds a token stream or an
//! AST. Matches inside strings, template literals and comments are never
//! reported.

mod balanced;
mod destructure;
mod locate;
mod split;
mod toplevel;

pub use balanced::{extract_balanced, extract_type_arguments};
pub use destructure::extract_bindings;
pub use locate::{find_call, find_macro_call, MacroCallSite};
pub use split::split_top_level;
pub use toplevel::{has_top_level_suspend, is_top_level, SUSPEND_KEYWORD};
