//! Carton - The lexical toolbox for vesm.
//!
//! This crate holds the foundations shared by the script setup compiler:
//!
//! - **Scanner**: a byte-level lexical state machine and the position-indexed
//!   [`ScanTable`] built from it
//! - **Spans**: balanced regions of source text
//! - **Edits**: deferred, non-overlapping rewrites materialized in one pass
//! - **Identifiers**: ASCII identifier and word-boundary checks
//!
//! # Example
//!
//! ```
//! use vesm_carton::ScanTable;
//!
//! let table = ScanTable::new("if (a) { '}' }");
//! assert_eq!(table.depth_at(9), 1);
//! assert!(!table.is_code(10));
//! ```

pub mod edit;
pub mod ident;
pub mod scan;
pub mod span;

pub use edit::{Edit, EditList};
pub use ident::{is_ident_byte, is_ident_start, is_identifier, is_word_at};
pub use scan::{advance, ScanState, ScanTable, Step};
pub use span::Span;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};
