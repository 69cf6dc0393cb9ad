//! Error types for vesm_atelier_setup.

use thiserror::Error;

/// Errors that can occur while compiling a script setup block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A recognized macro this compiler does not implement
    #[error("[mini-compiler] Unsupported macro: {macro_name}. Use native compiler instead.")]
    Unsupported { macro_name: &'static str },

    /// Failure reported by an external compiler
    #[error("{0}")]
    External(String),

    /// The fallback compiler failed after the primary one declined
    #[error("{primary} (fallback failed: {fallback})")]
    Fallback {
        primary: Box<CompileError>,
        fallback: Box<CompileError>,
    },
}

impl CompileError {
    /// Whether the input should be handed to a fallback compiler.
    pub fn requests_fallback(&self) -> bool {
        matches!(self, CompileError::Unsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message() {
        let err = CompileError::Unsupported {
            macro_name: "defineModel",
        };
        assert_eq!(
            err.to_string(),
            "[mini-compiler] Unsupported macro: defineModel. Use native compiler instead."
        );
        assert!(err.requests_fallback());
        assert!(!CompileError::External("boom".into()).requests_fallback());
    }
}
