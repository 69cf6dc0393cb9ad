//! Compiler seam with fallback.
//!
//! [`FallbackChain`] runs a primary compiler and hands the script to a
//! second one only when the primary reports an unsupported construct.

use tracing::warn;

use crate::compile_setup::compile_script_setup;
use crate::error::CompileError;
use crate::options::ScriptSetupOptions;

/// Anything that turns a script setup block into a component module.
pub trait ScriptSetupCompiler: Send + Sync {
    fn compile(&self, script: &str, options: &ScriptSetupOptions) -> Result<String, CompileError>;
}

/// The lexical compiler of this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniCompiler;

impl ScriptSetupCompiler for MiniCompiler {
    fn compile(&self, script: &str, options: &ScriptSetupOptions) -> Result<String, CompileError> {
        compile_script_setup(script, options)
    }
}

/// Adapter for a plain function or closure.
pub struct FnCompiler<F>(pub F);

impl<F> ScriptSetupCompiler for FnCompiler<F>
where
    F: Fn(&str, &ScriptSetupOptions) -> Result<String, CompileError> + Send + Sync,
{
    fn compile(&self, script: &str, options: &ScriptSetupOptions) -> Result<String, CompileError> {
        (self.0)(script, options)
    }
}

/// Primary compiler with a fallback for unsupported input.
pub struct FallbackChain<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackChain<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> ScriptSetupCompiler for FallbackChain<P, F>
where
    P: ScriptSetupCompiler,
    F: ScriptSetupCompiler,
{
    fn compile(&self, script: &str, options: &ScriptSetupOptions) -> Result<String, CompileError> {
        match self.primary.compile(script, options) {
            Ok(code) => Ok(code),
            Err(primary) if primary.requests_fallback() => {
                warn!(
                    component = %options.component_name,
                    reason = %primary,
                    "falling back to secondary compiler"
                );
                self.fallback
                    .compile(script, options)
                    .map_err(|fallback| CompileError::Fallback {
                        primary: Box::new(primary),
                        fallback: Box::new(fallback),
                    })
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(_: &str, options: &ScriptSetupOptions) -> Result<String, CompileError> {
        Ok(format!("native:{}", options.component_name))
    }

    fn broken(_: &str, _: &ScriptSetupOptions) -> Result<String, CompileError> {
        Err(CompileError::External("native compiler unavailable".into()))
    }

    #[test]
    fn test_primary_result_is_kept() {
        let chain = FallbackChain::new(MiniCompiler, FnCompiler(native));
        let code = chain.compile("const a = 1", &Default::default()).unwrap();
        assert!(code.starts_with("module.exports = {"));
    }

    #[test]
    fn test_unsupported_falls_back() {
        let chain = FallbackChain::new(MiniCompiler, FnCompiler(native));
        let options = ScriptSetupOptions::with_component_name("Model");
        let code = chain.compile("const v = defineModel()", &options).unwrap();
        assert_eq!(code, "native:Model");
    }

    #[test]
    fn test_fallback_failure_keeps_both_errors() {
        let chain = FallbackChain::new(MiniCompiler, FnCompiler(broken));
        let err = chain
            .compile("defineSlots()", &Default::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "[mini-compiler] Unsupported macro: defineSlots. Use native compiler instead. (fallback failed: native compiler unavailable)"
        );
    }

    #[test]
    fn test_other_errors_do_not_fall_back() {
        let failing = FnCompiler(broken);
        let chain = FallbackChain::new(failing, FnCompiler(native));
        let err = chain.compile("x", &Default::default()).unwrap_err();
        assert_eq!(err, CompileError::External("native compiler unavailable".into()));
    }
}
