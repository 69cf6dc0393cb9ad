//! Script setup compilation.
//!
//! The pipeline scans the script once, schedules every rewrite in an
//! [`EditList`], materializes the result and then wraps it in a component
//! module:
//!
//! 1. Reject unsupported macros
//! 2. Extract imports
//! 3. Resolve `withDefaults`, `defineProps`, `defineEmits` and `defineExpose`
//! 4. Collect top-level bindings from the comment-free rewrite
//! 5. Drop marker lines and detect top-level `await`
//! 6. Generate the component module

mod bindings;
mod codegen;
mod imports;
mod resolve;

use serde::Serialize;
use tracing::debug;
use vesm_carton::{EditList, FxHashSet, ScanTable};

use crate::error::CompileError;
use crate::macros::{MacroKind, MacroResult};
use crate::options::ScriptSetupOptions;
use crate::script::{find_macro_call, has_top_level_suspend};

use self::codegen::{generate_component, ComponentModule};
use self::imports::extract_imports;
use self::resolve::MacroResolution;

pub use self::bindings::BindingSet;
pub use self::codegen::{
    APPLY_DEFAULTS, CTX_PARAM, EMIT_BINDING, EXTRACTED_MARKER, OUTPUT_PREFIX, PROPS_PARAM,
};
pub use self::imports::{ComponentImport, ImportKind, ImportRecord};
pub(crate) use self::imports::{
    map_specifier, DEFAULT_IMPORT_RE, DEFAULT_NAMED_IMPORT_RE, NAMED_IMPORT_RE,
    NAMESPACE_IMPORT_RE, SIDE_EFFECT_IMPORT_RE, TYPE_IMPORT_RE,
};
pub(crate) use self::codegen::js_string;

/// Names that are never returned from setup.
const RESERVED_NAMES: [&str; 2] = [PROPS_PARAM, EMIT_BINDING];

/// Script setup compilation result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSetupResult {
    pub code: String,
    pub bindings: BindingSet,
    pub macros: Vec<MacroResult>,
    pub imports: Vec<ImportRecord>,
    pub components: Vec<ComponentImport>,
    pub is_async: bool,
}

/// Compile a script setup block into a component module.
pub fn compile_script_setup(
    code: &str,
    options: &ScriptSetupOptions,
) -> Result<String, CompileError> {
    compile_script_setup_full(code, options).map(|result| result.code)
}

/// Compile a script setup block, keeping everything learned on the way.
pub fn compile_script_setup_full(
    code: &str,
    options: &ScriptSetupOptions,
) -> Result<ScriptSetupResult, CompileError> {
    let table = ScanTable::new(code);
    check_unsupported(&table)?;

    let mut edits = EditList::new();
    let scan = extract_imports(&table, &mut edits, &options.framework_module);

    let mut resolution = MacroResolution::default();
    resolve::resolve_defaults_application(&table, &mut edits, &mut resolution);
    resolve::resolve_input_decl(&table, &mut edits, &mut resolution);
    resolve::resolve_event_decl(&table, &mut edits, &mut resolution);
    resolve::resolve_exposed_api(&table, &mut edits, &mut resolution);
    debug!(edits = edits.len(), "scheduled script setup rewrites");

    let transformed = edits.apply(code);

    let binding_source = ScanTable::new(&transformed).strip_comments();
    let destructured: FxHashSet<&str> = resolution
        .props_destructured
        .iter()
        .map(String::as_str)
        .collect();
    let bindings = bindings::collect_bindings(&binding_source, |name| {
        RESERVED_NAMES.contains(&name) || destructured.contains(name)
    });

    let body = strip_marker_lines(&transformed);
    let is_async = has_top_level_suspend(&ScanTable::new(&body));

    let returned: Vec<&str> = bindings
        .iter()
        .filter(|name| !scan.framework_names.contains(*name))
        .collect();

    let code = generate_component(&ComponentModule {
        options,
        components: &scan.components,
        props: resolution.props.as_ref().map(|m| m.raw_arguments.as_str()),
        emits: resolution.emits.as_ref().map(|m| m.raw_arguments.as_str()),
        uses_defaults: resolution.uses_defaults(),
        imports: &scan.imports,
        body: &body,
        expose: resolution.expose.as_ref().map(|m| m.raw_arguments.as_str()),
        returned,
        is_async,
    });

    debug!(
        component = %options.component_name,
        bindings = bindings.len(),
        is_async,
        "compiled script setup"
    );

    Ok(ScriptSetupResult {
        code,
        bindings,
        macros: resolution.into_results(),
        imports: scan.imports,
        components: scan.components,
        is_async,
    })
}

/// Fail on the first unsupported macro called anywhere in code.
fn check_unsupported(table: &ScanTable<'_>) -> Result<(), CompileError> {
    for kind in MacroKind::ALL.into_iter().filter(|kind| !kind.is_supported()) {
        if find_macro_call(table, kind.name(), 0).is_some() {
            return Err(CompileError::Unsupported {
                macro_name: kind.name(),
            });
        }
    }
    Ok(())
}

/// Schedule replacing `start..end` with a marker line.
///
/// A `;` right after the span is swallowed. The marker is moved onto a line
/// of its own when other code shares its line, so dropping marker lines never
/// drops code.
pub(crate) fn schedule_marker(
    edits: &mut EditList,
    source: &str,
    start: usize,
    end: usize,
    summary: &str,
) -> bool {
    let bytes = source.as_bytes();
    let mut end = end;
    let after = (end..bytes.len())
        .find(|&i| bytes[i] != b' ' && bytes[i] != b'\t')
        .unwrap_or(bytes.len());
    if bytes.get(after) == Some(&b';') {
        end = after + 1;
    }

    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[end..].find('\n').map_or(source.len(), |i| end + i);

    let mut marker = String::new();
    if !source[line_start..start].trim().is_empty() {
        marker.push('\n');
    }
    marker.push_str(EXTRACTED_MARKER);
    marker.push(' ');
    marker.push_str(&summary.split_whitespace().collect::<Vec<_>>().join(" "));
    if !source[end..line_end].trim().is_empty() {
        marker.push('\n');
    }

    edits.replace(start, end, marker)
}

/// Remove marker lines and trim the result.
fn strip_marker_lines(code: &str) -> String {
    code.split('\n')
        .filter(|line| !line.trim_start().starts_with(EXTRACTED_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
