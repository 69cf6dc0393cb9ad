//! ES module to CommonJS rewriting for plain `<script>` blocks.
//!
//! Imports become `require` calls and exports become assignments to
//! `module.exports`. Only statements in code position are rewritten.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;
use vesm_carton::{EditList, ScanTable};

use crate::compile_setup::{
    js_string, map_specifier, DEFAULT_IMPORT_RE, DEFAULT_NAMED_IMPORT_RE, NAMED_IMPORT_RE,
    NAMESPACE_IMPORT_RE, SIDE_EFFECT_IMPORT_RE, TYPE_IMPORT_RE,
};
use crate::options::ScriptSetupOptions;

static DYNAMIC_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static EXPORT_DEFAULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s+default\s+").unwrap());

static EXPORT_DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+(const|let|var)\s+([A-Za-z_$][\w$]*)\s*=").unwrap()
});

static EXPORT_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s+(async\s+)?function\s*(\*)?\s*([A-Za-z_$][\w$]*)").unwrap()
});

static EXPORT_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s+class\s+([A-Za-z_$][\w$]*)").unwrap());

static EXPORT_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s*\{([^}]*)\}").unwrap());

type Rewrite = fn(&Captures<'_>, &str, &ScriptSetupOptions) -> Option<String>;

/// Rewrite ES module syntax in `code` into CommonJS.
pub fn transform_es_module(code: &str, options: &ScriptSetupOptions) -> String {
    let table = ScanTable::new(code);
    let mut edits = EditList::new();

    let passes: [(&Lazy<Regex>, Rewrite); 12] = [
        (&DYNAMIC_IMPORT_RE, rewrite_dynamic_import),
        (&TYPE_IMPORT_RE, |_, _, _| Some(String::new())),
        (&DEFAULT_NAMED_IMPORT_RE, rewrite_default_named_import),
        (&NAMED_IMPORT_RE, rewrite_named_import),
        (&NAMESPACE_IMPORT_RE, |caps, _, _| {
            Some(format!("const {} = require({})", &caps[1], js_string(&caps[2])))
        }),
        (&DEFAULT_IMPORT_RE, |caps, _, options| {
            Some(default_import(&caps[1], &caps[2], options))
        }),
        (&SIDE_EFFECT_IMPORT_RE, |caps, _, _| {
            Some(format!("require({})", js_string(&caps[1])))
        }),
        (&EXPORT_DEFAULT_RE, |_, _, _| Some("module.exports = ".to_string())),
        (&EXPORT_DECLARATION_RE, |caps, _, _| {
            let (keyword, name) = (&caps[1], &caps[2]);
            Some(format!("{keyword} {name} = module.exports.{name} ="))
        }),
        (&EXPORT_FUNCTION_RE, |caps, _, _| {
            let name = &caps[3];
            let is_async = if caps.get(1).is_some() { "async " } else { "" };
            let generator = if caps.get(2).is_some() { "*" } else { "" };
            Some(format!(
                "module.exports.{name} = {is_async}function{generator} {name}"
            ))
        }),
        (&EXPORT_CLASS_RE, |caps, _, _| {
            let name = &caps[1];
            Some(format!("module.exports.{name} = class {name}"))
        }),
        (&EXPORT_LIST_RE, rewrite_export_list),
    ];

    for (re, rewrite) in passes {
        for caps in re.captures_iter(code) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if !table.is_code(whole.start()) || edits.overlaps(whole.start(), whole.end()) {
                continue;
            }
            let rest = &code[whole.end()..];
            if let Some(replacement) = rewrite(&caps, rest, options) {
                edits.replace(whole.start(), whole.end(), replacement);
            }
        }
    }

    debug!(rewrites = edits.len(), "transformed ES module syntax");
    edits.apply(code)
}

fn default_import(name: &str, path: &str, options: &ScriptSetupOptions) -> String {
    if path.ends_with(".vue") {
        format!("const {name} = {}({})", options.component_loader, js_string(path))
    } else {
        format!("const {name} = require({})", js_string(path))
    }
}

fn destructure_specifiers(specifiers: &str) -> String {
    let names: Vec<_> = specifiers
        .split(',')
        .filter_map(map_specifier)
        .map(|(binding, _)| binding)
        .collect();
    format!("{{ {} }}", names.join(", "))
}

fn rewrite_dynamic_import(
    caps: &Captures<'_>,
    _rest: &str,
    options: &ScriptSetupOptions,
) -> Option<String> {
    let path = &caps[1];
    let loader = &options.component_loader;
    if let Some(file) = path.strip_suffix(".vue") {
        let name = file.rsplit('/').next().unwrap_or(file);
        Some(format!(
            "{loader}.loadComponent({}, {})()",
            js_string(path),
            js_string(name)
        ))
    } else {
        Some(format!("{loader}.loadModule({})", js_string(path)))
    }
}

fn rewrite_default_named_import(
    caps: &Captures<'_>,
    _rest: &str,
    options: &ScriptSetupOptions,
) -> Option<String> {
    let path = &caps[3];
    Some(format!(
        "{}; const {} = require({})",
        default_import(&caps[1], path, options),
        destructure_specifiers(&caps[2]),
        js_string(path)
    ))
}

fn rewrite_named_import(
    caps: &Captures<'_>,
    _rest: &str,
    _options: &ScriptSetupOptions,
) -> Option<String> {
    Some(format!(
        "const {} = require({})",
        destructure_specifiers(&caps[1]),
        js_string(&caps[2])
    ))
}

/// `export { a, b as c }`; re-exports with `from` are left alone.
fn rewrite_export_list(
    caps: &Captures<'_>,
    rest: &str,
    _options: &ScriptSetupOptions,
) -> Option<String> {
    if rest.trim_start().starts_with("from") {
        return None;
    }
    let assignments: Vec<String> = caps[1]
        .split(',')
        .filter_map(|specifier| {
            let parts: Vec<&str> = specifier.split_whitespace().collect();
            match parts.as_slice() {
                [local, "as", exported] => Some(format!("module.exports.{exported} = {local}")),
                [name] => Some(format!("module.exports.{name} = {name}")),
                _ => None,
            }
        })
        .collect();
    Some(assignments.join("; "))
}
