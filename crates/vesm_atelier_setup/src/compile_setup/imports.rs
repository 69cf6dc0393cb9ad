//! Import statement extraction.
//!
//! Every recognized `import` in code position is replaced by a marker line
//! and recorded so codegen can re-emit it as a `require` call inside setup.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use vesm_carton::{CompactString, EditList, FxHashSet, ScanTable};

use super::schedule_marker;

pub(crate) static TYPE_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\bimport\s+type\s+(?:\{[^}]*\}\s*|\*\s*as\s+[\w$]+\s+|[\w$]+\s+)from\s*['"][^'"]+['"]"#,
    )
    .unwrap()
});

pub(crate) static DEFAULT_NAMED_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s+([\w$]+)\s*,\s*\{([^}]*)\}\s*from\s*['"]([^'"]+)['"]"#).unwrap()
});

pub(crate) static NAMED_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*\{([^}]*)\}\s*from\s*['"]([^'"]+)['"]"#).unwrap());

pub(crate) static NAMESPACE_IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bimport\s*\*\s*as\s+([\w$]+)\s+from\s*['"]([^'"]+)['"]"#).unwrap()
});

pub(crate) static DEFAULT_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s+([\w$]+)\s+from\s*['"]([^'"]+)['"]"#).unwrap());

pub(crate) static SIDE_EFFECT_IMPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bimport\s*['"]([^'"]+)['"]"#).unwrap());

/// Shape of an import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportKind {
    /// `import x from "m"`
    Default,
    /// `import { a, b as c } from "m"`
    Named,
    /// `import * as ns from "m"`
    Namespace,
    /// `import "m"`
    SideEffect,
}

/// A non-component import to be re-emitted inside setup.
///
/// Named bindings are kept in destructuring form: `b as c` is stored as
/// `b: c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub binding_names: Vec<CompactString>,
    pub module_path: String,
    pub kind: ImportKind,
}

/// A default import of a `.vue` file, registered as a child component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentImport {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Default)]
pub(crate) struct ImportScan {
    pub imports: Vec<ImportRecord>,
    pub components: Vec<ComponentImport>,
    /// Local names bound from the framework module.
    pub framework_names: FxHashSet<CompactString>,
}

struct Collector<'s> {
    framework_module: &'s str,
    imports: Vec<(usize, ImportRecord)>,
    components: Vec<(usize, ComponentImport)>,
    framework_names: FxHashSet<CompactString>,
}

impl Collector<'_> {
    fn default_import(&mut self, offset: usize, name: &str, path: &str) {
        if path.ends_with(".vue") {
            self.components.push((
                offset,
                ComponentImport {
                    name: name.to_string(),
                    path: path.to_string(),
                },
            ));
            return;
        }
        if path == self.framework_module {
            self.framework_names.insert(name.into());
        }
        self.imports.push((
            offset,
            ImportRecord {
                binding_names: vec![name.into()],
                module_path: path.to_string(),
                kind: ImportKind::Default,
            },
        ));
    }

    fn named_import(&mut self, offset: usize, specifiers: &str, path: &str) {
        let mut binding_names = Vec::new();
        for specifier in specifiers.split(',') {
            let Some((binding, local)) = map_specifier(specifier) else {
                continue;
            };
            if path == self.framework_module {
                self.framework_names.insert(local.into());
            }
            binding_names.push(binding);
        }
        if binding_names.is_empty() {
            return;
        }
        self.imports.push((
            offset,
            ImportRecord {
                binding_names,
                module_path: path.to_string(),
                kind: ImportKind::Named,
            },
        ));
    }
}

/// Map one named specifier to its destructuring form and local name.
///
/// Inline `type` specifiers are dropped.
pub(crate) fn map_specifier(specifier: &str) -> Option<(CompactString, &str)> {
    let specifier = specifier.trim();
    if specifier.is_empty() || specifier.starts_with("type ") {
        return None;
    }
    let parts: Vec<&str> = specifier.split_whitespace().collect();
    match parts.as_slice() {
        [imported, "as", local] => Some((CompactString::from(format!("{imported}: {local}")), local)),
        [name] => Some((CompactString::from(*name), name)),
        _ => None,
    }
}

/// Extract every import statement from `table` into `edits`.
///
/// Type-only imports are removed without a record. Default imports of
/// `.vue` files become components and are never required.
pub(crate) fn extract_imports(
    table: &ScanTable<'_>,
    edits: &mut EditList,
    framework_module: &str,
) -> ImportScan {
    let source = table.source();
    let mut collector = Collector {
        framework_module,
        imports: Vec::new(),
        components: Vec::new(),
        framework_names: FxHashSet::default(),
    };

    let passes: [&Lazy<Regex>; 6] = [
        &TYPE_IMPORT_RE,
        &DEFAULT_NAMED_IMPORT_RE,
        &NAMED_IMPORT_RE,
        &NAMESPACE_IMPORT_RE,
        &DEFAULT_IMPORT_RE,
        &SIDE_EFFECT_IMPORT_RE,
    ];

    for (pass, re) in passes.into_iter().enumerate() {
        for caps in re.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let (start, end) = (whole.start(), whole.end());
            if !table.is_code(start) || edits.overlaps(start, end) {
                continue;
            }
            let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

            match pass {
                1 => {
                    collector.default_import(start, group(1), group(3));
                    collector.named_import(start, group(2), group(3));
                }
                2 => collector.named_import(start, group(1), group(2)),
                3 => {
                    let (name, path) = (group(1), group(2));
                    if path == framework_module {
                        collector.framework_names.insert(name.into());
                    }
                    collector.imports.push((
                        start,
                        ImportRecord {
                            binding_names: vec![name.into()],
                            module_path: path.to_string(),
                            kind: ImportKind::Namespace,
                        },
                    ));
                }
                4 => collector.default_import(start, group(1), group(2)),
                5 => collector.imports.push((
                    start,
                    ImportRecord {
                        binding_names: Vec::new(),
                        module_path: group(1).to_string(),
                        kind: ImportKind::SideEffect,
                    },
                )),
                _ => {}
            }

            schedule_marker(edits, source, start, end, whole.as_str());
        }
    }

    collector.imports.sort_by_key(|(offset, _)| *offset);
    collector.components.sort_by_key(|(offset, _)| *offset);

    ImportScan {
        imports: collector.imports.into_iter().map(|(_, r)| r).collect(),
        components: collector.components.into_iter().map(|(_, c)| c).collect(),
        framework_names: collector.framework_names,
    }
}
