//! Macro resolution.
//!
//! Each pass walks the occurrences of one macro in the original text and
//! schedules its rewrite. Passes run in a fixed order: `withDefaults`,
//! `defineProps`, `defineEmits`, `defineExpose`. A call already covered by an
//! earlier edit is skipped, which keeps the `defineProps` nested inside
//! `withDefaults` from being resolved twice.

use tracing::{debug, warn};
use vesm_carton::{is_ident_byte, is_identifier, is_word_at, EditList, ScanTable};

use super::codegen::{js_string, APPLY_DEFAULTS, DEFAULT_EMIT_NAME, EMIT_BINDING, PROPS_PARAM};
use super::schedule_marker;
use crate::macros::{MacroKind, MacroResult};
use crate::script::{extract_bindings, find_call, find_macro_call, split_top_level, MacroCallSite};

/// Everything learned from the macros of one script.
#[derive(Debug, Default)]
pub(crate) struct MacroResolution {
    pub props: Option<MacroResult>,
    pub emits: Option<MacroResult>,
    pub expose: Option<MacroResult>,
    pub defaults: Vec<MacroResult>,
    /// Names bound by destructuring the props object.
    pub props_destructured: Vec<String>,
}

impl MacroResolution {
    pub fn uses_defaults(&self) -> bool {
        !self.defaults.is_empty()
    }

    fn set_props(&mut self, result: MacroResult) {
        if self.props.is_some() {
            warn!("defineProps declared more than once; the last declaration wins");
        }
        self.props = Some(result);
    }

    fn set_emits(&mut self, result: MacroResult) {
        if self.emits.is_some() {
            warn!("defineEmits declared more than once; the last declaration wins");
        }
        self.emits = Some(result);
    }

    /// All resolved macros, props first.
    pub fn into_results(self) -> Vec<MacroResult> {
        self.props
            .into_iter()
            .chain(self.defaults)
            .chain(self.emits)
            .chain(self.expose)
            .collect()
    }
}

/// How the value of a macro call is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallTarget<'a> {
    /// The call is a statement of its own.
    Bare,
    /// The call is the right-hand side of `=`.
    Assigned {
        name: Option<&'a str>,
        pattern: Option<&'a str>,
    },
}

impl<'a> CallTarget<'a> {
    fn name(self) -> Option<String> {
        match self {
            CallTarget::Assigned { name, .. } => name.map(str::to_string),
            CallTarget::Bare => None,
        }
    }

    fn pattern(self) -> Option<&'a str> {
        match self {
            CallTarget::Assigned { pattern, .. } => pattern,
            CallTarget::Bare => None,
        }
    }
}

fn call_target<'a>(table: &ScanTable<'a>, pos: usize) -> CallTarget<'a> {
    let source = table.source();
    let bytes = table.bytes();

    let Some(eq) = prev_non_whitespace(bytes, pos) else {
        return CallTarget::Bare;
    };
    if bytes[eq] != b'=' || !table.is_code(eq) {
        return CallTarget::Bare;
    }
    if eq > 0
        && matches!(
            bytes[eq - 1],
            b'=' | b'!' | b'<' | b'>' | b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'?'
        )
    {
        return CallTarget::Bare;
    }

    let mut target = CallTarget::Assigned {
        name: None,
        pattern: None,
    };
    let Some(last) = prev_non_whitespace(bytes, eq) else {
        return target;
    };

    if matches!(bytes[last], b'}' | b']') {
        if let Some(open) = matching_open(table, last) {
            if ends_with_declaration(&source[..open]) {
                target = CallTarget::Assigned {
                    name: None,
                    pattern: Some(&source[open..=last]),
                };
            }
        }
    } else if is_ident_byte(bytes[last]) {
        let start = (0..=last)
            .rev()
            .take_while(|&i| is_ident_byte(bytes[i]))
            .last()
            .unwrap_or(last);
        let name = &source[start..=last];
        if is_identifier(name) {
            target = CallTarget::Assigned {
                name: Some(name),
                pattern: None,
            };
        }
    }
    target
}

fn prev_non_whitespace(bytes: &[u8], before: usize) -> Option<usize> {
    (0..before).rev().find(|&i| !bytes[i].is_ascii_whitespace())
}

/// Offset of the opener matching the `}` or `]` at `close`.
fn matching_open(table: &ScanTable<'_>, close: usize) -> Option<usize> {
    let bytes = table.bytes();
    let (open_ch, close_ch) = match bytes[close] {
        b'}' => (b'{', b'}'),
        _ => (b'[', b']'),
    };
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        if !table.is_code(i) {
            continue;
        }
        if bytes[i] == close_ch {
            depth += 1;
        } else if bytes[i] == open_ch {
            if depth <= 1 {
                return (depth == 1).then_some(i);
            }
            depth -= 1;
        }
    }
    None
}

fn ends_with_declaration(prefix: &str) -> bool {
    let prefix = prefix.trim_end();
    let bytes = prefix.as_bytes();
    ["const", "let", "var"].into_iter().any(|keyword| {
        prefix.ends_with(keyword) && is_word_at(bytes, bytes.len() - keyword.len(), keyword)
    })
}

fn definition_or(call: &MacroCallSite<'_>, fallback: &str) -> String {
    match call.raw_arguments() {
        "" => fallback.to_string(),
        raw => raw.to_string(),
    }
}

/// Whether the call at `pos` is the first argument of a `withDefaults` call.
fn is_defaults_argument(table: &ScanTable<'_>, pos: usize) -> bool {
    let bytes = table.bytes();
    let Some(paren) = prev_non_whitespace(bytes, pos) else {
        return false;
    };
    if bytes[paren] != b'(' || !table.is_code(paren) {
        return false;
    }
    let name = MacroKind::DefaultsApplication.name();
    prev_non_whitespace(bytes, paren)
        .and_then(|last| (last + 1).checked_sub(name.len()))
        .is_some_and(|start| is_word_at(bytes, start, name))
}

/// Quoted event names in an emits type, deduplicated in order.
fn emit_names_from_type(type_args: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut quote: Option<char> = None;
    let mut current = String::new();

    for c in type_args.chars() {
        match quote {
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                current.clear();
            }
            Some(q) if c == q => {
                quote = None;
                if !current.is_empty() && !names.contains(&current) {
                    names.push(current.clone());
                }
            }
            Some(_) => current.push(c),
            None => {}
        }
    }
    names
}

/// Resolve every `withDefaults(defineProps(...), defaults)` call.
///
/// Calls whose first argument holds no `defineProps` are left untouched.
pub(crate) fn resolve_defaults_application(
    table: &ScanTable<'_>,
    edits: &mut EditList,
    resolution: &mut MacroResolution,
) {
    let name = MacroKind::DefaultsApplication.name();
    let mut from = 0;

    while let Some(pos) = find_macro_call(table, name, from) {
        from = pos + name.len();
        if edits.contains(pos) {
            continue;
        }
        let Some(call) = find_call(table, pos, name) else {
            debug!(offset = pos, "skipping unbalanced withDefaults call");
            continue;
        };
        from = call.end();

        // Commas inside the props type arguments never separate arguments.
        let args = call.arguments;
        let props_name = MacroKind::InputDecl.name();
        let Some(props_call) = find_macro_call(table, props_name, args.start)
            .filter(|&at| at < args.end)
            .and_then(|at| find_call(table, at, props_name))
            .filter(|props_call| props_call.end() <= args.end)
        else {
            debug!(offset = pos, "withDefaults without defineProps left as is");
            continue;
        };
        let definition = definition_or(&props_call, "{}");
        let defaults_arg = table
            .find_code_byte(b',', props_call.end())
            .filter(|&comma| comma < args.end)
            .and_then(|comma| {
                split_top_level(&table.source()[comma + 1..args.end])
                    .first()
                    .copied()
            })
            .filter(|arg| !arg.is_empty())
            .unwrap_or("{}");

        let target = call_target(table, pos);
        let replacement = format!("{APPLY_DEFAULTS}({PROPS_PARAM}, {defaults_arg})");
        if !edits.replace(pos, call.end(), replacement) {
            continue;
        }

        if let Some(pattern) = target.pattern() {
            resolution
                .props_destructured
                .extend(extract_bindings(pattern).into_iter().map(str::to_string));
        }
        debug!(definition = %definition, defaults = %defaults_arg, "resolved withDefaults");
        resolution.set_props(MacroResult {
            kind: MacroKind::InputDecl,
            raw_arguments: definition,
            bound_name: target.name(),
        });
        resolution.defaults.push(MacroResult {
            kind: MacroKind::DefaultsApplication,
            raw_arguments: defaults_arg.to_string(),
            bound_name: target.name(),
        });
    }
}

/// Resolve every remaining `defineProps` call.
pub(crate) fn resolve_input_decl(
    table: &ScanTable<'_>,
    edits: &mut EditList,
    resolution: &mut MacroResolution,
) {
    let name = MacroKind::InputDecl.name();
    let mut from = 0;

    while let Some(pos) = find_macro_call(table, name, from) {
        from = pos + name.len();
        if edits.contains(pos) {
            continue;
        }
        let Some(call) = find_call(table, pos, name) else {
            debug!(offset = pos, "skipping unbalanced defineProps call");
            continue;
        };
        from = call.end();
        if is_defaults_argument(table, pos) {
            debug!(offset = pos, "defineProps inside unresolved withDefaults left as is");
            continue;
        }

        let target = call_target(table, pos);
        let scheduled = match target {
            CallTarget::Bare => schedule_marker(edits, table.source(), pos, call.end(), name),
            CallTarget::Assigned { .. } => edits.replace(pos, call.end(), PROPS_PARAM),
        };
        if !scheduled {
            continue;
        }

        if let Some(pattern) = target.pattern() {
            resolution
                .props_destructured
                .extend(extract_bindings(pattern).into_iter().map(str::to_string));
        }
        let definition = definition_or(&call, "{}");
        debug!(definition = %definition, "resolved defineProps");
        resolution.set_props(MacroResult {
            kind: MacroKind::InputDecl,
            raw_arguments: definition,
            bound_name: target.name(),
        });
    }
}

/// Resolve every `defineEmits` call.
///
/// A bare call still binds the dispatch handle as `emit`, unless `emit` is
/// already bound by an earlier call.
pub(crate) fn resolve_event_decl(
    table: &ScanTable<'_>,
    edits: &mut EditList,
    resolution: &mut MacroResolution,
) {
    let name = MacroKind::EventDecl.name();
    let mut from = 0;
    let mut handle_declared = false;

    while let Some(pos) = find_macro_call(table, name, from) {
        from = pos + name.len();
        if edits.contains(pos) {
            continue;
        }
        let Some(call) = find_call(table, pos, name) else {
            debug!(offset = pos, "skipping unbalanced defineEmits call");
            continue;
        };
        from = call.end();

        let target = call_target(table, pos);
        let scheduled = match target {
            // `emit` is declared once; later bare calls only update the definition.
            CallTarget::Bare if handle_declared => {
                schedule_marker(edits, table.source(), pos, call.end(), name)
            }
            CallTarget::Bare => edits.replace(
                pos,
                call.end(),
                format!("const {DEFAULT_EMIT_NAME} = {EMIT_BINDING}"),
            ),
            CallTarget::Assigned { .. } => edits.replace(pos, call.end(), EMIT_BINDING),
        };
        if !scheduled {
            continue;
        }
        let bound_name = match target {
            CallTarget::Bare => Some(DEFAULT_EMIT_NAME.to_string()),
            CallTarget::Assigned { .. } => target.name(),
        };
        handle_declared |= bound_name.as_deref() == Some(DEFAULT_EMIT_NAME);

        let definition = match call.type_arguments {
            Some(type_args) if call.is_type_only() => {
                let names: Vec<String> = emit_names_from_type(type_args.inner())
                    .iter()
                    .map(|name| js_string(name))
                    .collect();
                format!("[{}]", names.join(", "))
            }
            _ => definition_or(&call, "[]"),
        };
        debug!(definition = %definition, "resolved defineEmits");
        resolution.set_emits(MacroResult {
            kind: MacroKind::EventDecl,
            raw_arguments: definition,
            bound_name,
        });
    }
}

/// Resolve `defineExpose` calls. Only the first one is kept.
pub(crate) fn resolve_exposed_api(
    table: &ScanTable<'_>,
    edits: &mut EditList,
    resolution: &mut MacroResolution,
) {
    let name = MacroKind::ExposedApi.name();
    let mut from = 0;

    while let Some(pos) = find_macro_call(table, name, from) {
        from = pos + name.len();
        if edits.contains(pos) {
            continue;
        }
        let Some(call) = find_call(table, pos, name) else {
            debug!(offset = pos, "skipping unbalanced defineExpose call");
            continue;
        };
        from = call.end();

        if !schedule_marker(edits, table.source(), pos, call.end(), name) {
            continue;
        }
        if resolution.expose.is_some() {
            warn!("defineExpose called more than once; later calls are ignored");
            continue;
        }
        resolution.expose = Some(MacroResult {
            kind: MacroKind::ExposedApi,
            raw_arguments: call.raw_arguments().to_string(),
            bound_name: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_of<'a>(code: &'a str, name: &str) -> CallTarget<'a> {
        let table = ScanTable::new(code);
        let pos = code.find(name).unwrap();
        call_target(&table, pos)
    }

    #[test]
    fn test_call_target() {
        assert_eq!(target_of("defineProps()", "defineProps"), CallTarget::Bare);
        assert_eq!(
            target_of("const props = defineProps()", "defineProps"),
            CallTarget::Assigned {
                name: Some("props"),
                pattern: None
            }
        );
        assert_eq!(
            target_of("const { a, b: { c } } = defineProps()", "defineProps"),
            CallTarget::Assigned {
                name: None,
                pattern: Some("{ a, b: { c } }")
            }
        );
        assert_eq!(
            target_of("if (x == defineProps()) {}", "defineProps"),
            CallTarget::Bare
        );
    }

    #[test]
    fn test_emit_names_from_type() {
        assert_eq!(
            emit_names_from_type("{ (e: 'change', id: number): void; (e: \"update\"): void; (e: 'change'): void }"),
            vec!["change".to_string(), "update".to_string()]
        );
    }

    #[test]
    fn test_is_defaults_argument() {
        let code = "withDefaults( defineProps(), {})";
        let table = ScanTable::new(code);
        assert!(is_defaults_argument(&table, code.find("defineProps").unwrap()));

        let code = "withoutDefaults(defineProps())";
        let table = ScanTable::new(code);
        assert!(!is_defaults_argument(&table, code.find("defineProps").unwrap()));

        let code = "defineProps()";
        let table = ScanTable::new(code);
        assert!(!is_defaults_argument(&table, 0));
    }

    #[test]
    fn test_ends_with_declaration() {
        assert!(ends_with_declaration("const "));
        assert!(ends_with_declaration("\nlet"));
        assert!(!ends_with_declaration("constant "));
        assert!(!ends_with_declaration("("));
    }
}
