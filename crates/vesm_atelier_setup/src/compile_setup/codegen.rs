//! Component module generation.

use crate::options::ScriptSetupOptions;

use super::imports::{ComponentImport, ImportKind, ImportRecord};

/// Prefix of every generated module.
pub const OUTPUT_PREFIX: &str = "module.exports = ";
/// Setup parameter holding the incoming props.
pub const PROPS_PARAM: &str = "__props__";
/// Setup parameter holding the setup context.
pub const CTX_PARAM: &str = "__ctx__";
/// Local bound to the context's emit function.
pub const EMIT_BINDING: &str = "__emit__";
/// Helper merging props over their defaults.
pub const APPLY_DEFAULTS: &str = "__applyDefaults__";
/// Leading text of bookkeeping lines dropped before codegen.
pub const EXTRACTED_MARKER: &str = "// [extracted]";

pub(crate) const DEFAULT_EMIT_NAME: &str = "emit";

const APPLY_DEFAULTS_HELPER: &str = "    var __applyDefaults__ = function(__props__, __defaults__) {
      var result = {};
      if (__defaults__) {
        Object.keys(__defaults__).forEach(function(key) {
          result[key] = __defaults__[key];
        });
      }
      if (__props__) {
        Object.keys(__props__).forEach(function(key) {
          if (__props__[key] !== undefined) result[key] = __props__[key];
        });
      }
      return result;
    };
";

/// Quote `value` as a JavaScript string literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Inputs of the generated component module.
pub(crate) struct ComponentModule<'a> {
    pub options: &'a ScriptSetupOptions,
    pub components: &'a [ComponentImport],
    pub props: Option<&'a str>,
    pub emits: Option<&'a str>,
    pub uses_defaults: bool,
    pub imports: &'a [ImportRecord],
    pub body: &'a str,
    pub expose: Option<&'a str>,
    pub returned: Vec<&'a str>,
    pub is_async: bool,
}

pub(crate) fn generate_component(module: &ComponentModule<'_>) -> String {
    let mut out = String::with_capacity(module.body.len() + 512);
    out.push_str(OUTPUT_PREFIX);
    out.push_str("{\n");
    out.push_str(&format!(
        "  name: {},\n",
        js_string(&module.options.component_name)
    ));

    if !module.components.is_empty() {
        out.push_str("  components: {\n");
        let mut entries = Vec::with_capacity(module.components.len() * 2);
        for component in module.components {
            let loader = format!(
                "{}({})",
                module.options.component_loader,
                js_string(&component.path)
            );
            entries.push(format!("    {}: {}", js_string(&component.name), loader));
            let alias = component.name.to_lowercase();
            if alias != component.name {
                entries.push(format!("    {}: {}", js_string(&alias), loader));
            }
        }
        out.push_str(&entries.join(",\n"));
        out.push_str("\n  },\n");
    }

    if let Some(props) = module.props {
        out.push_str(&format!("  props: {props},\n"));
    }
    if let Some(emits) = module.emits {
        out.push_str(&format!("  emits: {emits},\n"));
    }

    let async_keyword = if module.is_async { "async " } else { "" };
    out.push_str(&format!(
        "  setup: {async_keyword}function({PROPS_PARAM}, {CTX_PARAM}) {{\n"
    ));
    out.push_str(&format!("    var {EMIT_BINDING} = {CTX_PARAM}.emit;\n"));

    if module.uses_defaults {
        out.push_str(APPLY_DEFAULTS_HELPER);
    }

    for import in module.imports {
        out.push_str(&require_line(import));
    }

    out.push('\n');
    out.push_str(module.body);
    out.push_str("\n\n");

    if let Some(expose) = module.expose.filter(|expose| !expose.is_empty()) {
        out.push_str(&format!("    {CTX_PARAM}.expose({expose});\n"));
    }

    out.push_str("    return {\n");
    let entries: Vec<String> = module
        .returned
        .iter()
        .map(|name| format!("      {name}: {name}"))
        .collect();
    if !entries.is_empty() {
        out.push_str(&entries.join(",\n"));
        out.push('\n');
    }
    out.push_str("    };\n  }\n}");
    out
}

fn require_line(import: &ImportRecord) -> String {
    let path = js_string(&import.module_path);
    match import.kind {
        ImportKind::Named => {
            let names: Vec<&str> = import.binding_names.iter().map(|n| n.as_str()).collect();
            format!("    var {{ {} }} = require({path});\n", names.join(", "))
        }
        ImportKind::Default | ImportKind::Namespace => match import.binding_names.first() {
            Some(name) => format!("    var {name} = require({path});\n"),
            None => format!("    require({path});\n"),
        },
        ImportKind::SideEffect => format!("    require({path});\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
    }

    #[test]
    fn test_require_lines() {
        let named = ImportRecord {
            binding_names: vec!["ref".into(), "computed: c".into()],
            module_path: "vue".into(),
            kind: ImportKind::Named,
        };
        assert_eq!(
            require_line(&named),
            "    var { ref, computed: c } = require(\"vue\");\n"
        );

        let side_effect = ImportRecord {
            binding_names: Vec::new(),
            module_path: "./style.css".into(),
            kind: ImportKind::SideEffect,
        };
        assert_eq!(require_line(&side_effect), "    require(\"./style.css\");\n");
    }

    #[test]
    fn test_minimal_component() {
        let options = ScriptSetupOptions::default();
        let code = generate_component(&ComponentModule {
            options: &options,
            components: &[],
            props: None,
            emits: None,
            uses_defaults: false,
            imports: &[],
            body: "const a = 1",
            expose: None,
            returned: vec!["a"],
            is_async: false,
        });
        assert_eq!(
            code,
            "module.exports = {\n  name: \"SetupComponent\",\n  setup: function(__props__, __ctx__) {\n    var __emit__ = __ctx__.emit;\n\nconst a = 1\n\n    return {\n      a: a\n    };\n  }\n}"
        );
    }
}
