//! Compile options for vesm_atelier_setup.

use serde::{Deserialize, Serialize};

/// Options for compiling a script setup block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSetupOptions {
    /// Name of the generated component (default: "SetupComponent")
    #[serde(default = "default_component_name")]
    pub component_name: String,

    /// Module whose imports are never returned from setup (default: "vue")
    #[serde(default = "default_framework_module")]
    pub framework_module: String,

    /// Runtime function that loads `.vue` component imports (default: "vueEsmRuntime")
    #[serde(default = "default_component_loader")]
    pub component_loader: String,
}

impl Default for ScriptSetupOptions {
    fn default() -> Self {
        Self {
            component_name: default_component_name(),
            framework_module: default_framework_module(),
            component_loader: default_component_loader(),
        }
    }
}

impl ScriptSetupOptions {
    /// Default options with the given component name.
    pub fn with_component_name(name: impl Into<String>) -> Self {
        Self {
            component_name: name.into(),
            ..Self::default()
        }
    }
}

fn default_component_name() -> String {
    "SetupComponent".to_string()
}

fn default_framework_module() -> String {
    "vue".to_string()
}

fn default_component_loader() -> String {
    "vueEsmRuntime".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial() {
        let options: ScriptSetupOptions =
            serde_json::from_str(r#"{ "componentName": "Counter" }"#).unwrap();
        assert_eq!(options.component_name, "Counter");
        assert_eq!(options.framework_module, "vue");
        assert_eq!(options.component_loader, "vueEsmRuntime");
    }
}
