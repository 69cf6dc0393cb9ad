//! Compiler macro kinds and their resolved form.

use std::fmt;

use serde::Serialize;

/// Every compiler macro recognized in a script setup block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MacroKind {
    /// `defineProps`
    InputDecl,
    /// `defineEmits`
    EventDecl,
    /// `withDefaults`
    DefaultsApplication,
    /// `defineExpose`
    ExposedApi,
    /// `defineModel`
    ModelBinding,
    /// `defineSlots`
    SlotDeclaration,
    /// `defineOptions`
    Options,
}

impl MacroKind {
    /// Every macro kind, in declaration order.
    pub const ALL: [MacroKind; 7] = [
        MacroKind::InputDecl,
        MacroKind::EventDecl,
        MacroKind::DefaultsApplication,
        MacroKind::ExposedApi,
        MacroKind::ModelBinding,
        MacroKind::SlotDeclaration,
        MacroKind::Options,
    ];

    /// Source name of the macro.
    pub const fn name(self) -> &'static str {
        match self {
            MacroKind::InputDecl => "defineProps",
            MacroKind::EventDecl => "defineEmits",
            MacroKind::DefaultsApplication => "withDefaults",
            MacroKind::ExposedApi => "defineExpose",
            MacroKind::ModelBinding => "defineModel",
            MacroKind::SlotDeclaration => "defineSlots",
            MacroKind::Options => "defineOptions",
        }
    }

    /// Whether this compiler rewrites the macro. Any other macro aborts
    /// compilation and requests a fallback.
    pub const fn is_supported(self) -> bool {
        matches!(
            self,
            MacroKind::InputDecl
                | MacroKind::EventDecl
                | MacroKind::DefaultsApplication
                | MacroKind::ExposedApi
        )
    }
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A macro call after resolution.
///
/// `raw_arguments` holds what the generated component uses: the runtime
/// definition for `defineProps`/`defineEmits`, the defaults object for
/// `withDefaults` and the exposed expression for `defineExpose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroResult {
    pub kind: MacroKind,
    pub raw_arguments: String,
    pub bound_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = MacroKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), MacroKind::ALL.len());
    }

    #[test]
    fn test_supported_partition() {
        let unsupported: Vec<&str> = MacroKind::ALL
            .iter()
            .filter(|k| !k.is_supported())
            .map(|k| k.name())
            .collect();
        assert_eq!(unsupported, ["defineModel", "defineSlots", "defineOptions"]);
        assert_eq!(MacroKind::DefaultsApplication.to_string(), "withDefaults");
    }
}
