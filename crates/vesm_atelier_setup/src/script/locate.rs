//! Macro call location.

use memchr::memmem;
use vesm_carton::{is_word_at, ScanTable, Span};

use super::balanced::{extract_balanced, extract_type_arguments};

/// Find the next call of the macro `name` at or after `from`.
///
/// A candidate counts only when it starts in code, is a whole word and is
/// followed (after optional whitespace) by `(` or a type argument list `<`.
/// Returns the offset of the macro name.
pub fn find_macro_call(table: &ScanTable<'_>, name: &str, from: usize) -> Option<usize> {
    let bytes = table.bytes();
    if from >= bytes.len() {
        return None;
    }

    memmem::find_iter(&bytes[from..], name.as_bytes())
        .map(|offset| from + offset)
        .find(|&pos| {
            table.is_code(pos)
                && is_word_at(bytes, pos, name)
                && matches!(
                    next_non_whitespace(bytes, pos + name.len()).map(|i| bytes[i]),
                    Some(b'(') | Some(b'<')
                )
        })
}

/// A located macro call, from the name to the closing parenthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroCallSite<'a> {
    /// Offset of the macro name.
    pub start: usize,
    /// `<...>` type arguments, if any.
    pub type_arguments: Option<Span<'a>>,
    /// The parenthesized argument list.
    pub arguments: Span<'a>,
}

impl<'a> MacroCallSite<'a> {
    /// Offset one past the closing parenthesis.
    #[inline]
    pub fn end(&self) -> usize {
        self.arguments.end_exclusive()
    }

    /// Argument text between the parentheses, trimmed.
    #[inline]
    pub fn raw_arguments(&self) -> &'a str {
        self.arguments.inner().trim()
    }

    /// Whether the call only carries type arguments, as in `defineProps<T>()`.
    #[inline]
    pub fn is_type_only(&self) -> bool {
        self.type_arguments.is_some() && self.raw_arguments().is_empty()
    }
}

/// Resolve the call of the macro whose name starts at `start`.
pub fn find_call<'a>(table: &ScanTable<'a>, start: usize, name: &str) -> Option<MacroCallSite<'a>> {
    let bytes = table.bytes();
    let mut pos = next_non_whitespace(bytes, start + name.len())?;

    let type_arguments = if bytes[pos] == b'<' {
        let span = extract_type_arguments(table, pos)?;
        pos = next_non_whitespace(bytes, span.end_exclusive())?;
        Some(span)
    } else {
        None
    };

    if bytes[pos] != b'(' || !table.is_code(pos) {
        return None;
    }
    let arguments = extract_balanced(table, pos, b'(', b')')?;

    Some(MacroCallSite {
        start,
        type_arguments,
        arguments,
    })
}

fn next_non_whitespace(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| !bytes[i].is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_strings_and_comments() {
        let code = "const s = 'defineProps()'\n// defineProps()\n/* defineProps() */\nconst p = defineProps()";
        let table = ScanTable::new(code);
        let pos = find_macro_call(&table, "defineProps", 0).unwrap();
        assert_eq!(pos, code.rfind("defineProps").unwrap());
        assert!(find_macro_call(&table, "defineProps", pos + 1).is_none());
    }

    #[test]
    fn test_ignores_template_literal() {
        let table = ScanTable::new("const t = `defineEmits(['a'])`");
        assert!(find_macro_call(&table, "defineEmits", 0).is_none());
    }

    #[test]
    fn test_requires_whole_word() {
        let table = ScanTable::new("mydefineProps(); definePropsX(); obj.defineProps ()");
        let pos = find_macro_call(&table, "defineProps", 0);
        assert_eq!(pos, Some(37));
    }

    #[test]
    fn test_requires_call() {
        let table = ScanTable::new("const f = defineProps; defineProps <{ a: string }>()");
        let pos = find_macro_call(&table, "defineProps", 0).unwrap();
        assert_eq!(pos, 23);

        let call = find_call(&table, pos, "defineProps").unwrap();
        assert!(call.is_type_only());
        assert_eq!(call.type_arguments.unwrap().inner(), "{ a: string }");
        assert_eq!(call.end(), table.len());
    }

    #[test]
    fn test_find_call_arguments() {
        let code = "defineEmits(['change', ')'])";
        let table = ScanTable::new(code);
        let call = find_call(&table, 0, "defineEmits").unwrap();
        assert_eq!(call.raw_arguments(), "['change', ')']");
        assert!(!call.is_type_only());
    }
}
