//! Balanced delimiter extraction.

use vesm_carton::{ScanTable, Span};

/// Extract the balanced region that opens at or after `open_offset`.
///
/// Only code bytes count, so delimiters inside strings, template literals and
/// comments are skipped. Closing delimiters seen before the first opening one
/// are ignored. Returns `None` when the region never closes.
pub fn extract_balanced<'a>(
    table: &ScanTable<'a>,
    open_offset: usize,
    open: u8,
    close: u8,
) -> Option<Span<'a>> {
    let bytes = table.bytes();
    let mut depth = 0usize;
    let mut start = 0;

    for i in open_offset..bytes.len() {
        if !table.is_code(i) {
            continue;
        }
        let ch = bytes[i];
        if ch == open {
            if depth == 0 {
                start = i;
            }
            depth += 1;
        } else if ch == close && depth > 0 {
            depth -= 1;
            if depth == 0 {
                return Some(Span::new(table.source(), start, i));
            }
        }
    }

    None
}

/// Extract a `<...>` type argument list starting at `open_offset`.
///
/// The `>` of an arrow (`=>`) does not close a level, so
/// `<(e: 'click') => void>` is extracted whole.
pub fn extract_type_arguments<'a>(table: &ScanTable<'a>, open_offset: usize) -> Option<Span<'a>> {
    let bytes = table.bytes();
    if bytes.get(open_offset) != Some(&b'<') || !table.is_code(open_offset) {
        return None;
    }

    let mut depth = 0usize;
    for i in open_offset..bytes.len() {
        if !table.is_code(i) {
            continue;
        }
        match bytes[i] {
            b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'=' => {}
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(Span::new(table.source(), open_offset, i));
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced(code: &str, open: u8, close: u8) -> Option<Span<'_>> {
        let table = ScanTable::new(code);
        let offset = code.find(open as char)?;
        extract_balanced(&table, offset, open, close)
    }

    #[test]
    fn test_span_starts_and_ends_with_delimiters() {
        let cases: [(&str, u8, u8); 3] = [
            ("call(a, (b), c) + 1", b'(', b')'),
            ("x = { a: { b: 1 } };", b'{', b'}'),
            ("[1, [2, 3], 4].map(f)", b'[', b']'),
        ];
        for (code, open, close) in cases {
            let span = balanced(code, open, close).unwrap();
            assert_eq!(span.text.as_bytes()[0], open);
            assert_eq!(*span.text.as_bytes().last().unwrap(), close);
            assert_eq!(span.text.len(), span.end - span.start + 1);
        }
    }

    #[test]
    fn test_skips_delimiters_in_strings_and_comments() {
        let code = "f(')', \"(\", `)`, /* ) */ x // )\n)";
        let span = balanced(code, b'(', b')').unwrap();
        assert_eq!(span.end, code.len() - 1);
    }

    #[test]
    fn test_unbalanced_returns_none() {
        assert!(balanced("f(a, (b)", b'(', b')').is_none());
    }

    #[test]
    fn test_starts_searching_at_offset() {
        let code = "a) (b)";
        let table = ScanTable::new(code);
        let span = extract_balanced(&table, 0, b'(', b')').unwrap();
        assert_eq!(span.text, "(b)");
    }

    #[test]
    fn test_type_arguments_with_arrow() {
        let code = "defineEmits<(e: 'click') => void>()";
        let table = ScanTable::new(code);
        let span = extract_type_arguments(&table, code.find('<').unwrap()).unwrap();
        assert_eq!(span.text, "<(e: 'click') => void>");
    }

    #[test]
    fn test_nested_type_arguments() {
        let code = "defineProps<{ list: Array<string> }>()";
        let table = ScanTable::new(code);
        let span = extract_type_arguments(&table, 11).unwrap();
        assert_eq!(span.inner(), "{ list: Array<string> }");
    }
}
