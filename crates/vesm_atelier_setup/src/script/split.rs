//! Top-level argument splitting.

use vesm_carton::ScanTable;

/// Split `code` on commas that sit outside every `()`, `{}` and `[]` pair.
///
/// Commas in strings, template literals and comments never split. Elements
/// are trimmed; a trailing empty element from a dangling comma is dropped.
pub fn split_top_level(code: &str) -> Vec<&str> {
    let table = ScanTable::new(code);
    let bytes = code.as_bytes();
    let mut parts = Vec::new();
    let (mut paren, mut brace, mut bracket) = (0i32, 0i32, 0i32);
    let mut start = 0;

    for (i, &ch) in bytes.iter().enumerate() {
        if !table.is_code(i) {
            continue;
        }
        match ch {
            b'(' => paren += 1,
            b')' => paren -= 1,
            b'{' => brace += 1,
            b'}' => brace -= 1,
            b'[' => bracket += 1,
            b']' => bracket -= 1,
            b',' if paren == 0 && brace == 0 && bracket == 0 => {
                parts.push(code[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = code[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::split_top_level;

    #[test]
    fn test_split_nested() {
        assert_eq!(
            split_top_level("a, {b, c}, [d, e]"),
            vec!["a", "{b, c}", "[d, e]"]
        );
    }

    #[test]
    fn test_split_ignores_commas_in_strings() {
        assert_eq!(
            split_top_level("defineProps(['a', 'b']), { msg: 'x, y', n: `${1},${2}` }"),
            vec!["defineProps(['a', 'b'])", "{ msg: 'x, y', n: `${1},${2}` }"]
        );
    }

    #[test]
    fn test_split_dangling_comma() {
        assert_eq!(split_top_level("a, b,"), vec!["a", "b"]);
        assert_eq!(split_top_level("a,, b"), vec!["a", "", "b"]);
        assert!(split_top_level("  ").is_empty());
    }
}
