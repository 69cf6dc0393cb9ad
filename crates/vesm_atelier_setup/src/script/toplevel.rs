//! Brace depth and top-level suspend detection.

use memchr::memmem;
use vesm_carton::{is_word_at, ScanTable};

/// Keyword that marks a suspend point.
pub const SUSPEND_KEYWORD: &str = "await";

/// Whether `pos` sits outside every `{}` block.
#[inline]
pub fn is_top_level(table: &ScanTable<'_>, pos: usize) -> bool {
    table.depth_at(pos) == 0
}

/// Whether the text contains `await` as a whole word in code at brace depth 0.
pub fn has_top_level_suspend(table: &ScanTable<'_>) -> bool {
    let bytes = table.bytes();
    memmem::find_iter(bytes, SUSPEND_KEYWORD.as_bytes()).any(|pos| {
        table.is_code(pos) && is_top_level(table, pos) && is_word_at(bytes, pos, SUSPEND_KEYWORD)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suspends(code: &str) -> bool {
        has_top_level_suspend(&ScanTable::new(code))
    }

    #[test]
    fn test_top_level_await() {
        assert!(suspends("const data = await fetch('/api')"));
        assert!(suspends("if (ready) go()\nawait load()"));
    }

    #[test]
    fn test_nested_await_is_ignored() {
        assert!(!suspends("async function load() { await fetch('/api') }"));
        assert!(!suspends("onMounted(async () => {\n  await tick()\n})"));
    }

    #[test]
    fn test_await_outside_code_is_ignored() {
        assert!(!suspends("const s = 'await'\n// await x\n/* await */"));
        assert!(!suspends("const awaited = 1; const $await = 2"));
    }

    #[test]
    fn test_is_top_level() {
        let code = "a; { b; } c";
        let table = ScanTable::new(code);
        assert!(is_top_level(&table, 0));
        assert!(!is_top_level(&table, 5));
        assert!(is_top_level(&table, 10));
    }
}
