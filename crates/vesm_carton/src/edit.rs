//! Deferred text edits.
//!
//! Rewrites are collected against a read-only source and materialized in a
//! single pass, so offsets found by earlier scans never go stale.

use smallvec::SmallVec;

/// A single replacement of `source[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Non-overlapping edits over one source text.
#[derive(Debug, Clone, Default)]
pub struct EditList {
    edits: SmallVec<[Edit; 8]>,
}

impl EditList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule replacing `start..end` (end exclusive).
    ///
    /// Returns `false` and drops the edit when it overlaps one already
    /// scheduled.
    pub fn replace(&mut self, start: usize, end: usize, replacement: impl Into<String>) -> bool {
        debug_assert!(start <= end);
        if self.overlaps(start, end) {
            return false;
        }
        self.edits.push(Edit {
            start,
            end,
            replacement: replacement.into(),
        });
        true
    }

    /// Whether `start..end` intersects a scheduled edit.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.edits.iter().any(|edit| {
            if start == end {
                edit.start < start && start < edit.end
            } else {
                start < edit.end && edit.start < end
            }
        })
    }

    /// Whether `pos` falls inside a scheduled edit.
    pub fn contains(&self, pos: usize) -> bool {
        self.edits
            .iter()
            .any(|edit| edit.start <= pos && pos < edit.end)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Produce the rewritten text.
    pub fn apply(mut self, source: &str) -> String {
        self.edits.sort_by_key(|edit| edit.start);

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&source[cursor..edit.start]);
            out.push_str(&edit.replacement);
            cursor = edit.end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_offset_order() {
        let mut edits = EditList::new();
        assert!(edits.replace(8, 9, "Z"));
        assert!(edits.replace(0, 3, "xyz"));
        assert_eq!(edits.apply("abc def ghi"), "xyz def Zhi");
    }

    #[test]
    fn test_overlapping_edit_is_rejected() {
        let mut edits = EditList::new();
        assert!(edits.replace(2, 6, ""));
        assert!(!edits.replace(4, 8, ""));
        assert!(edits.replace(6, 8, "!"));
        assert!(edits.contains(3));
        assert!(edits.contains(6));
        assert!(!edits.contains(1));
        assert_eq!(edits.len(), 2);
    }

    #[test]
    fn test_insertion_at_boundary() {
        let mut edits = EditList::new();
        assert!(edits.replace(0, 2, "AB"));
        assert!(edits.replace(2, 2, "-"));
        assert_eq!(edits.apply("abcd"), "AB-cd");
    }
}
