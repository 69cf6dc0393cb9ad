//! Top-level binding collection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use vesm_carton::{CompactString, FxHashSet, ScanTable};

use crate::script::{extract_balanced, extract_bindings};

static DECLARATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=").unwrap());

static OBJECT_PATTERN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:const|let|var)\s+\{").unwrap());

static ARRAY_PATTERN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:const|let|var)\s+\[").unwrap());

static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*\(").unwrap()
});

static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z_$][\w$]*)").unwrap());

/// Ordered, duplicate-free set of names returned from setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BindingSet {
    names: Vec<CompactString>,
    #[serde(skip)]
    seen: FxHashSet<CompactString>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` unless already present. Returns whether it was added.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.into());
        self.names.push(name.into());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Collect names declared at brace and paren depth 0 of `source`.
///
/// `source` must already be comment-free. Declarations are gathered pass by
/// pass: simple `const`/`let`/`var`, object patterns, array patterns,
/// functions, then classes. Names rejected by `is_excluded` are skipped.
pub(crate) fn collect_bindings(source: &str, is_excluded: impl Fn(&str) -> bool) -> BindingSet {
    let table = ScanTable::new(source);
    let mut bindings = BindingSet::new();
    let at_top = |pos: usize| {
        table.is_code(pos) && table.depth_at(pos) == 0 && table.paren_depth_at(pos) == 0
    };
    let add = |bindings: &mut BindingSet, name: &str| {
        if !is_excluded(name) {
            bindings.insert(name);
        }
    };

    for caps in DECLARATION_RE.captures_iter(source) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            if at_top(whole.start()) {
                add(&mut bindings, name.as_str());
            }
        }
    }

    for (re, open, close) in [
        (&OBJECT_PATTERN_RE, b'{', b'}'),
        (&ARRAY_PATTERN_RE, b'[', b']'),
    ] {
        for found in re.find_iter(source) {
            if !at_top(found.start()) {
                continue;
            }
            let Some(pattern) = extract_balanced(&table, found.end() - 1, open, close) else {
                continue;
            };
            if !source[pattern.end_exclusive()..].trim_start().starts_with('=') {
                continue;
            }
            for name in extract_bindings(pattern.text) {
                add(&mut bindings, name);
            }
        }
    }

    for re in [&FUNCTION_RE, &CLASS_RE] {
        for caps in re.captures_iter(source) {
            if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
                if at_top(whole.start()) {
                    add(&mut bindings, name.as_str());
                }
            }
        }
    }

    bindings
}
