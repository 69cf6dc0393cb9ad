//! Lexical state scanner.
//!
//! A byte-level state machine that tracks whether the cursor is inside a
//! quoted string, a template literal, a line comment, or a block comment.
//! It never produces tokens; callers only ask "is this byte source code, and
//! how deep in braces is it?".
//!
//! [`ScanTable`] replays [`advance`] once over a text and records the answer
//! for every byte, so the higher-level passes (balanced extraction, macro
//! lookup, depth tracking) share one precomputed table instead of rescanning
//! from offset zero at every query.
//!
//! Template literals are opaque: `${ ... }` interpolations are not tracked,
//! so braces inside them are never counted and a nested backtick closes the
//! enclosing literal early.

/// Lexical mode at a given position.
///
/// The variants are mutually exclusive, so at most one of "in string",
/// "in template", "in line comment" and "in block comment" holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanState {
    /// Plain source code
    #[default]
    Code,
    /// Inside a `'...'` or `"..."` string
    String {
        /// The quote byte that opened the string
        delimiter: u8,
    },
    /// Inside a backtick template literal
    Template,
    /// Inside a `// ...` comment (ends at the newline)
    LineComment,
    /// Inside a `/* ... */` comment
    BlockComment,
}

impl ScanState {
    #[inline]
    pub fn is_code(self) -> bool {
        matches!(self, ScanState::Code)
    }

    #[inline]
    pub fn in_string(self) -> bool {
        matches!(self, ScanState::String { .. })
    }

    /// The quote character of the current string, if any.
    #[inline]
    pub fn string_delimiter(self) -> Option<char> {
        match self {
            ScanState::String { delimiter } => Some(delimiter as char),
            _ => None,
        }
    }

    #[inline]
    pub fn in_template(self) -> bool {
        matches!(self, ScanState::Template)
    }

    #[inline]
    pub fn in_line_comment(self) -> bool {
        matches!(self, ScanState::LineComment)
    }

    #[inline]
    pub fn in_block_comment(self) -> bool {
        matches!(self, ScanState::BlockComment)
    }

    /// Whether the state is any kind of comment.
    #[inline]
    pub fn in_comment(self) -> bool {
        matches!(self, ScanState::LineComment | ScanState::BlockComment)
    }
}

/// Result of consuming one lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// State after the consumed bytes
    pub next: ScanState,
    /// Number of bytes consumed (1, or 2 for comment delimiters and escapes)
    pub width: usize,
    /// Whether the consumed bytes are structural code
    pub code: bool,
}

impl Step {
    #[inline]
    const fn new(next: ScanState, width: usize, code: bool) -> Self {
        Self { next, width, code }
    }
}

/// Consume the byte (or byte pair) at `pos` in `state`.
///
/// Two bytes are consumed for `//`, `/*` and `*/`, and for a backslash escape
/// inside a string or template literal. Quote, backtick and comment delimiter
/// bytes are never reported as code.
///
/// `pos` must be in bounds.
pub fn advance(code: &[u8], pos: usize, state: ScanState) -> Step {
    let ch = code[pos];
    let next = code.get(pos + 1).copied();
    // An escape at the very end of the input has nothing to consume.
    let escape_width = if next.is_some() { 2 } else { 1 };

    match state {
        ScanState::LineComment => {
            if ch == b'\n' {
                Step::new(ScanState::Code, 1, false)
            } else {
                Step::new(state, 1, false)
            }
        }
        ScanState::BlockComment => {
            if ch == b'*' && next == Some(b'/') {
                Step::new(ScanState::Code, 2, false)
            } else {
                Step::new(state, 1, false)
            }
        }
        ScanState::String { delimiter } => {
            if ch == b'\\' {
                Step::new(state, escape_width, false)
            } else if ch == delimiter {
                Step::new(ScanState::Code, 1, false)
            } else {
                Step::new(state, 1, false)
            }
        }
        ScanState::Template => match ch {
            b'\\' => Step::new(state, escape_width, false),
            b'`' => Step::new(ScanState::Code, 1, false),
            _ => Step::new(state, 1, false),
        },
        ScanState::Code => match (ch, next) {
            (b'/', Some(b'/')) => Step::new(ScanState::LineComment, 2, false),
            (b'/', Some(b'*')) => Step::new(ScanState::BlockComment, 2, false),
            (b'`', _) => Step::new(ScanState::Template, 1, false),
            (b'"' | b'\'', _) => Step::new(ScanState::String { delimiter: ch }, 1, false),
            _ => Step::new(ScanState::Code, 1, true),
        },
    }
}

/// Per-byte scan information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    state: ScanState,
    code: bool,
    brace: i32,
    paren: i32,
}

/// Position-indexed lexical table for one text.
///
/// Built with a single forward pass; every query afterwards is O(1).
#[derive(Debug, Clone)]
pub struct ScanTable<'a> {
    source: &'a str,
    entries: Vec<Entry>,
    final_brace: i32,
    final_paren: i32,
    final_state: ScanState,
}

impl<'a> ScanTable<'a> {
    /// Scan `source` from offset zero.
    pub fn new(source: &'a str) -> Self {
        let bytes = source.as_bytes();
        let mut entries = Vec::with_capacity(bytes.len());
        let mut state = ScanState::Code;
        let mut brace = 0i32;
        let mut paren = 0i32;
        let mut pos = 0;

        while pos < bytes.len() {
            let step = advance(bytes, pos, state);
            for _ in 0..step.width {
                entries.push(Entry {
                    state,
                    code: step.code,
                    brace,
                    paren,
                });
            }
            if step.code {
                match bytes[pos] {
                    b'{' => brace += 1,
                    b'}' => brace -= 1,
                    b'(' => paren += 1,
                    b')' => paren -= 1,
                    _ => {}
                }
            }
            state = step.next;
            pos += step.width;
        }

        Self {
            source,
            entries,
            final_brace: brace,
            final_paren: paren,
            final_state: state,
        }
    }

    /// The scanned text.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lexical state in effect when the byte at `pos` is consumed.
    ///
    /// At `pos == len()` this is the state after the whole text.
    #[inline]
    pub fn state_at(&self, pos: usize) -> ScanState {
        self.entries
            .get(pos)
            .map_or(self.final_state, |entry| entry.state)
    }

    /// Whether the byte at `pos` is structural code.
    #[inline]
    pub fn is_code(&self, pos: usize) -> bool {
        self.entries.get(pos).is_some_and(|entry| entry.code)
    }

    /// Brace depth before the byte at `pos`.
    #[inline]
    pub fn depth_at(&self, pos: usize) -> i32 {
        self.entries
            .get(pos)
            .map_or(self.final_brace, |entry| entry.brace)
    }

    /// Paren depth before the byte at `pos`.
    #[inline]
    pub fn paren_depth_at(&self, pos: usize) -> i32 {
        self.entries
            .get(pos)
            .map_or(self.final_paren, |entry| entry.paren)
    }

    /// First code byte equal to `byte` at or after `from`.
    pub fn find_code_byte(&self, byte: u8, from: usize) -> Option<usize> {
        let bytes = self.bytes();
        (from..bytes.len()).find(|&i| bytes[i] == byte && self.is_code(i))
    }

    /// Copy of the text with every comment removed.
    ///
    /// Newlines that terminate line comments are kept so line structure
    /// survives.
    pub fn strip_comments(&self) -> String {
        let bytes = self.bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut pos = 0;

        while pos < bytes.len() {
            let state = self.state_at(pos);
            let step = advance(bytes, pos, state);
            let keep = match state {
                ScanState::LineComment => bytes[pos] == b'\n',
                ScanState::BlockComment => false,
                ScanState::Code => !step.next.in_comment(),
                ScanState::String { .. } | ScanState::Template => true,
            };
            if keep {
                out.extend_from_slice(&bytes[pos..pos + step.width]);
            }
            pos += step.width;
        }

        // Only whole ASCII delimiters were dropped, so the bytes stay valid UTF-8.
        String::from_utf8(out).unwrap_or_default()
    }
}
