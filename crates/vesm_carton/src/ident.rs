//! Identifier helpers.
//!
//! Identifiers follow the ASCII subset of JavaScript names: a letter, `_` or
//! `$`, followed by letters, digits, `_` or `$`.

/// Whether `byte` can appear inside an identifier.
#[inline]
pub fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

/// Whether `byte` can start an identifier.
#[inline]
pub fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

/// Check if a string is a valid identifier.
pub fn is_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.split_first() {
        Some((first, rest)) => is_ident_start(*first) && rest.iter().all(|b| is_ident_byte(*b)),
        None => false,
    }
}

/// Whether `word` occurs at `pos` in `bytes` as a whole word.
pub fn is_word_at(bytes: &[u8], pos: usize, word: &str) -> bool {
    let end = pos + word.len();
    if end > bytes.len() || &bytes[pos..end] != word.as_bytes() {
        return false;
    }
    let before = pos.checked_sub(1).map(|i| bytes[i]);
    let after = bytes.get(end).copied();
    !before.is_some_and(is_ident_byte) && !after.is_some_and(is_ident_byte)
}
