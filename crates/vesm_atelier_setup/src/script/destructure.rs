//! Binding names of destructuring patterns.
//!
//! Patterns are handled as text and are expected to be comment-free.

use vesm_carton::is_identifier;

/// Names bound by an object (`{...}`) or array (`[...]`) pattern, in order.
///
/// Renamed keys bind their right-hand side, nested patterns are recursed and
/// `= default` suffixes are stripped. Tokens that are not plain identifiers
/// are dropped.
pub fn extract_bindings(pattern: &str) -> Vec<&str> {
    let mut names = Vec::new();
    collect(pattern.trim(), &mut names);
    names
}

fn collect<'a>(pattern: &'a str, names: &mut Vec<&'a str>) {
    let is_object = pattern.starts_with('{') && pattern.ends_with('}');
    let is_array = pattern.starts_with('[') && pattern.ends_with(']');
    if !is_object && !is_array {
        return;
    }

    for element in split_elements(&pattern[1..pattern.len() - 1]) {
        if let Some(rest) = element.strip_prefix("...") {
            names.extend(binding_name(rest));
            continue;
        }

        let target = match find_top_level_colon(element) {
            Some(colon) if is_object => element[colon + 1..].trim(),
            _ => element,
        };
        if target.starts_with('{') || target.starts_with('[') {
            collect(nested_pattern(target), names);
        } else {
            names.extend(binding_name(target));
        }
    }
}

/// Identifier of `name = default`, if valid.
fn binding_name(element: &str) -> Option<&str> {
    let name = element.split('=').next().unwrap_or_default().trim();
    is_identifier(name).then_some(name)
}

/// Split on commas outside `{}`, `[]`, `()` and quoted strings.
fn split_elements(code: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let bytes = code.as_bytes();

    for (i, &ch) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if ch == q && !is_escaped(bytes, i) {
                quote = None;
            }
            continue;
        }
        match ch {
            b'\'' | b'"' | b'`' => quote = Some(ch),
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(code[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(code[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

/// Offset of the first `:` outside nested delimiters and strings.
fn find_top_level_colon(element: &str) -> Option<usize> {
    let bytes = element.as_bytes();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;

    for (i, &ch) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if ch == q && !is_escaped(bytes, i) {
                quote = None;
            }
            continue;
        }
        match ch {
            b'\'' | b'"' | b'`' => quote = Some(ch),
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth -= 1,
            b':' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// The leading balanced pattern of `value`, without any `= default` tail.
fn nested_pattern(value: &str) -> &str {
    let bytes = value.as_bytes();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;

    for (i, &ch) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if ch == q && !is_escaped(bytes, i) {
                quote = None;
            }
            continue;
        }
        match ch {
            b'\'' | b'"' | b'`' => quote = Some(ch),
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth -= 1;
                if depth == 0 {
                    return &value[..=i];
                }
            }
            _ => {}
        }
    }
    value
}

/// Whether the byte at `pos` is preceded by an odd run of backslashes.
fn is_escaped(bytes: &[u8], pos: usize) -> bool {
    bytes[..pos]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
        % 2
        == 1
}
