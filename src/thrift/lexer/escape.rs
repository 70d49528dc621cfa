//! String literal escapes
//!
//! Accepted escapes: `\\`, `\"`, `\'`, `\n`, `\r`, `\t`, `\0` and `\u{X}` with
//! one to six hex digits naming a Unicode scalar value. [`escape`] only emits
//! escapes from that set, so written strings read back unchanged.

/// Position of a bad escape, relative to the start of the literal's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeError {
    pub offset: usize,
    pub len: usize,
}

/// Decode the contents of a string literal (without its quotes)
pub fn unescape(raw: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let bad = |end: usize| EscapeError {
            offset: start,
            len: end - start,
        };
        let Some((at, code)) = chars.next() else {
            return Err(bad(raw.len()));
        };
        let decoded = match code {
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            'u' => {
                let rest = &raw[at + 1..];
                let close = rest
                    .strip_prefix('{')
                    .and_then(|body| body.find('}'))
                    .ok_or_else(|| bad(at + 1))?;
                let digits = &rest[1..close + 1];
                let end = at + 1 + close + 2;
                if digits.is_empty()
                    || digits.len() > 6
                    || !digits.bytes().all(|b| b.is_ascii_hexdigit())
                {
                    return Err(bad(end));
                }
                let scalar = u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| bad(end))?;
                while chars.peek().is_some_and(|&(i, _)| i < end) {
                    chars.next();
                }
                scalar
            }
            other => return Err(bad(at + other.len_utf8())),
        };
        out.push(decoded);
    }

    Ok(out)
}

/// Encode a string value as the contents of a double-quoted literal
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
