//
// charclass.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! The character-class compiler (spec §4.B): turns a Vim `isfname`-style
//! comma-separated option string into a host character-class fragment.
//!
//! Grounded on `core/src/options.rs`'s hand-rolled `FromStr` parsers for
//! comma-separated `:set` values — same "split on commas, accumulate
//! into a set" shape, generalised to the option-string grammar spec §4.B
//! actually specifies (ranges, the `@` shorthand, `^` removal, and the
//! two literal-comma/literal-dash escape hatches).

use crate::error::CompileError;

/// Which `is*` option this string is compiling for. Controls the
/// type-specific forcing overlay (step 4) and the Unicode tail (step 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassType {
    IsFname,
    IsIdent,
    IsKeyword,
    IsPrint,
    /// Used when a caller just wants the raw code-point set with no
    /// overlay and no Unicode tail (e.g. unit tests of the entry grammar).
    None,
}

const ALPHA_RANGES: &[(u16, u16)] = &[
    (0x41, 0x5a),
    (0x61, 0x7a),
    (0xb5, 0xb5),
    (0xc0, 0xd6),
    (0xd8, 0xf6),
    (0xf8, 0xff),
];

/// Compile an option string to a full bracketed host character class,
/// including the type-specific Unicode tail (spec §4.B point 6) unless
/// `unicode` is false (point 7's escape hatch).
pub fn compile(source: &str, ty: ClassType, unicode: bool) -> Result<String, CompileError> {
    let mut set = CodeSet::new();
    apply_entries(source, &mut set)?;
    apply_overlay(&mut set, ty, unicode);
    Ok(render(&set, ty, unicode))
}

/// `\I`/`\K`/`\F`/`\P` compile the same option string but additionally
/// strip ASCII digits from the main body (spec §4.C's class table).
pub fn compile_excluding_digits(source: &str, ty: ClassType, unicode: bool) -> Result<String, CompileError> {
    let mut set = CodeSet::new();
    apply_entries(source, &mut set)?;
    apply_overlay(&mut set, ty, unicode);
    for c in b'0'..=b'9' {
        set.remove(c as u16);
    }
    Ok(render(&set, ty, unicode))
}

struct CodeSet([bool; 256]);

impl CodeSet {
    fn new() -> Self {
        Self([false; 256])
    }
    fn add(&mut self, start: u16, end: u16) {
        for c in start..=end {
            self.0[c as usize] = true;
        }
    }
    fn remove(&mut self, code: u16) {
        self.0[code as usize] = false;
    }
    fn remove_range(&mut self, start: u16, end: u16) {
        for c in start..=end {
            self.0[c as usize] = false;
        }
    }
}

fn apply_overlay(set: &mut CodeSet, ty: ClassType, unicode: bool) {
    match ty {
        ClassType::IsFname => {
            if unicode {
                set.remove_range(160, 255);
            }
        }
        // The body keeps exactly the caller's ASCII/Latin-1 codes; the
        // Unicode tail in `render` adds the rest (and, for IsKeyword,
        // subtracts this body's range so the two halves don't overlap).
        ClassType::IsIdent | ClassType::IsKeyword => {}
        ClassType::IsPrint => {
            set.add(32, 126);
            if unicode {
                set.remove_range(160, 255);
            }
        }
        ClassType::None => {}
    }
}

fn render(set: &CodeSet, ty: ClassType, unicode: bool) -> String {
    let mut out = String::from("[");
    out.push_str(&emit_ranges(set));
    if unicode {
        match ty {
            ClassType::IsFname | ClassType::IsPrint => out.push_str(r"\xa0-\u{10ffff}"),
            ClassType::IsKeyword => out.push_str(r"[[\p{L}\p{N}\p{Emoji}]--[\x00-\xff]]"),
            ClassType::IsIdent | ClassType::None => {}
        }
    }
    out.push(']');
    out
}

/// Sort the set, collapse runs of >= 3 consecutive codes into `start-end`,
/// and hex-escape every emitted code (spec §4.B point 5).
fn emit_ranges(set: &CodeSet) -> String {
    let mut out = String::new();
    let mut i = 1usize;
    while i <= 255 {
        if !set.0[i] {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        while end + 1 <= 255 && set.0[end + 1] {
            end += 1;
        }
        if end - start + 1 >= 3 {
            out.push_str(&format!(r"\x{:02x}-\x{:02x}", start, end));
        } else {
            for c in start..=end {
                out.push_str(&format!(r"\x{:02x}", c));
            }
        }
        i = end + 1;
    }
    out
}

/// Split `source` into entries honouring the `,,` literal-comma escape
/// (spec §4.B: "`48-57,,,_` is digits, comma, underscore") and the
/// "spaces after commas are trimmed, spaces before commas are not" rule.
fn split_entries(source: &str) -> Vec<String> {
    let chars: Vec<char> = source.chars().collect();
    let n = chars.len();
    let mut entries = Vec::new();
    let mut cur = String::new();
    let mut i = 0;
    let mut trim_leading = false;
    while i < n {
        if trim_leading && chars[i] == ' ' {
            i += 1;
            continue;
        }
        trim_leading = false;
        if chars[i] == ',' {
            if i + 1 < n && chars[i + 1] == ',' {
                if !cur.is_empty() {
                    entries.push(std::mem::take(&mut cur));
                }
                entries.push(",".to_string());
                i += 2;
                if i < n && chars[i] == ',' {
                    i += 1;
                }
                trim_leading = true;
                continue;
            }
            entries.push(std::mem::take(&mut cur));
            i += 1;
            trim_leading = true;
            continue;
        }
        cur.push(chars[i]);
        i += 1;
    }
    entries.push(cur);
    entries
}

fn parse_field(source: &str, field: &str, offset: usize) -> Result<u16, CompileError> {
    if field == "^" {
        return Ok(0x5e);
    }
    if !field.is_empty() && field.chars().all(|c| c.is_ascii_digit()) {
        let n: u32 = field
            .parse()
            .map_err(|_| CompileError::invalid_option_string(source, offset, "Invalid code range"))?;
        if n > 255 {
            return Err(CompileError::invalid_option_string(source, offset, "Invalid code range"));
        }
        return Ok(n as u16);
    }
    let mut chars = field.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let cp = c as u32;
        if cp > 255 {
            return Err(CompileError::invalid_option_string(source, offset, "Invalid code range"));
        }
        return Ok(cp as u16);
    }
    Err(CompileError::invalid_option_string(source, offset, "Invalid code range"))
}

/// A parsed entry value, before the `^` invert prefix is accounted for.
/// Always a list of inclusive ranges (`@` expands to six).
fn parse_value(source: &str, value: &str, offset: usize) -> Result<Vec<(u16, u16)>, CompileError> {
    if value == "@" {
        return Ok(ALPHA_RANGES.to_vec());
    }
    if value == "-" {
        return Ok(vec![(0x2d, 0x2d)]);
    }
    if let Some(rest) = value.strip_prefix("--") {
        if !rest.is_empty() {
            let end = parse_field(source, rest, offset)?;
            return Ok(vec![(0x2d, end)]);
        }
    }
    if let Some(rest) = value.strip_suffix("--") {
        if !rest.is_empty() {
            let start = parse_field(source, rest, offset)?;
            return Ok(vec![(start, 0x2d)]);
        }
    }
    if let Some(idx) = value.find('-') {
        if idx > 0 && idx + 1 < value.len() {
            let left = &value[..idx];
            let right = &value[idx + 1..];
            let start = parse_field(source, left, offset)?;
            let end = parse_field(source, right, offset)?;
            return Ok(vec![(start, end)]);
        }
        return Err(CompileError::invalid_option_string(source, offset, "Invalid code range"));
    }
    let code = parse_field(source, value, offset)?;
    Ok(vec![(code, code)])
}

fn apply_entries(source: &str, set: &mut CodeSet) -> Result<(), CompileError> {
    let entries = split_entries(source);
    let last = entries.len().saturating_sub(1);
    let mut offset = 0usize;
    for (idx, raw) in entries.iter().enumerate() {
        let this_offset = offset;
        offset += raw.chars().count() + 1;
        if raw.is_empty() {
            return Err(CompileError::invalid_option_string(source, this_offset, "Invalid keyword"));
        }
        let (remove, ranges) = if raw == "^-^" {
            (false, vec![(0x5e, 0x5e)])
        } else if raw == "^" {
            if idx == last {
                (false, vec![(0x5e, 0x5e)])
            } else {
                return Err(CompileError::invalid_option_string(source, this_offset, "Invalid keyword"));
            }
        } else if let Some(rest) = raw.strip_prefix('^') {
            (true, parse_value(source, rest, this_offset)?)
        } else {
            (false, parse_value(source, raw, this_offset)?)
        };
        for (start, end) in ranges {
            if !(1 <= start && start <= end && end <= 255) {
                return Err(CompileError::invalid_option_string(source, this_offset, "Invalid code range"));
            }
            if remove {
                set.remove_range(start, end);
            } else {
                set.add(start, end);
            }
        }
    }
    Ok(())
}

/// Wrap an already-compiled class `inner` so it also matches `\n`, for the
/// `\_i`/`\_k`/`\_f`/`\_p` "newline-inclusive" atoms.
pub fn with_newline(inner: &str) -> String {
    format!("[\\n{inner}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_range_and_digit() {
        let out = compile("48-57,_", ClassType::None, true).unwrap();
        assert_eq!(out, r"[\x30-\x39\x5f]");
    }

    #[test]
    fn alpha_shorthand() {
        let out = compile("@", ClassType::None, true).unwrap();
        assert!(out.contains(r"\x41-\x5a"));
        assert!(out.contains(r"\x61-\x7a"));
    }

    #[test]
    fn literal_comma_and_dash() {
        let out = compile("48-57,,,_", ClassType::None, true).unwrap();
        assert_eq!(out, r"[\x2c\x30-\x39\x5f]");
    }

    #[test]
    fn invert_removes_previously_added() {
        let out = compile("48-57,^50", ClassType::None, true).unwrap();
        assert_eq!(out, r"[\x30\x31\x33-\x39]");
    }

    #[test]
    fn bad_range_order_errors() {
        let err = compile("57-48", ClassType::None, true).unwrap_err();
        assert_eq!(err.kind(), crate::error::CompileErrorKind::InvalidOptionString);
    }

    #[test]
    fn isfname_drops_latin1_tail_under_unicode() {
        let out = compile("@,48-57", ClassType::IsFname, true).unwrap();
        assert!(out.ends_with(r"\xa0-\u{10ffff}]"));
        assert!(!out.contains(r"\xc0-\xd6\xd8-\xf6\xf8-\xff")); // ascii-only alpha kept, tail supplies >0xff separately
    }

    #[test]
    fn isident_has_no_unicode_tail() {
        let out = compile("@,48-57,_,192-255", ClassType::IsIdent, true).unwrap();
        assert!(!out.contains("\\u{10ffff}"));
    }

    #[test]
    fn iskeyword_tail_is_set_difference() {
        let out = compile("@,48-57,_,192-255", ClassType::IsKeyword, true).unwrap();
        assert!(out.contains(r"[[\p{L}\p{N}\p{Emoji}]--[\x00-\xff]]"));
    }

    #[test]
    fn unicode_false_keeps_latin1_tail_in_isfname() {
        let out = compile("@", ClassType::IsFname, false).unwrap();
        assert!(out.contains(r"\xc0-\xd6"));
        assert!(!out.contains("10ffff"));
    }

    #[test]
    fn excluding_digits_strips_ascii_digits() {
        let out = compile_excluding_digits("@,48-57,_", ClassType::None, true).unwrap();
        assert!(!out.contains(r"\x30-\x39"));
    }

    #[test]
    fn invalid_option_string_example_from_spec() {
        // scenario 7 of spec §8: "XYZ" as an isfname option string
        let err = compile("XYZ", ClassType::IsFname, true).unwrap_err();
        assert_eq!(err.kind(), crate::error::CompileErrorKind::InvalidOptionString);
        assert_eq!(err.offset(), 0);
    }
}
