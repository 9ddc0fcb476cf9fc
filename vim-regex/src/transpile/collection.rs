//
// collection.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! The `[...]` collection sub-parser (spec §4.C "Collections"). Kept as
//! a standalone function operating on a subslice, per spec §9's explicit
//! instruction not to fold collection tokenising into the main scanner's
//! state machine beyond recognising the outer brackets.

use crate::charclass::{self, ClassType};
use crate::error::CompileError;
use crate::options::Options;

const RESERVED: &str = "!#$%&()*+,./:;<=>?@[]^`{|}~-";

enum Atom {
    Char(u32),
    Fragment(String),
}

/// Parses a collection starting at `input[0] == '['`. Returns `Ok(None)`
/// if no closing `]` exists anywhere later in `input` — per spec, that
/// makes the `[` a literal character rather than a parse error.
///
/// On success, returns the rendered host fragment (including its own
/// `[`/`]`) and the number of bytes of `input` consumed (from the `[`
/// through the matching `]` inclusive).
pub fn parse(input: &str, source: &str, base_offset: usize, options: &Options) -> Result<Option<(String, usize)>, CompileError> {
    let chars: Vec<char> = input.chars().collect();
    debug_assert_eq!(chars.first(), Some(&'['));
    if !chars.iter().skip(1).any(|&c| c == ']') {
        return Ok(None);
    }

    let mut pos = 1usize;
    let mut negate = false;
    if chars.get(pos) == Some(&'^') {
        negate = true;
        pos += 1;
    }
    let mut members = String::new();
    if chars.get(pos) == Some(&']') {
        members.push_str("\\x5d");
        pos += 1;
    }

    loop {
        match chars.get(pos) {
            None => return Ok(None),
            Some(']') => {
                pos += 1;
                break;
            }
            Some('[') if chars[pos..].starts_with(&['[', ':']) => {
                let (frag, next) = parse_posix_class(&chars, pos, source, base_offset, options)?;
                members.push_str(&frag);
                pos = next;
            }
            Some('[') if chars[pos..].starts_with(&['[', '=']) => {
                return Err(unsupported_equiv(&chars, pos, source, base_offset, '='));
            }
            Some('[') if chars[pos..].starts_with(&['[', '.']) => {
                return Err(unsupported_equiv(&chars, pos, source, base_offset, '.'));
            }
            Some(_) => {
                let (atom, next) = scan_atom(&chars, pos, source, base_offset)?;
                if next < chars.len() && chars[next] == '-' && chars.get(next + 1) != Some(&']') && next + 1 < chars.len() {
                    if let Atom::Char(start_cp) = atom {
                        let (atom2, next2) = scan_atom(&chars, next + 1, source, base_offset)?;
                        if let Atom::Char(end_cp) = atom2 {
                            members.push_str(&render_char(start_cp));
                            members.push('-');
                            members.push_str(&render_char(end_cp));
                            pos = next2;
                            continue;
                        } else {
                            members.push_str(&render_atom(&Atom::Char(start_cp)));
                            members.push_str(&render_char(0x2d));
                            members.push_str(&render_atom(&atom2));
                            pos = next2;
                            continue;
                        }
                    }
                }
                members.push_str(&render_atom(&atom));
                pos = next;
            }
        }
    }

    let mut out = String::from("[");
    if negate {
        out.push('^');
    }
    out.push_str(&members);
    out.push(']');
    Ok(Some((out, pos)))
}

fn unsupported_equiv(chars: &[char], pos: usize, source: &str, base_offset: usize, marker: char) -> CompileError {
    if let Some(end) = chars[pos + 2..].iter().position(|&c| c == marker).map(|i| pos + 2 + i) {
        if chars.get(end + 1) == Some(&']') {
            let token: String = chars[pos + 1..=end + 1].iter().collect();
            return CompileError::unsupported(source, base_offset + pos, token);
        }
    }
    CompileError::invalid_pattern(source, base_offset + pos, "Invalid char class")
}

fn parse_posix_class(chars: &[char], pos: usize, source: &str, base_offset: usize, options: &Options) -> Result<(String, usize), CompileError> {
    let close = chars[pos + 2..]
        .iter()
        .collect::<String>()
        .find(":]")
        .map(|i| pos + 2 + i);
    let close = match close {
        Some(c) => c,
        None => return Err(CompileError::invalid_pattern(source, base_offset + pos, "Invalid char class")),
    };
    let name: String = chars[pos + 2..close].iter().collect();
    let frag = match name.as_str() {
        "alnum" => "0-9A-Za-z".to_string(),
        "alpha" => "A-Za-z".to_string(),
        "blank" => " \\t".to_string(),
        "cntrl" => "\\x00-\\x1f\\x7f".to_string(),
        "digit" => "0-9".to_string(),
        "graph" => "\\x21-\\x7e".to_string(),
        "lower" => "a-z".to_string(),
        "punct" => "\\x21-\\x2f\\x3a-\\x40\\x5b-\\x60\\x7b-\\x7e".to_string(),
        "space" => "\\x09\\x0a\\x0b\\x0c\\x0d\\x20".to_string(),
        "upper" => "A-Z".to_string(),
        "xdigit" => "0-9A-Fa-f".to_string(),
        "fname" => charclass::compile(&options.isfname, ClassType::IsFname, true)?,
        "ident" => charclass::compile(&options.isident, ClassType::IsIdent, true)?,
        "keyword" => charclass::compile(&options.iskeyword, ClassType::IsKeyword, true)?,
        // Vim's `[:print:]` is tied to the `isprint` option rather than
        // the fixed ASCII print range, so it takes the option-compiler
        // path instead of a literal range like the other POSIX names.
        "print" => charclass::compile(&options.isprint, ClassType::IsPrint, true)?,
        _ => return Err(CompileError::invalid_pattern(source, base_offset + pos, "Invalid char class")),
    };
    Ok((frag, close + 2))
}

fn scan_atom(chars: &[char], pos: usize, source: &str, base_offset: usize) -> Result<(Atom, usize), CompileError> {
    match chars[pos] {
        '\\' => scan_escape(chars, pos, source, base_offset),
        c => Ok((Atom::Char(c as u32), pos + 1)),
    }
}

fn scan_escape(chars: &[char], pos: usize, source: &str, base_offset: usize) -> Result<(Atom, usize), CompileError> {
    let next = match chars.get(pos + 1) {
        Some(&c) => c,
        None => return Ok((Atom::Char('\\' as u32), pos + 1)),
    };
    match next {
        'n' => Ok((Atom::Char('\n' as u32), pos + 2)),
        't' => Ok((Atom::Char('\t' as u32), pos + 2)),
        'r' => Ok((Atom::Char('\r' as u32), pos + 2)),
        'e' => Ok((Atom::Char(0x1b), pos + 2)),
        'b' => Ok((Atom::Char(0x08), pos + 2)),
        'd' | 'o' | 'x' | 'u' | 'U' => {
            let (value, consumed) = super::numeric::parse_numeric_ref(chars, pos + 1, next);
            Ok((Atom::Char(value), pos + 1 + consumed))
        }
        ']' | '^' | '\\' | '-' => Ok((Atom::Char(next as u32), pos + 2)),
        other => Ok((Atom::Char(other as u32), pos + 2)),
    }
}

fn render_atom(atom: &Atom) -> String {
    match atom {
        Atom::Char(cp) => render_char(*cp),
        Atom::Fragment(s) => s.clone(),
    }
}

fn render_char(cp: u32) -> String {
    if cp <= 0x7f {
        let c = char::from_u32(cp).unwrap();
        match c {
            '\n' => "\\n".to_string(),
            '\t' => "\\t".to_string(),
            '\r' => "\\r".to_string(),
            _ if RESERVED.contains(c) => format!("\\x{:02x}", cp),
            _ if c.is_control() => format!("\\x{:02x}", cp),
            _ => c.to_string(),
        }
    } else if cp <= 0xff {
        format!("\\x{:02x}", cp)
    } else if cp <= 0xffff {
        format!("\\u{:04x}", cp)
    } else {
        format!("\\u{{{:x}}}", cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> Options {
        Options::default()
    }

    #[test]
    fn simple_set() {
        let (out, len) = parse("[xyz]", "[xyz]", 0, &opts()).unwrap().unwrap();
        assert_eq!(out, "[xyz]");
        assert_eq!(len, 5);
    }

    #[test]
    fn negated_range() {
        let (out, _) = parse("[^a-z]", "[^a-z]", 0, &opts()).unwrap().unwrap();
        assert_eq!(out, "[^a-z]");
    }

    #[test]
    fn leading_bracket_is_literal() {
        let (out, len) = parse("[]a]", "[]a]", 0, &opts()).unwrap().unwrap();
        assert_eq!(out, "[\\x5da]");
        assert_eq!(len, 4);
    }

    #[test]
    fn unclosed_is_none() {
        assert!(parse("[abc", "[abc", 0, &opts()).unwrap().is_none());
    }

    #[test]
    fn reserved_literal_is_escaped() {
        let (out, _) = parse("[+]", "[+]", 0, &opts()).unwrap().unwrap();
        assert_eq!(out, "[\\x2b]");
    }

    #[test]
    fn trailing_dash_is_literal() {
        let (out, _) = parse("[a-z-]", "[a-z-]", 0, &opts()).unwrap().unwrap();
        assert_eq!(out, "[a-z\\x2d]");
    }

    #[test]
    fn posix_alpha() {
        let (out, _) = parse("[[:alpha:]]", "[[:alpha:]]", 0, &opts()).unwrap().unwrap();
        assert_eq!(out, "[A-Za-z]");
    }

    #[test]
    fn equivalence_class_unsupported() {
        let err = parse("[[=a=]]", "[[=a=]]", 0, &opts()).unwrap_err();
        assert_eq!(err.kind(), crate::error::CompileErrorKind::UnsupportedFeature);
    }

    #[test]
    fn collation_element_unsupported() {
        let err = parse("[[.a.]]", "[[.a.]]", 0, &opts()).unwrap_err();
        assert_eq!(err.kind(), crate::error::CompileErrorKind::UnsupportedFeature);
    }

    #[test]
    fn hex_escape_inside_collection() {
        let (out, _) = parse(r"[\x41-\x5a]", r"[\x41-\x5a]", 0, &opts()).unwrap().unwrap();
        assert_eq!(out, "[A-Z]");
    }
}
