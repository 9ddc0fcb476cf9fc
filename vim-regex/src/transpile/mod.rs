//
// mod.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! The regex transpiler (component C): a single-pass, recursive-descent
//! translation from a Vim pattern plus magicness state to host source.
//!
//! The buffer-rewrite model spec §9 describes for the `$`-anchor and
//! `\@`-lookaround rewrites is realised here without a mutable token
//! buffer: both rewrites only ever need to know what comes immediately
//! before or after the current position, which a short lookahead (for
//! `$`) or the return value of the previous parse call (for `\@`)
//! already gives us. Recursion handles nesting for free.

mod collection;
mod numeric;

use log::{debug, trace};

use crate::charclass::{self, ClassType};
use crate::error::CompileError;
use crate::magic::{Magic, Ordinary};
use crate::options::Options;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ctx {
    Top,
    Group,
}

struct ParsedAtom {
    rendered: String,
    /// Set only when this atom was exactly one `\(...\)` or `\%(...\)`
    /// group, so a following `\@=`-style lookaround can rewrite it.
    group_inner: Option<String>,
}

impl ParsedAtom {
    fn atom(rendered: String) -> Self {
        Self { rendered, group_inner: None }
    }
    fn empty() -> Self {
        Self { rendered: String::new(), group_inner: None }
    }
    fn group(rendered: String, inner: String) -> Self {
        Self { rendered, group_inner: Some(inner) }
    }
}

struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    source: String,
    options: &'a Options,
    magic: Magic,
    ignorecase: Option<bool>,
}

/// Compiles a Vim pattern to host source. Returns the host source and
/// whether ignore-case is in force once `\c`/`\C` overrides and
/// `smartcase` are taken into account.
pub fn compile(source: &str, options: &Options) -> Result<(String, bool), CompileError> {
    let mut scanner = Scanner {
        chars: source.chars().collect(),
        pos: 0,
        source: source.to_string(),
        options,
        magic: Magic::initial(options.magic),
        ignorecase: None,
    };
    let body = scanner.parse_alternation(Ctx::Top)?;
    if !scanner.at_end() {
        return Err(CompileError::invalid_pattern(scanner.source.clone(), scanner.byte_offset(scanner.pos), "Unmatched closing group"));
    }
    let ignorecase = scanner.ignorecase.unwrap_or_else(|| options.effective_ignorecase(source));
    debug!("compiled pattern `{source}` to {} bytes of host source, ignorecase={ignorecase}", body.len());
    Ok((body, ignorecase))
}

impl<'a> Scanner<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn peek_str(&self, s: &str) -> bool {
        let want: Vec<char> = s.chars().collect();
        if self.pos + want.len() > self.chars.len() {
            return false;
        }
        self.chars[self.pos..self.pos + want.len()] == want[..]
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn try_consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.advance(1);
            true
        } else {
            false
        }
    }

    fn consume_digits(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                out.push(c);
                self.advance(1);
            } else {
                break;
            }
        }
        out
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.chars[..char_pos.min(self.chars.len())].iter().map(|c| c.len_utf8()).sum()
    }

    fn err_invalid(&self, at: usize, message: &str) -> CompileError {
        CompileError::invalid_pattern(self.source.clone(), self.byte_offset(at), message)
    }

    /// Peeks (without consuming) whether `ord`'s bare or escaped spelling
    /// is present at the current position, and whether that spelling is
    /// the metacharacter one at the current level.
    fn try_ordinary(&self, ord: Ordinary) -> Option<(bool, usize)> {
        let c = ordinary_char(ord);
        if self.peek_char() == Some(c) {
            return Some((ord.is_meta(self.magic, false), 1));
        }
        if self.peek_char() == Some('\\') && self.peek_char_at(1) == Some(c) {
            return Some((ord.is_meta(self.magic, true), 2));
        }
        None
    }

    fn peek_ordinary_meta(&self, ord: Ordinary) -> bool {
        matches!(self.try_ordinary(ord), Some((true, _)))
    }

    fn at_branch_end(&self, ctx: Ctx) -> bool {
        self.at_end() || self.peek_ordinary_meta(Ordinary::Pipe) || (ctx == Ctx::Group && self.peek_ordinary_meta(Ordinary::RParen))
    }

    fn at_segment_end(&self, ctx: Ctx) -> bool {
        self.at_branch_end(ctx) || self.peek_ordinary_meta(Ordinary::Ampersand)
    }

    fn try_mode_switch(&mut self) -> Option<Magic> {
        if self.peek_char() == Some('\\') {
            if let Some(level) = self.peek_char_at(1).and_then(Magic::from_switch) {
                self.advance(2);
                return Some(level);
            }
        }
        None
    }

    fn try_ignorecase_switch(&mut self) -> Option<bool> {
        if self.peek_str("\\c") {
            self.advance(2);
            return Some(true);
        }
        if self.peek_str("\\C") {
            self.advance(2);
            return Some(false);
        }
        None
    }

    // ---- grammar ----

    fn parse_alternation(&mut self, ctx: Ctx) -> Result<String, CompileError> {
        let mut branches = vec![self.parse_branch(ctx)?];
        while self.peek_ordinary_meta(Ordinary::Pipe) {
            let (_, len) = self.try_ordinary(Ordinary::Pipe).unwrap();
            self.advance(len);
            branches.push(self.parse_branch(ctx)?);
        }
        Ok(branches.join("|"))
    }

    fn parse_branch(&mut self, ctx: Ctx) -> Result<String, CompileError> {
        let mut segments = vec![self.parse_concat_segment(ctx)?];
        while self.peek_ordinary_meta(Ordinary::Ampersand) {
            let (_, len) = self.try_ordinary(Ordinary::Ampersand).unwrap();
            self.advance(len);
            segments.push(self.parse_concat_segment(ctx)?);
        }
        if segments.len() == 1 {
            return Ok(segments.pop().unwrap());
        }
        let last = segments.pop().unwrap();
        let prefix: String = segments.iter().map(|s| format!("(?={})", s)).collect();
        Ok(prefix + &last)
    }

    fn parse_concat_segment(&mut self, ctx: Ctx) -> Result<String, CompileError> {
        let mut out = String::new();
        let mut at_start = true;
        while !self.at_segment_end(ctx) {
            let (rendered, is_newline_atom) = self.parse_quantified_atom(ctx, at_start)?;
            if !rendered.is_empty() {
                at_start = is_newline_atom;
            }
            out.push_str(&rendered);
        }
        Ok(out)
    }

    fn parse_quantified_atom(&mut self, ctx: Ctx, at_start: bool) -> Result<(String, bool), CompileError> {
        let atom = self.parse_one_atom(ctx, at_start)?;
        if atom.rendered.is_empty() && atom.group_inner.is_none() {
            return Ok((String::new(), at_start));
        }
        let is_newline_atom = atom.rendered == "\n";
        if let Some(lookaround_offset) = self.peek_lookaround_start() {
            if let Some(inner) = &atom.group_inner {
                let head = self.consume_lookaround(lookaround_offset)?;
                return Ok((format!("({}{})", head, inner), false));
            }
            return Err(self.err_invalid(lookaround_offset, "Nothing to repeat"));
        }
        if let Some(quant) = self.try_parse_quantifier()? {
            return Ok((format!("{}{}", atom.rendered, quant), false));
        }
        Ok((atom.rendered, is_newline_atom))
    }

    fn peek_lookaround_start(&self) -> Option<usize> {
        if self.peek_ordinary_meta(Ordinary::At) {
            Some(self.pos)
        } else {
            None
        }
    }

    fn consume_lookaround(&mut self, start: usize) -> Result<String, CompileError> {
        let (_, len) = self.try_ordinary(Ordinary::At).unwrap();
        self.advance(len);
        self.consume_digits(); // numeric lookbehind-distance prefix, accepted and ignored
        match self.peek_char() {
            Some('=') => {
                self.advance(1);
                Ok("?=".to_string())
            }
            Some('!') => {
                self.advance(1);
                Ok("?!".to_string())
            }
            Some('>') => {
                self.advance(1);
                let token: String = self.chars[start..self.pos].iter().collect();
                Err(CompileError::unsupported(self.source.clone(), self.byte_offset(start), token))
            }
            Some('<') => {
                self.advance(1);
                match self.peek_char() {
                    Some('=') => {
                        self.advance(1);
                        Ok("?<=".to_string())
                    }
                    Some('!') => {
                        self.advance(1);
                        Ok("?<!".to_string())
                    }
                    _ => Err(self.err_invalid(start, "Nothing to repeat")),
                }
            }
            _ => Err(self.err_invalid(start, "Nothing to repeat")),
        }
    }

    fn try_parse_quantifier(&mut self) -> Result<Option<String>, CompileError> {
        if let Some((true, len)) = self.try_ordinary(Ordinary::Star) {
            self.advance(len);
            return Ok(Some("*".to_string()));
        }
        if let Some((true, len)) = self.try_ordinary(Ordinary::Plus) {
            self.advance(len);
            return Ok(Some("+".to_string()));
        }
        if let Some((true, len)) = self.try_ordinary(Ordinary::Equals) {
            self.advance(len);
            return Ok(Some("?".to_string()));
        }
        if let Some((true, len)) = self.try_ordinary(Ordinary::Question) {
            self.advance(len);
            return Ok(Some("?".to_string()));
        }
        if let Some((true, len)) = self.try_ordinary(Ordinary::LBrace) {
            let start = self.pos;
            self.advance(len);
            let lazy = self.try_consume_char('-');
            let min_str = self.consume_digits();
            let has_comma = self.try_consume_char(',');
            let max_str = if has_comma { self.consume_digits() } else { min_str.clone() };
            if !self.try_consume_char('}') {
                return Err(self.err_invalid(start, "Incomplete quantifier"));
            }
            return Ok(Some(render_bounded_quantifier(&min_str, &max_str, has_comma, lazy)));
        }
        Ok(None)
    }

    fn parse_one_atom(&mut self, ctx: Ctx, at_start: bool) -> Result<ParsedAtom, CompileError> {
        loop {
            if let Some(level) = self.try_mode_switch() {
                trace!("magic level switched to {level:?} at byte {}", self.byte_offset(self.pos));
                self.magic = level;
                continue;
            }
            if let Some(ic) = self.try_ignorecase_switch() {
                self.ignorecase = Some(ic);
                continue;
            }
            break;
        }

        if self.at_segment_end(ctx) {
            return Ok(ParsedAtom::empty());
        }
        trace!("dispatching atom `{:?}` at byte {}", self.peek_char(), self.byte_offset(self.pos));

        if ctx == Ctx::Top && self.peek_ordinary_meta(Ordinary::RParen) {
            return Err(self.err_invalid(self.pos, "Unmatched closing group"));
        }

        for ord in [Ordinary::Star, Ordinary::Plus, Ordinary::Equals, Ordinary::Question, Ordinary::LBrace, Ordinary::At] {
            if self.peek_ordinary_meta(ord) {
                return Err(self.err_invalid(self.pos, "Nothing to repeat"));
            }
        }

        if self.peek_str("\\_") {
            return self.parse_underscore_compound();
        }

        if self.peek_str("\\zs") {
            return self.unsupported_here(3);
        }
        if self.peek_str("\\ze") {
            return self.unsupported_here(3);
        }
        if self.peek_str("\\z(") {
            return self.unsupported_here(3);
        }
        if self.peek_str("\\Z") {
            return self.unsupported_here(2);
        }
        if self.peek_char() == Some('\\') && self.peek_char_at(1) == Some('z') && self.peek_char_at(2).map_or(false, |c| c.is_ascii_digit() && c != '0') {
            return self.unsupported_here(3);
        }

        if self.peek_str("\\%(") {
            self.advance(3);
            let inner = self.parse_alternation(Ctx::Group)?;
            self.expect_group_close()?;
            return Ok(ParsedAtom::group(format!("(?:{})", inner), inner));
        }
        if let Some((true, len)) = self.try_ordinary(Ordinary::LParen) {
            self.advance(len);
            let inner = self.parse_alternation(Ctx::Group)?;
            self.expect_group_close()?;
            return Ok(ParsedAtom::group(format!("({})", inner), inner));
        }

        if self.peek_char() == Some('\\') && self.peek_char_at(1) == Some('%') {
            return self.parse_percent_family();
        }

        if let Some((meta, len)) = self.try_ordinary(Ordinary::Less) {
            self.advance(len);
            if meta {
                let w = self.keyword_class()?;
                return Ok(ParsedAtom::atom(format!("(?:(?<!{0})(?={0}))", w)));
            }
            return Ok(ParsedAtom::atom(escape_literal_char('<')));
        }
        if let Some((meta, len)) = self.try_ordinary(Ordinary::Greater) {
            self.advance(len);
            if meta {
                let w = self.keyword_class()?;
                return Ok(ParsedAtom::atom(format!("(?:(?<={0})(?!{0}))", w)));
            }
            return Ok(ParsedAtom::atom(escape_literal_char('>')));
        }

        if self.peek_char() == Some('\\') {
            if let Some(letter) = self.peek_char_at(1) {
                if let Some(rendered) = single_char_class(letter, false) {
                    self.advance(2);
                    return Ok(ParsedAtom::atom(rendered.to_string()));
                }
                if "iIkKfFpP".contains(letter) {
                    self.advance(2);
                    let rendered = self.option_class_letter(letter, false)?;
                    return Ok(ParsedAtom::atom(rendered));
                }
                let literal_escape = match letter {
                    'e' => Some("\\x1b"),
                    't' => Some("\\t"),
                    'r' => Some("\\r"),
                    'b' => Some("\\x08"),
                    'n' => Some("\\n"),
                    _ => None,
                };
                if let Some(rendered) = literal_escape {
                    self.advance(2);
                    return Ok(ParsedAtom::atom(rendered.to_string()));
                }
                if letter.is_ascii_digit() && letter != '0' {
                    self.advance(2);
                    return Ok(ParsedAtom::atom(format!("\\{}", letter)));
                }
            }
        }

        if let Some((meta, len)) = self.try_ordinary(Ordinary::LBracket) {
            if meta {
                let bracket_pos = if len == 1 { self.pos } else { self.pos + 1 };
                let rest: String = self.chars[bracket_pos..].iter().collect();
                let off = self.byte_offset(bracket_pos);
                match collection::parse(&rest, &self.source, off, self.options)? {
                    Some((rendered, consumed)) => {
                        self.pos = bracket_pos + consumed;
                        return Ok(ParsedAtom::atom(rendered));
                    }
                    None => {
                        self.advance(len);
                        return Ok(ParsedAtom::atom(escape_literal_char('[')));
                    }
                }
            }
        }
        if self.peek_char() == Some(']') {
            self.advance(1);
            return Ok(ParsedAtom::atom(escape_literal_char(']')));
        }
        if self.peek_str("\\]") {
            self.advance(2);
            return Ok(ParsedAtom::atom(escape_literal_char(']')));
        }

        if let Some((meta, len)) = self.try_ordinary(Ordinary::Caret) {
            self.advance(len);
            if meta && at_start {
                return Ok(ParsedAtom::atom(self.render_line_start()));
            }
            return Ok(ParsedAtom::atom(escape_literal_char('^')));
        }
        if let Some((meta, len)) = self.try_ordinary(Ordinary::Dollar) {
            let is_end = {
                let save = self.pos;
                self.pos += len;
                let r = self.at_branch_end(ctx);
                self.pos = save;
                r
            };
            self.advance(len);
            if meta && is_end {
                return Ok(ParsedAtom::atom(self.render_line_end()));
            }
            return Ok(ParsedAtom::atom(escape_literal_char('$')));
        }
        if let Some((meta, len)) = self.try_ordinary(Ordinary::Dot) {
            self.advance(len);
            if meta {
                return Ok(ParsedAtom::atom("[^\\n]".to_string()));
            }
            return Ok(ParsedAtom::atom(escape_literal_char('.')));
        }
        if let Some((meta, len)) = self.try_ordinary(Ordinary::Tilde) {
            if meta {
                let token: String = self.chars[self.pos..self.pos + len].iter().collect();
                let off = self.byte_offset(self.pos);
                self.advance(len);
                return Err(CompileError::unsupported(self.source.clone(), off, token));
            }
            self.advance(len);
            return Ok(ParsedAtom::atom(escape_literal_char('~')));
        }

        for ord in [Ordinary::Pipe, Ordinary::Ampersand, Ordinary::Star, Ordinary::Plus, Ordinary::Equals, Ordinary::Question, Ordinary::LBrace, Ordinary::RBrace, Ordinary::At, Ordinary::RParen] {
            if let Some((_, len)) = self.try_ordinary(ord) {
                let c = ordinary_char(ord);
                self.advance(len);
                return Ok(ParsedAtom::atom(escape_literal_char(c)));
            }
        }

        let c = self.peek_char().expect("checked at_segment_end above");
        self.advance(1);
        Ok(ParsedAtom::atom(escape_literal_char(c)))
    }

    fn expect_group_close(&mut self) -> Result<(), CompileError> {
        if let Some((true, len)) = self.try_ordinary(Ordinary::RParen) {
            self.advance(len);
            Ok(())
        } else {
            Err(self.err_invalid(self.pos, "Unmatched closing group"))
        }
    }

    fn unsupported_here(&mut self, len: usize) -> Result<ParsedAtom, CompileError> {
        let token: String = self.chars[self.pos..self.pos + len].iter().collect();
        let off = self.byte_offset(self.pos);
        Err(CompileError::unsupported(self.source.clone(), off, token))
    }

    fn render_line_start(&self) -> String {
        if self.options.string_match {
            "^".to_string()
        } else {
            "(?:^|(?<=\\n))".to_string()
        }
    }

    fn render_line_end(&self) -> String {
        if self.options.string_match {
            "$".to_string()
        } else {
            "(?:(?=\\n)|$)".to_string()
        }
    }

    fn keyword_class(&self) -> Result<String, CompileError> {
        charclass::compile(&self.options.iskeyword, ClassType::IsKeyword, true)
    }

    fn option_class_letter(&self, letter: char, with_newline: bool) -> Result<String, CompileError> {
        let (opt_str, ty, invert) = match letter {
            'i' => (self.options.isident.as_str(), ClassType::IsIdent, false),
            'I' => (self.options.isident.as_str(), ClassType::IsIdent, true),
            'k' => (self.options.iskeyword.as_str(), ClassType::IsKeyword, false),
            'K' => (self.options.iskeyword.as_str(), ClassType::IsKeyword, true),
            'f' => (self.options.isfname.as_str(), ClassType::IsFname, false),
            'F' => (self.options.isfname.as_str(), ClassType::IsFname, true),
            'p' => (self.options.isprint.as_str(), ClassType::IsPrint, false),
            'P' => (self.options.isprint.as_str(), ClassType::IsPrint, true),
            _ => unreachable!("checked by caller"),
        };
        let rendered = if invert {
            charclass::compile_excluding_digits(opt_str, ty, true)?
        } else {
            charclass::compile(opt_str, ty, true)?
        };
        Ok(if with_newline { charclass::with_newline(&rendered) } else { rendered })
    }

    fn parse_underscore_compound(&mut self) -> Result<ParsedAtom, CompileError> {
        let start = self.pos;
        let c2 = self.peek_char_at(2);
        match c2 {
            Some('^') => {
                self.advance(3);
                Ok(ParsedAtom::atom(self.render_line_start()))
            }
            Some('$') => {
                self.advance(3);
                Ok(ParsedAtom::atom(self.render_line_end()))
            }
            Some('.') => {
                self.advance(3);
                Ok(ParsedAtom::atom(".".to_string()))
            }
            Some('[') => {
                self.advance(2);
                let rest: String = self.chars[self.pos..].iter().collect();
                let off = self.byte_offset(self.pos);
                match collection::parse(&rest, &self.source, off, self.options)? {
                    Some((rendered, consumed)) => {
                        self.pos += consumed;
                        Ok(ParsedAtom::atom(format!("[\\n{}]", rendered)))
                    }
                    None => Err(self.err_invalid(start, "Unmatched [")),
                }
            }
            Some(letter) if single_char_class(letter, true).is_some() => {
                self.advance(3);
                Ok(ParsedAtom::atom(single_char_class(letter, true).unwrap().to_string()))
            }
            Some(letter) if "iIkKfFpP".contains(letter) => {
                self.advance(3);
                let rendered = self.option_class_letter(letter, true)?;
                Ok(ParsedAtom::atom(rendered))
            }
            _ => Err(self.err_invalid(start, "Invalid pattern")),
        }
    }

    fn parse_percent_family(&mut self) -> Result<ParsedAtom, CompileError> {
        let start = self.pos;
        self.advance(2); // "\%"
        match self.peek_char() {
            Some('^') => {
                self.advance(1);
                Ok(ParsedAtom::atom("^".to_string()))
            }
            Some('$') => {
                self.advance(1);
                Ok(ParsedAtom::atom("$".to_string()))
            }
            Some('V') => {
                self.advance(1);
                self.unsupported_token(start)
            }
            Some('C') => {
                self.advance(1);
                self.unsupported_token(start)
            }
            Some('#') => {
                self.advance(1);
                if self.peek_char() == Some('=') {
                    self.advance(1);
                }
                self.unsupported_token(start)
            }
            Some('[') => {
                self.advance(1);
                Err(CompileError::unsupported(self.source.clone(), self.byte_offset(start), "\\%[]"))
            }
            Some('\'') => {
                self.advance(1);
                if self.peek_char().is_some() {
                    self.advance(1);
                }
                self.unsupported_token(start)
            }
            Some('<' | '>') => {
                self.advance(1);
                self.parse_line_col_or_mark(start)
            }
            Some(c) if c == '.' || c.is_ascii_digit() => self.parse_line_col_or_mark(start),
            Some(letter @ ('d' | 'o' | 'x' | 'u' | 'U')) => {
                self.advance(1);
                let (value, consumed) = numeric::parse_numeric_ref(&self.chars, self.pos, letter);
                self.advance(consumed);
                match char::from_u32(value) {
                    Some(_) => Ok(ParsedAtom::atom(render_codepoint_literal(value))),
                    None => Ok(ParsedAtom::atom("[]".to_string())),
                }
            }
            _ => Err(self.err_invalid(start, "Invalid pattern")),
        }
    }

    fn parse_line_col_or_mark(&mut self, start: usize) -> Result<ParsedAtom, CompileError> {
        if self.peek_char() == Some('\'') {
            self.advance(1);
            if self.peek_char().is_some() {
                self.advance(1);
            }
            return self.unsupported_token(start);
        }
        if self.peek_char() == Some('.') {
            self.advance(1);
        } else {
            self.consume_digits();
        }
        match self.peek_char() {
            Some('l') | Some('c') | Some('v') => {
                self.advance(1);
                self.unsupported_token(start)
            }
            _ => Err(self.err_invalid(start, "Invalid pattern")),
        }
    }

    fn unsupported_token(&self, start: usize) -> Result<ParsedAtom, CompileError> {
        let token: String = self.chars[start..self.pos].iter().collect();
        Err(CompileError::unsupported(self.source.clone(), self.byte_offset(start), token))
    }
}

fn ordinary_char(ord: Ordinary) -> char {
    match ord {
        Ordinary::Dot => '.',
        Ordinary::Star => '*',
        Ordinary::LBracket => '[',
        Ordinary::RBracket => ']',
        Ordinary::Caret => '^',
        Ordinary::Dollar => '$',
        Ordinary::Tilde => '~',
        Ordinary::LParen => '(',
        Ordinary::RParen => ')',
        Ordinary::Pipe => '|',
        Ordinary::Plus => '+',
        Ordinary::Question => '?',
        Ordinary::Equals => '=',
        Ordinary::LBrace => '{',
        Ordinary::RBrace => '}',
        Ordinary::At => '@',
        Ordinary::Less => '<',
        Ordinary::Greater => '>',
        Ordinary::Ampersand => '&',
    }
}

fn escape_literal_char(c: char) -> String {
    if "\\.^$*+?()[]{}|".contains(c) {
        format!("\\{}", c)
    } else {
        c.to_string()
    }
}

fn render_codepoint_literal(cp: u32) -> String {
    if (0x20..=0x7f).contains(&cp) {
        if let Some(c) = char::from_u32(cp) {
            return escape_literal_char(c);
        }
    }
    if cp <= 0xff {
        format!("\\x{:02x}", cp)
    } else if cp <= 0xffff {
        format!("\\u{:04x}", cp)
    } else {
        format!("\\u{{{:x}}}", cp)
    }
}

fn render_bounded_quantifier(min_str: &str, max_str: &str, has_comma: bool, lazy: bool) -> String {
    let suffix = if lazy { "?" } else { "" };
    if min_str.is_empty() && (!has_comma || max_str.is_empty()) {
        return format!("*{}", suffix);
    }
    let mut min: u64 = min_str.parse().unwrap_or(0);
    let max: Option<u64> = if has_comma {
        if max_str.is_empty() {
            None
        } else {
            Some(max_str.parse().unwrap_or(min))
        }
    } else {
        Some(min)
    };
    if let Some(mx) = max {
        if min > mx {
            min = mx;
        }
    }
    let body = match (has_comma, max) {
        (false, _) => format!("{{{}}}", min),
        (true, None) => format!("{{{},}}", min),
        (true, Some(mx)) => format!("{{{},{}}}", min, mx),
    };
    format!("{}{}", body, suffix)
}

/// The fixed single-character class table (spec §4.C). `with_newline`
/// selects the `\_`-prefixed variant.
fn single_char_class(letter: char, with_newline: bool) -> Option<&'static str> {
    Some(match (letter, with_newline) {
        ('s', false) => "[ \\t]",
        ('S', false) => "[^ \\t\\n]",
        ('s', true) => "[ \\t\\n]",
        ('S', true) => "[^ \\t]",
        ('d', false) => "[0-9]",
        ('D', false) => "[^0-9\\n]",
        ('d', true) => "[0-9\\n]",
        ('D', true) => "[^0-9]",
        ('x', false) => "[0-9A-Fa-f]",
        ('X', false) => "[^0-9A-Fa-f\\n]",
        ('x', true) => "[0-9A-Fa-f\\n]",
        ('X', true) => "[^0-9A-Fa-f]",
        ('o', false) => "[0-7]",
        ('O', false) => "[^0-7\\n]",
        ('o', true) => "[0-7\\n]",
        ('O', true) => "[^0-7]",
        ('w', false) => "[0-9A-Za-z_]",
        ('W', false) => "[^0-9A-Za-z_\\n]",
        ('w', true) => "[0-9A-Za-z_\\n]",
        ('W', true) => "[^0-9A-Za-z_]",
        ('h', false) => "[A-Za-z_]",
        ('H', false) => "[^A-Za-z_\\n]",
        ('h', true) => "[A-Za-z_\\n]",
        ('H', true) => "[^A-Za-z_]",
        ('a', false) => "[A-Za-z]",
        ('A', false) => "[^A-Za-z\\n]",
        ('a', true) => "[A-Za-z\\n]",
        ('A', true) => "[^A-Za-z]",
        ('l', false) => "[[a-z]--[A-Z]]",
        ('L', false) => "[^a-z\\n]",
        ('l', true) => "[[a-z\\n]--[A-Z]]",
        ('L', true) => "[^a-z]",
        ('u', false) => "[[A-Z]--[a-z]]",
        ('U', false) => "[^A-Z\\n]",
        ('u', true) => "[[A-Z\\n]--[a-z]]",
        ('U', true) => "[^A-Z]",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(source: &str, options: &Options) -> (String, bool) {
        compile(source, options).unwrap()
    }

    #[test]
    fn scenario_alternation() {
        let (body, _) = c(r"\(foo\|bar\)", &Options::default());
        assert_eq!(body, "(foo|bar)");
    }

    #[test]
    fn scenario_bounded_quantifier() {
        let (body, _) = c(r"x\{2,3}", &Options::default());
        assert_eq!(body, "x{2,3}");
    }

    #[test]
    fn scenario_string_match_anchor() {
        let o = Options { string_match: true, ..Options::default() };
        let (body, _) = c("^foo", &o);
        assert_eq!(body, "^foo");
    }

    #[test]
    fn scenario_line_anchor_default() {
        let (body, _) = c("^foo", &Options::default());
        assert_eq!(body, "(?:^|(?<=\\n))foo");
    }

    #[test]
    fn scenario_zs_unsupported() {
        let err = compile(r"\zs", &Options::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::CompileErrorKind::UnsupportedFeature);
    }

    #[test]
    fn scenario_nothing_to_repeat() {
        let err = compile(r"\@=", &Options::default()).unwrap_err();
        match err {
            CompileError::InvalidPattern { ref message, .. } => assert_eq!(message, "Nothing to repeat"),
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn scenario_concat_intersection() {
        let (body, _) = c(r"foo\&..x", &Options::default());
        assert_eq!(body, "(?=foo)[^\\n][^\\n]x");
    }

    #[test]
    fn caret_mid_pattern_is_literal() {
        let (body, _) = c(r"a^b", &Options::default());
        assert_eq!(body, "a\\^b");
    }

    #[test]
    fn dollar_mid_pattern_is_literal() {
        let (body, _) = c(r"a$b", &Options::default());
        assert_eq!(body, "a\\$b");
    }

    #[test]
    fn dot_emits_no_newline_class() {
        let (body, _) = c(".", &Options::default());
        assert_eq!(body, "[^\\n]");
    }

    #[test]
    fn underscore_dot_matches_newline() {
        let (body, _) = c(r"\_.", &Options::default());
        assert_eq!(body, ".");
    }

    #[test]
    fn lookahead_rewrites_group() {
        let (body, _) = c(r"\(foo\)\@=", &Options::default());
        assert_eq!(body, "(?=foo)");
    }

    #[test]
    fn lookaround_without_group_errors() {
        let err = compile(r"x\@=", &Options::default()).unwrap_err();
        match err {
            CompileError::InvalidPattern { ref message, .. } => assert_eq!(message, "Nothing to repeat"),
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn backreference_then_literal_zero() {
        let (body, _) = c(r"\(a\)\10", &Options::default());
        assert_eq!(body, "(a)\\10");
    }

    #[test]
    fn unclosed_bracket_is_literal() {
        let (body, _) = c("[abc", &Options::default());
        assert_eq!(body, "\\[abc");
    }

    #[test]
    fn ignore_case_switch_wins() {
        let (_, ic) = c(r"\cFoo", &Options::default());
        assert!(ic);
    }

    #[test]
    fn very_magic_parens_are_bare() {
        let (body, _) = c(r"\v(foo|bar)", &Options::default());
        assert_eq!(body, "(foo|bar)");
    }

    #[test]
    fn word_boundary_uses_iskeyword() {
        let (body, _) = c(r"\<foo", &Options::default());
        assert!(body.starts_with("(?:(?<!"));
        assert!(body.contains("foo"));
    }

    #[test]
    fn quantifier_clamps_min_to_max() {
        let (body, _) = c(r"x\{5,2}", &Options::default());
        assert_eq!(body, "x{2,2}");
    }

    #[test]
    fn numeric_ref_outside_collection() {
        let (body, _) = c(r"\%d65", &Options::default());
        assert_eq!(body, "A");
    }
}
