//
// options.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! The options bundle (spec §3) and the typed flag accessors spec §6
//! asks the public wrapper to expose. Grounded on `core/src/options.rs`'s
//! `Options` macro-generated struct: a flat, closed set of named fields
//! with stated defaults, populated from `:set`-style strings — here
//! there is no `:set` command surface (spec §7 rules out a CLI/wire
//! format for the core), so `Options` is just a plain struct callers
//! build directly or patch via [`OptionsPatch`].

use crate::error::CompileError;

/// Vim's built-in defaults for the four `is*` options (`:help 'isfname'`
/// et al.), used when a caller doesn't override them.
pub const DEFAULT_ISFNAME: &str = "@,48-57,/,.,-,_,+,,,#,$,%,~,=";
pub const DEFAULT_ISIDENT: &str = "@,48-57,_,192-255";
pub const DEFAULT_ISKEYWORD: &str = "@,48-57,_,192-255";
pub const DEFAULT_ISPRINT: &str = "@,161-255";

/// Caller-facing compilation options (spec §3). All fields optional with
/// stated defaults; `Default::default()` gives exactly those defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub flags: String,
    pub isfname: String,
    pub isident: String,
    pub iskeyword: String,
    pub isprint: String,
    pub magic: bool,
    pub ignorecase: bool,
    pub smartcase: bool,
    pub string_match: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            flags: String::new(),
            isfname: DEFAULT_ISFNAME.to_string(),
            isident: DEFAULT_ISIDENT.to_string(),
            iskeyword: DEFAULT_ISKEYWORD.to_string(),
            isprint: DEFAULT_ISPRINT.to_string(),
            magic: true,
            ignorecase: false,
            smartcase: false,
            string_match: false,
        }
    }
}

impl Options {
    /// `compile(pattern, "gi")` — a flag string alone is accepted where
    /// a full options map would go (spec §6).
    pub fn from_flags(flags: impl Into<String>) -> Self {
        Self {
            flags: flags.into(),
            ..Self::default()
        }
    }

    /// Layered merge per spec §4.D: "type-specific defaults, then
    /// previous options if any, then caller options." `self` plays the
    /// role of "previous options"; fields set in `patch` win.
    pub fn merge(&self, patch: &OptionsPatch) -> Options {
        Options {
            flags: patch.flags.clone().unwrap_or_else(|| self.flags.clone()),
            isfname: patch.isfname.clone().unwrap_or_else(|| self.isfname.clone()),
            isident: patch.isident.clone().unwrap_or_else(|| self.isident.clone()),
            iskeyword: patch.iskeyword.clone().unwrap_or_else(|| self.iskeyword.clone()),
            isprint: patch.isprint.clone().unwrap_or_else(|| self.isprint.clone()),
            magic: patch.magic.unwrap_or(self.magic),
            ignorecase: patch.ignorecase.unwrap_or(self.ignorecase),
            smartcase: patch.smartcase.unwrap_or(self.smartcase),
            string_match: patch.string_match.unwrap_or(self.string_match),
        }
    }

    /// Whether `ignorecase` is actually in force once `smartcase` is
    /// taken into account (spec §3: smartcase cancels ignorecase when
    /// the pattern has an upper-case letter outside a backslash escape).
    pub fn effective_ignorecase(&self, pattern: &str) -> bool {
        if self.ignorecase && self.smartcase && has_unescaped_uppercase(pattern) {
            false
        } else {
            self.ignorecase
        }
    }
}

fn has_unescaped_uppercase(pattern: &str) -> bool {
    let mut escaped = false;
    for c in pattern.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c.is_uppercase() {
            return true;
        }
    }
    false
}

/// A sparse patch applied on top of an existing [`Options`] (spec §4.D:
/// constructing a wrapper from another wrapper merges options, "new
/// options win").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsPatch {
    pub flags: Option<String>,
    pub isfname: Option<String>,
    pub isident: Option<String>,
    pub iskeyword: Option<String>,
    pub isprint: Option<String>,
    pub magic: Option<bool>,
    pub ignorecase: Option<bool>,
    pub smartcase: Option<bool>,
    pub string_match: Option<bool>,
}

/// Validated, typed view over the flag characters a caller supplied
/// (`d`, `g`, `i`, `y`; `s`/`v` accepted as no-ops; `m`/`u` rejected).
/// Spec §6: the named boolean accessors mirror only the flags the
/// caller specified, not the mandatory internal `s`/`v`/`i` additions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    has_indices: bool,
    global: bool,
    ignore_case: bool,
    sticky: bool,
}

impl Flags {
    pub fn parse(source: &str, flags: &str) -> Result<Self, CompileError> {
        let mut out = Self::default();
        for c in flags.chars() {
            match c {
                'd' => out.has_indices = true,
                'g' => out.global = true,
                'i' => out.ignore_case = true,
                'y' => out.sticky = true,
                's' | 'v' => {}
                _ => {
                    return Err(CompileError::invalid_pattern(source, 0, "Invalid flags"));
                }
            }
        }
        Ok(out)
    }

    pub fn has_indices(&self) -> bool {
        self.has_indices
    }
    pub fn global(&self) -> bool {
        self.global
    }
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }
    pub fn sticky(&self) -> bool {
        self.sticky
    }

    /// The caller-visible flags plus the mandatory internal `s`, `v`,
    /// and (if ignore-case is in force) `i` (spec §4.C "Compilation
    /// outcome" / invariant §8.3).
    pub fn render(&self, ignorecase_in_force: bool) -> String {
        let mut out = String::from("sv");
        if self.has_indices {
            out.push('d');
        }
        if self.global {
            out.push('g');
        }
        if self.ignore_case || ignorecase_in_force {
            out.push('i');
        }
        if self.sticky {
            out.push('y');
        }
        out
    }
}
