//
// lib.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! Translates Vim-dialect regular expressions into a host regex engine's
//! dialect.
//!
//! Four pieces do the work, in order of dependency:
//!
//! - [`error`] — the three ways a compilation can fail.
//! - [`magic`] — the magicness levels that decide which characters are
//!   metacharacters at a given point in a pattern.
//! - [`charclass`] — compiles `isfname`/`isident`/`iskeyword`/`isprint`
//!   option strings into host character classes.
//! - [`transpile`] — the recursive-descent translator over a Vim pattern.
//! - [`wrapper`] — [`VimRegex`], the public handle that ties a compiled
//!   pattern to a host regex and exposes Vim-flavoured accessors.
//!
//! Logging uses the `log` facade, same as the rest of this workspace;
//! wire up whichever subscriber you like (`env_logger`, `flexi_logger`,
//! …) in your binary.

pub mod charclass;
pub mod error;
pub mod magic;
pub mod options;
pub mod transpile;
pub mod wrapper;

pub use error::{CompileError, CompileErrorKind};
pub use options::{Flags, Options, OptionsPatch};
pub use wrapper::{HostRegex, RegexBackend, VimRegex};

/// Compiles a Vim pattern against a host regex using the default
/// (`fancy_regex`-backed) backend. Equivalent to
/// `VimRegex::<RegexBackend>::compile`.
pub fn compile(pattern: &str, options: Options) -> Result<VimRegex<RegexBackend>, CompileError> {
    VimRegex::compile(pattern, options)
}

/// Compiles a Vim pattern with just a flag string, Vim defaults for
/// everything else.
pub fn compile_with_flags(pattern: &str, flags: &str) -> Result<VimRegex<RegexBackend>, CompileError> {
    VimRegex::compile_with_flags(pattern, flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_round_trip() {
        let re = compile(r"\<foo\>", Options::default()).unwrap();
        assert!(re.is_match("a foo b"));
        assert!(!re.is_match("afoob"));
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let re = compile("", Options::default()).unwrap();
        assert!(re.is_match(""));
        assert!(re.is_match("anything"));
    }
}
