//
// wrapper.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! The public wrapper (component D, spec §4.D). Composition over
//! inheritance: `VimRegex` owns a compiled host regex plus the original
//! Vim source and merged options, and delegates matching to the host
//! rather than extending it.

use crate::error::CompileError;
use crate::options::{Flags, Options, OptionsPatch};
use crate::transpile;

/// What a host regex backend needs to provide so [`VimRegex`] can
/// delegate to it. Kept deliberately small: the translator's job ends
/// at producing host source + flags (spec §1's "deliberately out of
/// scope" list), so this crate ships exactly one default implementation
/// and lets callers swap in their own for a different host engine.
pub trait HostRegex: Sized {
    fn compile(source: &str, rendered_flags: &str) -> Result<Self, String>;
    fn is_match(&self, text: &str) -> bool;
    fn find(&self, text: &str) -> Option<(usize, usize)>;
}

/// Default backend over the `fancy_regex` crate. `fancy_regex` layers
/// backreferences and arbitrary-distance lookaround on top of the
/// `regex` crate's engine, which is what the translator's own output
/// needs: line/string anchors, `\<`/`\>` word boundaries, and `\&`
/// concat-intersection all compile down to lookaround assertions.
///
/// Still **partial**: it doesn't implement the `v`-mode set operators
/// (`--` class subtraction, nested `[...]` classes), so `\l`/`\L`/`\u`/
/// `\U` and any `isprint`/`iskeyword` Unicode-tail difference class
/// will fail to compile here even though the translator emitted valid
/// host-dialect source for an engine that does support them (spec §1:
/// the host engine is an external collaborator).
pub struct RegexBackend(fancy_regex::Regex);

impl HostRegex for RegexBackend {
    fn compile(source: &str, rendered_flags: &str) -> Result<Self, String> {
        let mut pattern = String::new();
        if rendered_flags.contains('i') {
            pattern.push_str("(?i)");
        }
        pattern.push_str(source);
        fancy_regex::Regex::new(&pattern).map(RegexBackend).map_err(|e| e.to_string())
    }

    fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text).unwrap_or(false)
    }

    fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.0.find(text).ok().flatten().map(|m| (m.start(), m.end()))
    }
}

/// A compiled Vim pattern (spec §4.D). Immutable after construction
/// (spec §3 invariant); holds the original source, a deep copy of the
/// merged options, and the host regex it delegates matching to.
pub struct VimRegex<R: HostRegex = RegexBackend> {
    vim_source: String,
    options: Options,
    compiled_source: String,
    flags: Flags,
    ignorecase_in_force: bool,
    host: R,
}

impl<R: HostRegex> VimRegex<R> {
    /// `compile(pattern, options)` (spec §6).
    pub fn compile(pattern: &str, options: Options) -> Result<Self, CompileError> {
        let flags = Flags::parse(pattern, &options.flags)?;
        let (compiled_source, ignorecase_in_force) = transpile::compile(pattern, &options)?;
        let rendered_flags = flags.render(ignorecase_in_force);
        let host = R::compile(&compiled_source, &rendered_flags).map_err(|message| CompileError::invalid_pattern(pattern, 0, message))?;
        Ok(Self {
            vim_source: pattern.to_string(),
            options,
            compiled_source,
            flags,
            ignorecase_in_force,
            host,
        })
    }

    /// `compile(pattern, "gi")` — a flag string alone, in place of a
    /// full options map (spec §6).
    pub fn compile_with_flags(pattern: &str, flags: &str) -> Result<Self, CompileError> {
        Self::compile(pattern, Options::from_flags(flags))
    }

    /// Constructs from another wrapper's source, merging `patch` on top
    /// of its options with "new options win" (spec §4.D: "If pattern is
    /// itself a wrapper, copy its Vim source and merge options").
    pub fn derive_from(other: &VimRegex<R>, patch: OptionsPatch) -> Result<Self, CompileError> {
        let merged = other.options.merge(&patch);
        Self::compile(&other.vim_source, merged)
    }

    pub fn vim_source(&self) -> &str {
        &self.vim_source
    }

    /// Deep copy; never shares mutable state with the caller (spec §6).
    pub fn options(&self) -> Options {
        self.options.clone()
    }

    pub fn compiled_source(&self) -> &str {
        &self.compiled_source
    }

    /// Raw flag set, including the mandatory internal `s`/`v`/`i`
    /// additions (spec §3).
    pub fn raw_flags(&self) -> String {
        self.flags.render(self.ignorecase_in_force)
    }

    /// Mirrors only the flags the caller specified (spec §6: the
    /// internal `s`/`v`/`i` additions aren't visible via these).
    pub fn has_indices(&self) -> bool {
        self.flags.has_indices()
    }
    pub fn global(&self) -> bool {
        self.flags.global()
    }
    pub fn ignore_case(&self) -> bool {
        self.flags.ignore_case()
    }
    pub fn sticky(&self) -> bool {
        self.flags.sticky()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.host.is_match(text)
    }

    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.host.find(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_matches() {
        let re = VimRegex::<RegexBackend>::compile_with_flags(r"\k\+", "i").unwrap();
        assert!(re.is_match("Foo"));
        assert!(re.is_match("x1"));
        assert!(!re.is_match("!!!"));
    }

    #[test]
    fn named_accessors_mirror_caller_flags_only() {
        let re = VimRegex::<RegexBackend>::compile_with_flags("foo", "g").unwrap();
        assert!(re.global());
        assert!(!re.ignore_case());
        assert!(re.raw_flags().contains('s'));
        assert!(re.raw_flags().contains('v'));
    }

    #[test]
    fn options_are_a_deep_copy() {
        let re = VimRegex::<RegexBackend>::compile("foo", Options::default()).unwrap();
        let mut copy = re.options();
        copy.magic = false;
        assert!(re.options().magic);
    }

    #[test]
    fn derive_merges_options() {
        let base = VimRegex::<RegexBackend>::compile("foo", Options::default()).unwrap();
        let patch = OptionsPatch {
            flags: Some("g".to_string()),
            ..Default::default()
        };
        let derived = VimRegex::<RegexBackend>::derive_from(&base, patch).unwrap();
        assert_eq!(derived.vim_source(), "foo");
        assert!(derived.global());
    }

    #[test]
    fn alternation_matches_either_branch() {
        let re = VimRegex::<RegexBackend>::compile(r"\(foo\|bar\)", Options::default()).unwrap();
        assert!(re.is_match("foo"));
        assert!(re.is_match("bar"));
        assert!(!re.is_match("baz"));
    }

    #[test]
    fn unsupported_feature_propagates() {
        let err = VimRegex::<RegexBackend>::compile(r"\zs", Options::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::CompileErrorKind::UnsupportedFeature);
    }
}
