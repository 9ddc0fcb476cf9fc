//
// error.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! The three error kinds a pattern or option-string compilation can fail
//! with (spec §4.A): [`CompileError::InvalidPattern`],
//! [`CompileError::UnsupportedFeature`] and
//! [`CompileError::InvalidOptionString`].

use std::fmt;

/// Everything a `vim-regex` compilation step can fail with.
///
/// The two source-bearing variants share a shape (source + byte offset)
/// so callers can downcast for programmatic handling, per spec §4.A.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompileError {
    /// Well-formed input that violates the Vim grammar, e.g. "Nothing to
    /// repeat" or "Unmatched closing group".
    #[error("{message} at byte {offset} in `{source}`")]
    InvalidPattern {
        source: String,
        offset: usize,
        message: String,
    },
    /// A recognised Vim construct that is deliberately not translated.
    #[error("unsupported Vim construct `{token}` at byte {offset} in `{source}`")]
    UnsupportedFeature {
        source: String,
        offset: usize,
        token: String,
    },
    /// A malformed character-class option string (`isfname`, `iskeyword`, …).
    #[error("{message} at byte {offset} in `{source}`")]
    InvalidOptionString {
        source: String,
        offset: usize,
        message: String,
    },
}

impl CompileError {
    pub fn invalid_pattern(source: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            source: source.into(),
            offset,
            message: message.into(),
        }
    }

    pub fn unsupported(source: impl Into<String>, offset: usize, token: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            source: source.into(),
            offset,
            token: token.into(),
        }
    }

    pub fn invalid_option_string(source: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidOptionString {
            source: source.into(),
            offset,
            message: message.into(),
        }
    }

    pub fn source_text(&self) -> &str {
        match self {
            Self::InvalidPattern { source, .. } => source,
            Self::UnsupportedFeature { source, .. } => source,
            Self::InvalidOptionString { source, .. } => source,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Self::InvalidPattern { offset, .. } => *offset,
            Self::UnsupportedFeature { offset, .. } => *offset,
            Self::InvalidOptionString { offset, .. } => *offset,
        }
    }

    /// Render the source with a `^` pointer under the offending byte, the
    /// way `regex-syntax`-style parsers do. A `Display` convenience kept
    /// out of the `#[error(...)]` string so the derived message stays
    /// terse.
    pub fn render_caret(&self) -> String {
        let mut out = String::new();
        let source = self.source_text();
        let offset = self.offset().min(source.len());
        out.push_str(source);
        out.push('\n');
        for _ in 0..offset {
            out.push(' ');
        }
        out.push('^');
        out
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompileError>;

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A discriminant-only view of [`CompileError`], handy for callers that
/// want to `match` on the kind without cloning the source/offset payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    InvalidPattern,
    UnsupportedFeature,
    InvalidOptionString,
}

impl CompileError {
    pub fn kind(&self) -> CompileErrorKind {
        match self {
            Self::InvalidPattern { .. } => CompileErrorKind::InvalidPattern,
            Self::UnsupportedFeature { .. } => CompileErrorKind::UnsupportedFeature,
            Self::InvalidOptionString { .. } => CompileErrorKind::InvalidOptionString,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_points_at_offset() {
        let e = CompileError::invalid_pattern("a@=b", 1, "Nothing to repeat");
        assert_eq!(e.render_caret(), "a@=b\n ^");
    }

    #[test]
    fn kind_matches_variant() {
        let e = CompileError::unsupported(r"\zs", 0, r"\zs");
        assert_eq!(e.kind(), CompileErrorKind::UnsupportedFeature);
    }
}
