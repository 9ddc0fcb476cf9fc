//
// compile.rs
// Copyright (C) 2022 matthew <matthew@matthew-VirtualBox>
// Distributed under terms of the MIT license.
//

//! End-to-end scenarios exercised through the public API only, one per
//! row of the worked-example table, plus the handful of crate-level
//! invariants that don't belong inside any single module's unit tests.

use vim_regex::{CompileError, CompileErrorKind, Options, OptionsPatch, VimRegex};

fn compiled(pattern: &str) -> String {
    VimRegex::compile(pattern, Options::default()).unwrap().compiled_source().to_string()
}

#[test]
fn alternation_of_two_literals() {
    assert_eq!(compiled(r"\(foo\|bar\)"), "(foo|bar)");
}

#[test]
fn bounded_repetition() {
    assert_eq!(compiled(r"x\{2,3}"), "x{2,3}");
}

#[test]
fn string_match_keeps_bare_anchors() {
    let opts = Options { string_match: true, ..Options::default() };
    let re = VimRegex::compile("^foo$", opts).unwrap();
    assert_eq!(re.compiled_source(), "^foo$");
}

#[test]
fn line_anchors_default_to_multiline_shape() {
    assert_eq!(compiled("^foo$"), "(?:^|(?<=\\n))foo(?:(?=\\n)|$)");
}

#[test]
fn very_magic_strips_backslashes_from_grouping_and_alternation() {
    assert_eq!(compiled(r"\v(foo|bar)+"), "(foo|bar)+");
}

#[test]
fn zs_is_an_unsupported_feature_error() {
    let err = VimRegex::compile(r"foo\zsbar", Options::default()).unwrap_err();
    assert_eq!(err.kind(), CompileErrorKind::UnsupportedFeature);
}

#[test]
fn malformed_isfname_option_string_is_invalid_option_string() {
    let opts = Options { isfname: "XYZ".to_string(), ..Options::default() };
    let err = VimRegex::compile(r"\f", opts).unwrap_err();
    assert_eq!(err.kind(), CompileErrorKind::InvalidOptionString);
}

#[test]
fn lookahead_from_a_rewritten_group() {
    assert_eq!(compiled(r"\(foo\)\@="), "(?=foo)");
}

#[test]
fn nothing_to_repeat_without_a_preceding_atom() {
    let err = VimRegex::compile(r"\@=", Options::default()).unwrap_err();
    match err {
        CompileError::InvalidPattern { message, .. } => assert_eq!(message, "Nothing to repeat"),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn empty_pattern_compiles_and_matches_everything() {
    let re = VimRegex::compile("", Options::default()).unwrap();
    assert!(re.is_match(""));
    assert!(re.is_match("x"));
}

#[test]
fn compilation_is_idempotent() {
    let a = compiled(r"\v\w+\.\d{2,4}");
    let b = compiled(r"\v\w+\.\d{2,4}");
    assert_eq!(a, b);
}

#[test]
fn raw_flags_always_carry_s_and_v() {
    let re = VimRegex::compile_with_flags("foo", "").unwrap();
    let flags = re.raw_flags();
    assert!(flags.contains('s'));
    assert!(flags.contains('v'));
    assert!(!flags.contains('m'));
    assert!(!flags.contains('u'));
}

#[test]
fn ignorecase_flag_is_reflected_in_raw_flags_even_when_only_smartcase_triggers_it() {
    let opts = Options { ignorecase: true, ..Options::default() };
    let re = VimRegex::compile("foo", opts).unwrap();
    assert!(re.raw_flags().contains('i'));
    assert!(!re.ignore_case()); // caller never passed the `i` flag explicitly
}

#[test]
fn m_and_u_flags_are_rejected() {
    assert!(VimRegex::compile_with_flags("foo", "m").is_err());
    assert!(VimRegex::compile_with_flags("foo", "u").is_err());
}

#[test]
fn word_boundaries_respect_a_custom_iskeyword() {
    let opts = Options { iskeyword: "@,48-57,_,-".to_string(), ..Options::default() };
    let re = VimRegex::compile(r"\<a-b\>", opts).unwrap();
    assert!(re.is_match("a-b"));
    assert!(!re.is_match("xa-bx"));
}

#[test]
fn deriving_from_another_wrapper_merges_flags() {
    let base = VimRegex::compile("foo", Options::default()).unwrap();
    let derived = VimRegex::derive_from(&base, OptionsPatch { flags: Some("g".to_string()), ..Default::default() }).unwrap();
    assert_eq!(derived.vim_source(), "foo");
    assert!(derived.global());
    assert!(!base.global());
}

#[test]
fn collection_with_posix_class_and_negation() {
    let re = VimRegex::compile(r"[^[:digit:]]\+", Options::default()).unwrap();
    assert!(re.is_match("abc"));
    assert!(!re.is_match("123"));
}

#[test]
fn very_nomagic_requires_escaping_everyday_metacharacters() {
    assert_eq!(compiled(r"\Va.b"), "a\\.b");
    assert_eq!(compiled(r"\Va\.b"), "a[^\\n]b");
}
