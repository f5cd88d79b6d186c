// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the tokenizer.
//!
//! These use `proptest` to verify tokenizer invariants over generated
//! inputs:
//!
//! 1. **Never panics, always terminates** — arbitrary input produces a
//!    finite token stream
//! 2. **Round-trip slicing** — concatenating every token's text
//!    reconstructs the buffer exactly, whitespace and comments included
//! 3. **Spans are ordered and contiguous** — each token starts where the
//!    previous one ended
//! 4. **End sentinel is always last** — and only last
//! 5. **Deterministic** — same input, same tokens
//! 6. **Valid fragments lex cleanly** — known-good R snippets produce no
//!    error tokens

use proptest::prelude::*;

use crate::token::{Token, TokenKind};
use crate::tokenizer::{tokenize, tokenize_with_end};

/// Known-valid fragments that must lex without error tokens.
const VALID_FRAGMENTS: &[&str] = &[
    "42",
    ".5",
    "100.",
    "2.5e-3",
    "5L",
    "0xFF",
    "'a string'",
    "\"another\"",
    "`quoted symbol`",
    "#comment",
    "foo",
    ".hidden",
    "NA_integer_",
    "TRUE",
    "x <- 1",
    "y <<- 2",
    "1 -> z",
    "a %in% b",
    "x[[1]]",
    "m[1, 2]",
    "f(a = 1)",
    "pkg::name",
    "y ~ x",
    "if (x) y else z",
    "function(a, b = 2) a + b",
    "while (TRUE) { next }",
];

fn valid_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FRAGMENTS).prop_map(str::to_owned)
}

/// ASCII source-ish text including newlines and tabs.
fn ascii_source() -> impl Strategy<Value = String> {
    "[ -~\t\n]{0,400}"
}

/// Default is 256 cases; override via `PROPTEST_CASES` for longer runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(256),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn tokenizer_never_panics(input in "\\PC{0,500}") {
        let _tokens = tokenize(&input);
        let _tokens = tokenize_with_end(&input);
    }

    #[test]
    fn round_trip_reconstructs_buffer(input in ascii_source()) {
        let mut reconstructed = String::new();
        for token in tokenize(&input) {
            reconstructed.push_str(token.text(&input));
        }
        prop_assert_eq!(reconstructed, input);
    }

    #[test]
    fn round_trip_reconstructs_unicode_buffer(input in "\\PC{0,300}") {
        let mut reconstructed = String::new();
        for token in tokenize(&input) {
            reconstructed.push_str(token.text(&input));
        }
        prop_assert_eq!(reconstructed, input);
    }

    #[test]
    fn spans_are_ordered_and_contiguous(input in ascii_source()) {
        let tokens = tokenize(&input);
        let mut offset = 0u32;
        for token in &tokens {
            prop_assert_eq!(
                token.span().start(),
                offset,
                "token {:?} does not start where the previous ended in {:?}",
                token.kind(),
                input,
            );
            prop_assert!(token.span().end() > token.span().start());
            offset = token.span().end();
        }
        prop_assert_eq!(offset as usize, input.len());
    }

    #[test]
    fn end_sentinel_is_always_last(input in "\\PC{0,300}") {
        let tokens = tokenize_with_end(&input);
        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().map(Token::kind), Some(TokenKind::End));
        for token in &tokens[..tokens.len() - 1] {
            prop_assert!(token.kind() != TokenKind::End);
        }
    }

    #[test]
    fn tokenizer_is_deterministic(input in "\\PC{0,200}") {
        let first = tokenize_with_end(&input);
        let second = tokenize_with_end(&input);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn valid_fragments_lex_cleanly(input in valid_fragment()) {
        for token in tokenize(&input) {
            prop_assert!(
                token.kind() != TokenKind::Error,
                "valid fragment {:?} produced an error token",
                input,
            );
        }
    }

    #[test]
    fn balanced_square_brackets_leave_no_errors(depth in 1usize..10) {
        let input = format!("x{}1{}", "[".repeat(depth), "]".repeat(depth));
        let tokens = tokenize(&input);
        for token in &tokens {
            prop_assert!(
                token.kind() != TokenKind::Error,
                "balanced input {:?} produced an error token",
                input,
            );
        }
    }

    #[test]
    fn positions_are_nondecreasing(input in ascii_source()) {
        let tokens = tokenize(&input);
        for window in tokens.windows(2) {
            prop_assert!(window[0].position() <= window[1].position());
        }
    }
}
