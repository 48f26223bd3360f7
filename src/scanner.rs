//! Module `scanner` implements the total, span‑preserving lexer for heartlisp.
//!
//! Scanning never fails: every byte of the input ends up in exactly one token,
//! so concatenating the spans of all emitted tokens reproduces the input.
//!
//! # Public API
//!
//! - `next_token(input) -> (Token, rest)`
//!   Scan exactly one token off the front of `input`.
//!
//! - `Scanner::new(input)`
//!   Pull‑based `FusedIterator` over the tokens of `input`, ending with one
//!   `EndOfInput` token.
//!
//! - `tokenize(input) -> Vec<Token>`
//!   Eagerly collect a `Scanner`.
//!
//! - `stream_tokens(input, capacity, consumer)`
//!   Run the scanner on a producer thread feeding a bounded queue.
//!
//! # Token Recognition (priority order)
//!
//! 1. End of input.
//! 2. Single‑character punctuation: `(`, `)`, `[`, `]`, `{`, `}`.
//! 3. The reserved sentinel `<3`.
//! 4. A maximal whitespace run.
//! 5. Numbers: optional `-`, digits, optional `.digits` (makes it a float).
//! 6. Strings: `"` … `"`, backslash escapes the next character.  An
//!    unterminated string runs to the end of input.
//! 7. Anything else: a maximal run of non‑whitespace, non‑punctuation
//!    characters, tagged as an identifier.
//!
//! # Example
//!
//! ```rust
//! use heartlisp::scanner::Scanner;
//!
//! for token in Scanner::new("(+ 1 2)") {
//!     println!("{}", token);
//! }
//! ```

use crate::token::{Tag, Token};
use log::{debug, info};
use memchr::memchr2;
use phf::phf_map;
use std::iter::FusedIterator;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread;

// ─────────────────────────────────────────────────────────────────────────────
// Static punctuation map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static PUNCTUATION: phf::Map<u8, Tag> = phf_map! {
    b'(' => Tag::ParenOpen,
    b')' => Tag::ParenClose,
    b'[' => Tag::BracketOpen,
    b']' => Tag::BracketClose,
    b'{' => Tag::CurlyOpen,
    b'}' => Tag::CurlyClose,
};

/// The reserved multi‑character sentinel.
pub const HEART: &str = "<3";

/// Split `input` after `len` bytes, tagging the head.
#[inline(always)]
fn split(input: &str, len: usize, tag: Tag) -> (Token<'_>, &str) {
    let (span, rest) = input.split_at(len);

    (Token::new(tag, span), rest)
}

#[inline(always)]
fn is_punctuation(c: char) -> bool {
    c.is_ascii() && PUNCTUATION.contains_key(&(c as u8))
}

/// Length in bytes of the leading whitespace run.
fn take_whitespace(input: &str) -> usize {
    input
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(input.len(), |(i, _)| i)
}

/// Length and tag of a leading numeric literal, if any.
fn take_number(bytes: &[u8]) -> Option<(usize, Tag)> {
    let mut i: usize = usize::from(bytes.first() == Some(&b'-'));

    if !bytes.get(i).is_some_and(u8::is_ascii_digit) {
        return None;
    }

    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }

    // Optional fractional part.
    if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
        i += 1; // consume "."

        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }

        return Some((i, Tag::Float));
    }

    Some((i, Tag::Int))
}

/// Length of a string literal starting at `bytes[0] == b'"'`, closing quote included.
fn take_string(bytes: &[u8]) -> usize {
    let mut i: usize = 1;

    while let Some(pos) = memchr2(b'"', b'\\', &bytes[i..]) {
        if bytes[i + pos] == b'"' {
            return i + pos + 1;
        }

        // Backslash: skip it and the escaped byte.
        i += pos + 2;

        if i >= bytes.len() {
            return bytes.len();
        }
    }

    bytes.len()
}

/// Length of the leading identifier run.
fn take_identifier(input: &str) -> usize {
    input
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || is_punctuation(*c))
        .map_or(input.len(), |(i, _)| i)
}

/// Scan exactly one token off the front of `input`, returning it together
/// with the unconsumed remainder.  An empty input yields `EndOfInput`.
pub fn next_token(input: &str) -> (Token<'_>, &str) {
    let bytes: &[u8] = input.as_bytes();

    let Some(first) = bytes.first() else {
        return (Token::new(Tag::EndOfInput, ""), "");
    };

    if let Some(tag) = PUNCTUATION.get(first) {
        return split(input, 1, *tag);
    }

    if input.starts_with(HEART) {
        return split(input, HEART.len(), Tag::Heart);
    }

    let ws: usize = take_whitespace(input);
    if ws > 0 {
        return split(input, ws, Tag::Whitespace);
    }

    if let Some((len, tag)) = take_number(bytes) {
        return split(input, len, tag);
    }

    if *first == b'"' {
        return split(input, take_string(bytes), Tag::String);
    }

    // Non‑empty: the first char is neither whitespace nor punctuation.
    split(input, take_identifier(input), Tag::Identifier)
}

/// A pull‑based scanner.  Yields every token of the input, whitespace
/// included, followed by exactly one `EndOfInput` token.
pub struct Scanner<'a> {
    rest: &'a str,
    finished: bool,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            rest: src,
            finished: false,
        }
    }

    /// The part of the input not scanned yet.
    pub fn remainder(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let (token, rest) = next_token(self.rest);
        self.rest = rest;

        if token.tag == Tag::EndOfInput {
            self.finished = true;
        }

        Some(token)
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan the whole input eagerly.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let tokens: Vec<Token<'_>> = Scanner::new(input).collect();

    debug!("Tokenized {} bytes into {} tokens", input.len(), tokens.len());

    tokens
}

/// Scan `input` on a producer thread that pushes tokens one at a time into a
/// queue of at most `capacity` entries, while `consumer` drains the receiving
/// end on the calling thread.  The producer blocks while the queue is full,
/// the consumer while it is empty.
///
/// The consumer only borrows the receiver, so it cannot smuggle it out of the
/// call.  The receiver is dropped as soon as the consumer returns, which
/// stops a producer that still has tokens left.
pub fn stream_tokens<'a, F, R>(input: &'a str, capacity: usize, consumer: F) -> R
where
    F: FnOnce(&Receiver<Token<'a>>) -> R,
{
    let (tx, rx) = sync_channel::<Token<'a>>(capacity);

    thread::scope(|s| {
        s.spawn(move || {
            for token in Scanner::new(input) {
                if tx.send(token).is_err() {
                    debug!("Token consumer hung up, stopping producer");
                    break;
                }
            }
        });

        let result: R = consumer(&rx);
        drop(rx);

        result
    })
}
