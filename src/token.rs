use log::debug;
use serde::Serialize;
use std::fmt;

/// The different kinds of tokens recognized by the heartlisp scanner.
///
/// Every tag carries no data: the exact matched text lives in
/// [`Token::span`], so concatenating spans always reproduces the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tag {
    /// A maximal run of non‑whitespace, non‑punctuation characters.
    Identifier,

    /// Integer literal, e.g. `42` or `-7`.
    Int,

    /// Floating‑point literal, e.g. `3.14`.
    Float,

    /// Quoted string literal, span includes the quotes.
    String,

    /// The reserved `<3` sentinel.
    Heart,

    /// '('
    ParenOpen,

    /// ')'
    ParenClose,

    /// '['
    BracketOpen,

    /// ']'
    BracketClose,

    /// '{'
    CurlyOpen,

    /// '}'
    CurlyClose,

    /// A maximal run of whitespace.
    Whitespace,

    /// End‑of‑input marker, always with an empty span.
    EndOfInput,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Identifier => "IDENTIFIER",
            Tag::Int => "INT",
            Tag::Float => "FLOAT",
            Tag::String => "STRING",
            Tag::Heart => "HEART",
            Tag::ParenOpen => "PAREN_OPEN",
            Tag::ParenClose => "PAREN_CLOSE",
            Tag::BracketOpen => "BRACKET_OPEN",
            Tag::BracketClose => "BRACKET_CLOSE",
            Tag::CurlyOpen => "CURLY_OPEN",
            Tag::CurlyClose => "CURLY_CLOSE",
            Tag::Whitespace => "WHITESPACE",
            Tag::EndOfInput => "EOF",
        }
    }
}

/// A scanned token: its tag plus the exact substring it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// The category of this token.
    pub tag: Tag,

    /// The exact substring from the source that produced this token.
    pub span: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(tag: Tag, span: &'a str) -> Self {
        debug!("Creating new token: tag={:?}, span={:?}", tag, span);

        Self { tag, span }
    }

    /// Tokens the parser never looks at.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.tag == Tag::Whitespace
    }
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.tag.name(), self.span)
    }
}
