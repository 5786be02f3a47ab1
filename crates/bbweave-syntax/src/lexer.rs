//! # Lexer - Splitting BBCode Source Into Lexemes
//!
//! This module provides the first stage of parsing: breaking source text into
//! lexemes using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one lexeme. Nothing is skipped,
//! so an unknown tag can later be emitted verbatim:
//!
//! ```
//! use bbweave_syntax::lexer::lex;
//!
//! let input = "[b]bold[/b] and [zzz]unknown[/zzz]\n";
//! let lexemes = lex(input);
//!
//! let reconstructed: String = lexemes.iter().map(|l| l.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Context-Free Lexemes
//!
//! The lexer has no idea which tag names exist. `[zzz]` is an
//! [`LexemeKind::OpenTag`] here; the engine's tokenizer consults the tag
//! registry and demotes it to plain content.
//!
//! Close tags and open tags overlap on the surface (`[/b]` matches both
//! patterns), so the close pattern carries a higher priority.

use std::ops::Range;

use logos::Logos;

/// Lexeme kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    /// `[/name]`
    #[regex(r"\[/[^\[\]]+\]", priority = 10)]
    CloseTag,

    /// `[name]`, `[name=value]`, `[name a=b]`
    #[regex(r"\[[^\[\]]+\]")]
    OpenTag,

    /// Line ending (CRLF, CR or LF)
    #[regex(r"\r\n|\r|\n")]
    Newline,

    /// A `[` that does not start a well-formed tag
    #[token("[")]
    StrayBracket,

    /// Plain text up to the next `[` or line break
    #[regex(r"[^\[\r\n]+")]
    Text,
}

impl LexemeKind {
    /// Whether this lexeme looks like a tag (open or close).
    pub fn is_tag(self) -> bool {
        matches!(self, LexemeKind::OpenTag | LexemeKind::CloseTag)
    }
}

/// A lexeme with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: LexemeKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of lexemes.
///
/// Guarantees that all bytes from the input appear in the output.
pub fn lex(input: &str) -> Vec<Lexeme<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(lexeme, _)| lexeme)
        .collect()
}

/// Lex and return lexemes along with their byte spans.
///
/// A tag that never reaches its `]` makes Logos report an error spanning
/// everything it consumed. Only the opening `[` of such a run is stray, so
/// lexing restarts right after it.
pub fn lex_with_spans(input: &str) -> Vec<(Lexeme<'_>, Range<usize>)> {
    let mut lexemes = Vec::new();
    let mut offset = 0;

    'restart: while offset < input.len() {
        let mut lexer = LexemeKind::lexer(&input[offset..]);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let start = offset + span.start;
            let end = offset + span.end;

            match result {
                Ok(kind) => lexemes.push((
                    Lexeme {
                        kind,
                        text: &input[start..end],
                    },
                    start..end,
                )),
                Err(()) if input[start..].starts_with('[') => {
                    lexemes.push((
                        Lexeme {
                            kind: LexemeKind::StrayBracket,
                            text: &input[start..start + 1],
                        },
                        start..start + 1,
                    ));
                    offset = start + 1;
                    continue 'restart;
                }
                Err(()) => lexemes.push((
                    Lexeme {
                        kind: LexemeKind::Text,
                        text: &input[start..end],
                    },
                    start..end,
                )),
            }
        }

        break;
    }

    lexemes
}
