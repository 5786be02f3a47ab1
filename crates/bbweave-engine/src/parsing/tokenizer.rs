//! Classify lexemes into typed tokens using the tag registry.

use bbweave_syntax::{Lexeme, LexemeKind, lex, parse_close_tag, parse_open_tag};

use crate::parsing::token::Token;
use crate::registry::TagRegistry;

/// Scan `text` into a flat token sequence.
///
/// Open and close tags whose name is not registered become content holding
/// the bracketed text, as do stray brackets. Never fails.
pub fn tokenize(text: &str, registry: &TagRegistry) -> Vec<Token> {
    lex(text)
        .into_iter()
        .map(|lexeme| classify(lexeme, registry))
        .collect()
}

fn classify(lexeme: Lexeme<'_>, registry: &TagRegistry) -> Token {
    let raw = lexeme.text;
    match lexeme.kind {
        LexemeKind::OpenTag => match parse_open_tag(raw) {
            Some(head) if registry.contains(&head.name) => Token::open(head.name, raw, head.attrs),
            _ => Token::content(raw),
        },
        LexemeKind::CloseTag => match parse_close_tag(raw) {
            Some(name) if registry.contains(&name) => Token::close(name, raw),
            _ => Token::content(raw),
        },
        LexemeKind::Newline => Token::newline(raw),
        LexemeKind::Text | LexemeKind::StrayBracket => Token::content(raw),
    }
}
