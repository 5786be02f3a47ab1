//! # bbweave-syntax
//!
//! Registry-independent scanning of BBCode source text, built on [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Architecture Overview
//!
//! This crate knows nothing about which tags exist. It answers two questions:
//!
//! ```text
//! Source Text → Lexer → Lexemes          (lexer)
//! "[quote=bob]" → TagHead { name, attrs } (tag, attrs)
//! ```
//!
//! The engine crate combines both with a tag registry to produce typed
//! tokens, build the token tree, repair it and serialize it.
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Splits input into text, newline, open tag, close tag and stray bracket
//! lexemes. Every byte lands in exactly one lexeme.
//!
//! ```text
//! "[b]hi[/b]\n" → [OpenTag("[b]"), Text("hi"), CloseTag("[/b]"), Newline]
//! ```
//!
//! ### 2. Tag heads ([`tag`] and [`attrs`] modules)
//!
//! Extracts the lower-cased name and the insertion-ordered attribute map
//! from an open tag, using quote-aware scanning.
//!
//! ## Quick Start
//!
//! ```
//! use bbweave_syntax::{lex, parse_open_tag, LexemeKind};
//!
//! let lexemes = lex("[quote author=\"a b\"]hi[/quote]");
//! assert_eq!(lexemes[0].kind, LexemeKind::OpenTag);
//!
//! let head = parse_open_tag(lexemes[0].text).unwrap();
//! assert_eq!(head.name, "quote");
//! assert_eq!(head.attrs.get("author"), Some("a b"));
//! ```

pub mod attrs;
mod cursor;
pub mod lexer;
pub mod tag;

pub use attrs::{Attrs, DEFAULT_ATTR, parse_attrs, strip_quotes};
pub use lexer::{Lexeme, LexemeKind, lex, lex_with_spans};
pub use tag::{TagHead, parse_close_tag, parse_open_tag};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_open_lexeme_with_a_name_has_a_head() {
        let input = "[b]x[/b][url=http://a.b]y[/url][ nope][img width=1]";
        let names: Vec<_> = lex(input)
            .into_iter()
            .filter(|l| l.kind == LexemeKind::OpenTag)
            .map(|l| parse_open_tag(l.text).map(|h| h.name))
            .collect();
        assert_eq!(
            names,
            vec![
                Some("b".to_string()),
                Some("url".to_string()),
                None,
                Some("img".to_string())
            ]
        );
    }

    #[test]
    fn close_lexemes_carry_names() {
        let names: Vec<_> = lex("[/b][/URL]")
            .into_iter()
            .filter_map(|l| parse_close_tag(l.text))
            .collect();
        assert_eq!(names, vec!["b", "url"]);
    }
}
