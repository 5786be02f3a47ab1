//! BBCode text to token tree.
//!
//! Parsing runs as a fixed sequence of passes over one arena:
//!
//! 1. [`tokenizer`] splits the text into open, close, newline and content tokens
//! 2. [`builder`] nests them, closing and demoting as it goes
//! 3. [`nesting`] lifts block tags out of inline ones (optional)
//! 4. [`newlines`] drops line breaks the block layout implies
//! 5. [`prune`] unwraps tags with only whitespace inside (optional)

pub mod builder;
pub mod nesting;
pub mod newlines;
pub mod prune;
pub mod snapshot;
pub mod token;
pub mod tokenizer;

use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::registry::TagRegistry;
use token::TokenTree;

/// Parse `text` into a repaired, normalized tree.
///
/// With `preserve_newlines` every line break survives except the one right
/// after a block tag.
pub fn parse(
    text: &str,
    registry: &TagRegistry,
    options: &ParserOptions,
    preserve_newlines: bool,
) -> Result<TokenTree, ParseError> {
    let tokens = tokenizer::tokenize(text, registry);
    log::trace!("tokenized {} bytes into {} tokens", text.len(), tokens.len());

    let mut tree = builder::build(tokens, registry, options)?;
    if options.fix_invalid_nesting {
        nesting::fix_nesting(&mut tree, registry, options);
    }
    newlines::normalize_newlines(&mut tree, registry, options, preserve_newlines);
    if options.remove_empty_tags {
        prune::remove_empty(&mut tree, registry);
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use snapshot::{check_repaired, outline};

    fn parsed(text: &str) -> String {
        let registry = TagRegistry::with_defaults();
        let tree = parse(text, &registry, &ParserOptions::default(), false).unwrap();
        check_repaired(&tree, &registry);
        outline(&tree)
    }

    #[test]
    fn all_passes_run() {
        assert_eq!(
            parsed("[b]a[quote]q[/quote]\n[i] [/i][/b]"),
            r#"b("a") quote(b("q")) " ""#
        );
    }

    #[test]
    fn optional_passes_can_be_skipped() {
        let registry = TagRegistry::with_defaults();
        let options = ParserOptions {
            fix_invalid_nesting: false,
            remove_empty_tags: false,
            ..ParserOptions::default()
        };
        let tree = parse("[b]a[quote]q[/quote][i] [/i][/b]", &registry, &options, false).unwrap();
        assert_eq!(outline(&tree), r#"b("a" quote("q") i(" "))"#);
    }

    #[test]
    fn empty_input() {
        assert_eq!(parsed(""), "");
    }
}
