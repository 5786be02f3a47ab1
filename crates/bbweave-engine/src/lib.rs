//! # bbweave-engine
//!
//! BBCode to HTML and back. Text is tokenized against a [`TagRegistry`],
//! built into an arena-backed [`TokenTree`], repaired and normalized, then
//! serialized by either renderer. Malformed input never fails: anything
//! that cannot be a tag is kept as text.
//!
//! ```
//! use bbweave_engine::{BbcodeParser, TagRegistry};
//!
//! let registry = TagRegistry::with_defaults();
//! let parser = BbcodeParser::new(&registry);
//! assert_eq!(
//!     parser.to_bbcode("[b]test[code]test[/code]test[/b]", false).unwrap(),
//!     "[b]test[/b][code]test[/code]\n[b]test[/b]"
//! );
//! ```

pub mod error;
pub mod options;
pub mod parser;
pub mod parsing;
pub mod registry;
pub mod render;

// Re-export key types for easier usage
pub use error::ParseError;
pub use options::{ParserOptions, QuoteCallback, QuoteType};
pub use parser::BbcodeParser;
pub use parsing::parse;
pub use parsing::token::{Parent, Token, TokenId, TokenKind, TokenTree};
pub use registry::{
    ElementMatcher, FormatCallback, Formatter, HtmlCallback, HtmlElement, HtmlFormatter,
    RemoveHandle, TagClause, TagDefinition, TagRegistry, ValueClause,
};
pub use render::bbcode::to_bbcode;
pub use render::html::{to_html, to_html_fragment};

pub use bbweave_syntax::{Attrs, DEFAULT_ATTR};
