use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::parsing::{self, token::TokenTree};
use crate::registry::{HtmlElement, TagRegistry};
use crate::render::{bbcode, html};

/// Converts BBCode with a fixed registry and options.
///
/// The parser borrows its registry, so tags cannot change while a parser is
/// alive; drop it, edit the registry, and create another.
///
/// ```
/// use bbweave_engine::{BbcodeParser, TagRegistry};
///
/// let registry = TagRegistry::with_defaults();
/// let parser = BbcodeParser::new(&registry);
/// assert_eq!(parser.to_html("[b]test[/b]", false).unwrap(), "<div><strong>test</strong></div>\n");
/// assert_eq!(parser.to_bbcode("[B]test[/B]", false).unwrap(), "[b]test[/b]");
/// ```
#[derive(Debug, Clone)]
pub struct BbcodeParser<'r> {
    registry: &'r TagRegistry,
    options: ParserOptions,
}

impl<'r> BbcodeParser<'r> {
    pub fn new(registry: &'r TagRegistry) -> Self {
        Self::with_options(registry, ParserOptions::default())
    }

    pub fn with_options(registry: &'r TagRegistry, options: ParserOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r TagRegistry {
        self.registry
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, text: &str, preserve_newlines: bool) -> Result<TokenTree, ParseError> {
        parsing::parse(text, self.registry, &self.options, preserve_newlines)
    }

    pub fn to_html(&self, text: &str, preserve_newlines: bool) -> Result<String, ParseError> {
        Ok(self.render_html(&self.parse(text, preserve_newlines)?))
    }

    pub fn to_html_fragment(&self, text: &str, preserve_newlines: bool) -> Result<String, ParseError> {
        Ok(self.render_html_fragment(&self.parse(text, preserve_newlines)?))
    }

    pub fn to_bbcode(&self, text: &str, preserve_newlines: bool) -> Result<String, ParseError> {
        Ok(self.render_bbcode(&self.parse(text, preserve_newlines)?))
    }

    pub fn render_html(&self, tree: &TokenTree) -> String {
        html::to_html(tree, self.registry)
    }

    pub fn render_html_fragment(&self, tree: &TokenTree) -> String {
        html::to_html_fragment(tree, self.registry)
    }

    pub fn render_bbcode(&self, tree: &TokenTree) -> String {
        bbcode::to_bbcode(tree, self.registry, &self.options)
    }

    /// Tags standing for `element`, honouring `strict_match`.
    pub fn match_element(&self, element: &HtmlElement) -> Vec<&'r str> {
        self.registry.match_element(element, self.options.strict_match)
    }

    /// BBCode for `element` from the first matching tag with a formatter.
    ///
    /// `content` is the already converted content of the element.
    pub fn format_element(&self, element: &HtmlElement, content: &str) -> Option<String> {
        self.match_element(element).into_iter().find_map(|name| {
            let formatter = self.registry.get(name)?.format.as_ref()?;
            log::trace!("formatting <{}> as [{name}]", element.name);
            Some(formatter.render(element, content))
        })
    }
}
