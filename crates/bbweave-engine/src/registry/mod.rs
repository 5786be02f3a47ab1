//! # Tag Registry
//!
//! Maps lower-cased tag names to [`TagDefinition`]s. Every stage of the
//! pipeline consults it: the tokenizer to tell tags from text, the builder
//! for closure and child rules, the repair passes for block/inline
//! classification and the serializers for templates and line-break policy.
//!
//! A parse borrows the registry immutably for its whole duration; changing
//! tags needs `&mut`, so edits can only happen between calls.
//!
//! ```
//! use bbweave_engine::{TagDefinition, TagRegistry};
//!
//! let mut registry = TagRegistry::with_defaults();
//! let handle = registry.set("spoiler", TagDefinition::new().block().html_template("<details>{0}</details>"));
//! assert!(registry.contains("spoiler"));
//!
//! handle.remove(&mut registry);
//! assert!(!registry.contains("spoiler"));
//! ```

pub mod defaults;
pub mod matcher;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bbweave_syntax::Attrs;

use crate::options::QuoteType;
use crate::parsing::token::Token;

pub use matcher::{ElementMatcher, HtmlElement, TagClause, ValueClause};

/// Renders a parsed tag to markup: `(token, attributes, rendered content)`.
pub type HtmlCallback = Arc<dyn Fn(&Token, &Attrs, &str) -> String + Send + Sync>;
/// Renders a markup element to BBCode: `(element, converted content)`.
pub type FormatCallback = Arc<dyn Fn(&HtmlElement, &str) -> String + Send + Sync>;

/// BBCode → markup conversion for one tag.
#[derive(Clone)]
pub enum HtmlFormatter {
    /// `{0}` is the rendered content, `{name}` an escaped attribute and
    /// `{!name}` a raw attribute.
    Template(String),
    Callback(HtmlCallback),
}

impl fmt::Debug for HtmlFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlFormatter::Template(t) => f.debug_tuple("Template").field(t).finish(),
            HtmlFormatter::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Markup element → BBCode conversion for one tag.
#[derive(Clone)]
pub enum Formatter {
    /// `{0}` is the converted content.
    Template(String),
    Callback(FormatCallback),
}

impl Formatter {
    pub fn render(&self, element: &HtmlElement, content: &str) -> String {
        match self {
            Formatter::Template(template) => template.replace("{0}", content),
            Formatter::Callback(f) => f(element, content),
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatter::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Formatter::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Everything the pipeline knows about one tag.
///
/// Fields are public; the chaining methods exist so the default set and
/// host code read as declarations.
#[derive(Debug, Clone)]
pub struct TagDefinition {
    pub is_inline: bool,
    /// Overrides `is_inline` when deciding root-level block wrapping in HTML.
    pub is_html_inline: Option<bool>,
    pub allows_empty: bool,
    pub is_self_closing: bool,
    /// The BBCode serializer never writes `[/name]`.
    pub exclude_closing: bool,
    /// Tag names (`/name` for close tags) that implicitly close this tag.
    pub closed_by: Option<Vec<String>>,
    /// Permitted child names; `#` is text and `#newline` a line break.
    pub allowed_children: Option<Vec<String>>,
    pub break_before: Option<bool>,
    pub break_start: Option<bool>,
    pub break_end: Option<bool>,
    pub break_after: Option<bool>,
    /// No placeholder `<br />` at the end of a block's HTML content.
    pub skip_last_line_break: bool,
    pub quote_type: Option<QuoteType>,
    /// Overrides the parser-wide strict matching for this tag's matcher.
    pub strict_match: Option<bool>,
    pub format: Option<Formatter>,
    pub html: Option<HtmlFormatter>,
    pub matcher: ElementMatcher,
}

impl Default for TagDefinition {
    fn default() -> Self {
        Self {
            is_inline: true,
            is_html_inline: None,
            allows_empty: false,
            is_self_closing: false,
            exclude_closing: false,
            closed_by: None,
            allowed_children: None,
            break_before: None,
            break_start: None,
            break_end: None,
            break_after: None,
            skip_last_line_break: false,
            quote_type: None,
            strict_match: None,
            format: None,
            html: None,
            matcher: ElementMatcher::default(),
        }
    }
}

fn owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_lowercase()).collect()
}

impl TagDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(mut self) -> Self {
        self.is_inline = false;
        self
    }

    pub fn html_inline(mut self, inline: bool) -> Self {
        self.is_html_inline = Some(inline);
        self
    }

    pub fn allows_empty(mut self) -> Self {
        self.allows_empty = true;
        self
    }

    pub fn self_closing(mut self) -> Self {
        self.is_self_closing = true;
        self
    }

    pub fn exclude_closing(mut self) -> Self {
        self.exclude_closing = true;
        self
    }

    pub fn closed_by(mut self, names: &[&str]) -> Self {
        self.closed_by = Some(owned_names(names));
        self
    }

    pub fn allowed_children(mut self, names: &[&str]) -> Self {
        self.allowed_children = Some(owned_names(names));
        self
    }

    pub fn break_before(mut self, on: bool) -> Self {
        self.break_before = Some(on);
        self
    }

    pub fn break_start(mut self, on: bool) -> Self {
        self.break_start = Some(on);
        self
    }

    pub fn break_end(mut self, on: bool) -> Self {
        self.break_end = Some(on);
        self
    }

    pub fn break_after(mut self, on: bool) -> Self {
        self.break_after = Some(on);
        self
    }

    pub fn skip_last_line_break(mut self) -> Self {
        self.skip_last_line_break = true;
        self
    }

    pub fn quote(mut self, quote_type: QuoteType) -> Self {
        self.quote_type = Some(quote_type);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_match = Some(strict);
        self
    }

    pub fn html_template(mut self, template: impl Into<String>) -> Self {
        self.html = Some(HtmlFormatter::Template(template.into()));
        self
    }

    pub fn html_fn(
        mut self,
        f: impl Fn(&Token, &Attrs, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.html = Some(HtmlFormatter::Callback(Arc::new(f)));
        self
    }

    pub fn format_template(mut self, template: impl Into<String>) -> Self {
        self.format = Some(Formatter::Template(template.into()));
        self
    }

    pub fn format_fn(
        mut self,
        f: impl Fn(&HtmlElement, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.format = Some(Formatter::Callback(Arc::new(f)));
        self
    }

    pub fn matcher(mut self, matcher: ElementMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Whether `name` (a tag name, or `/name` for a close tag) closes this tag.
    pub fn is_closed_by(&self, name: &str) -> bool {
        self.closed_by
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == name))
    }

    /// Whether a child named `name` may sit directly inside this tag.
    pub fn allows_child(&self, name: &str) -> bool {
        self.allowed_children
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == name))
    }

    /// Inline-ness used for root-level HTML block wrapping.
    pub fn is_html_inline(&self) -> bool {
        self.is_html_inline.unwrap_or(self.is_inline)
    }
}

/// Removes the tag it was returned for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveHandle(String);

impl RemoveHandle {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn remove(self, registry: &mut TagRegistry) -> Option<TagDefinition> {
        registry.remove(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: BTreeMap<String, TagDefinition>,
}

fn key(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_uppercase) {
        Cow::Owned(name.to_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

impl TagRegistry {
    /// A registry with no tags; every bracket is plain text.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard BBCode tag set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        defaults::register(&mut registry);
        registry
    }

    pub fn get(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.get(&*key(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TagDefinition> {
        self.tags.get_mut(&*key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or replace a tag.
    ///
    /// An existing definition is replaced whole, so fields not set on
    /// `definition` fall back to their defaults. Use [`TagRegistry::update`]
    /// to change some fields of a registered tag and keep the rest.
    pub fn set(&mut self, name: &str, definition: TagDefinition) -> RemoveHandle {
        let name = key(name).into_owned();
        self.tags.insert(name.clone(), definition);
        RemoveHandle(name)
    }

    /// Edit a tag in place, starting from the defaults if it does not exist.
    pub fn update(&mut self, name: &str, edit: impl FnOnce(&mut TagDefinition)) -> RemoveHandle {
        let name = key(name).into_owned();
        edit(self.tags.entry(name.clone()).or_default());
        RemoveHandle(name)
    }

    /// Move a definition to a new name, replacing anything already there.
    ///
    /// Templates and callbacks are kept as they are. Returns false when `old`
    /// is not registered.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        match self.tags.remove(&*key(old)) {
            Some(definition) => {
                self.tags.insert(key(new).into_owned(), definition);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<TagDefinition> {
        self.tags.remove(&*key(name))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Unknown names count as inline.
    pub fn is_inline(&self, name: &str) -> bool {
        self.get(name).is_none_or(|def| def.is_inline)
    }

    /// Whether `child` may sit inside `parent`; unknown parents allow anything.
    pub fn allows_child(&self, parent: &str, child: &str) -> bool {
        self.get(parent).is_none_or(|def| def.allows_child(child))
    }

    /// Names of every tag whose matcher accepts `element`.
    ///
    /// `strict` applies to tags without their own `strict_match`.
    pub fn match_element(&self, element: &HtmlElement, strict: bool) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|(_, def)| def.matcher.matches(element, def.strict_match.unwrap_or(strict)))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
