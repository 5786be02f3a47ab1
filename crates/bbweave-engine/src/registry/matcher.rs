//! Declarative element matching for the markup → BBCode direction.
//!
//! A tag says which rich markup elements it stands for with clauses instead
//! of code: `[b]` matches `<b>`, `<strong>` and anything styled
//! `font-weight: bold`; `[url]` matches `<a>` that carries an `href`.
//!
//! ```
//! use bbweave_engine::{ElementMatcher, HtmlElement, ValueClause};
//!
//! let matcher = ElementMatcher::new()
//!     .tag("strong")
//!     .style("font-weight", ValueClause::one_of(["bold", "700"]));
//!
//! assert!(matcher.matches(&HtmlElement::new("strong"), false));
//! assert!(matcher.matches(&HtmlElement::new("span").with_style("font-weight", "700"), false));
//! assert!(!matcher.matches(&HtmlElement::new("span"), false));
//! ```

use bbweave_syntax::Attrs;

/// A rich markup element reduced to what matching needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlElement {
    /// Lower-cased element name.
    pub name: String,
    pub attrs: Attrs,
    /// Inline style properties.
    pub styles: Attrs,
}

impl HtmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value);
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property, value);
        self
    }
}

/// Which values satisfy a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueClause {
    /// Present with any value.
    Any,
    /// Present with one of these values.
    OneOf(Vec<String>),
}

impl ValueClause {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueClause::OneOf(values.into_iter().map(Into::into).collect())
    }

    fn accepts(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (_, None) => false,
            (ValueClause::Any, Some(_)) => true,
            (ValueClause::OneOf(values), Some(v)) => values.iter().any(|allowed| allowed == v),
        }
    }
}

/// An element name with optional attribute requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagClause {
    pub element: String,
    pub attrs: Vec<(String, ValueClause)>,
}

impl TagClause {
    /// Without attribute clauses the name alone decides. With them, `strict`
    /// selects between every clause and at least one clause holding.
    fn matches(&self, element: &HtmlElement, strict: bool) -> bool {
        if self.element != element.name {
            return false;
        }
        if self.attrs.is_empty() {
            return true;
        }
        let holds = |(name, clause): &(String, ValueClause)| clause.accepts(element.attrs.get(name));
        if strict {
            self.attrs.iter().all(holds)
        } else {
            self.attrs.iter().any(holds)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementMatcher {
    pub tags: Vec<TagClause>,
    pub styles: Vec<(String, ValueClause)>,
}

impl ElementMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match elements by name alone.
    pub fn tag(self, element: &str) -> Self {
        self.tag_with(element, std::iter::empty())
    }

    /// Match elements by name and attribute clauses.
    pub fn tag_with<'a>(
        mut self,
        element: &str,
        attrs: impl IntoIterator<Item = (&'a str, ValueClause)>,
    ) -> Self {
        self.tags.push(TagClause {
            element: element.to_lowercase(),
            attrs: attrs
                .into_iter()
                .map(|(name, clause)| (name.to_lowercase(), clause))
                .collect(),
        });
        self
    }

    /// Match any element carrying this style property.
    pub fn style(mut self, property: &str, clause: ValueClause) -> Self {
        self.styles.push((property.to_lowercase(), clause));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.styles.is_empty()
    }

    pub fn matches(&self, element: &HtmlElement, strict: bool) -> bool {
        self.tags.iter().any(|t| t.matches(element, strict))
            || self
                .styles
                .iter()
                .any(|(prop, clause)| clause.accepts(element.styles.get(prop)))
    }
}
