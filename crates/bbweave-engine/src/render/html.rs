//! Token tree to HTML.
//!
//! At document level, runs of inline output are wrapped in `<div>` lines:
//! every top-level newline ends the current line, and block tags stand on
//! their own. An empty line is `<div><br /></div>`. Below the top level,
//! newlines become `<br />`.
//!
//! Block tags whose last child renders inline get a trailing `<br />` so a
//! final empty line inside them is not collapsed by the browser.

use crate::parsing::token::{Token, TokenId, TokenKind, TokenTree};
use crate::registry::{HtmlFormatter, TagDefinition, TagRegistry};
use crate::render::escape::{escape_entities, format_template};

const LINE_BREAK: &str = "<br />";

/// Render a whole document, wrapping top-level inline runs in `<div>`s.
pub fn to_html(tree: &TokenTree, registry: &TagRegistry) -> String {
    HtmlRenderer { tree, registry }.render_list(tree.roots(), true)
}

/// Render without the top-level line wrapping, for embedding in inline
/// context.
pub fn to_html_fragment(tree: &TokenTree, registry: &TagRegistry) -> String {
    HtmlRenderer { tree, registry }.render_list(tree.roots(), false)
}

/// Unknown tags and demoted content render inline.
fn html_inline(def: Option<&TagDefinition>) -> bool {
    def.is_none_or(TagDefinition::is_html_inline)
}

struct HtmlRenderer<'a> {
    tree: &'a TokenTree,
    registry: &'a TagRegistry,
}

impl HtmlRenderer<'_> {
    fn render_list(&self, ids: &[TokenId], is_root: bool) -> String {
        let mut out = String::new();
        let mut line_open = false;

        for (pos, &id) in ids.iter().enumerate() {
            let token = &self.tree[id];
            let (html, needs_line) = match token.kind {
                TokenKind::Open => (
                    self.render_tag(token),
                    is_root && html_inline(self.registry.get(&token.name)),
                ),
                TokenKind::Newline if !is_root => {
                    out.push_str(LINE_BREAK);
                    continue;
                }
                TokenKind::Newline => {
                    if !line_open {
                        out.push_str("<div>");
                    }
                    out.push_str(LINE_BREAK);
                    // A trailing break needs a second one to show up.
                    if pos + 1 == ids.len() {
                        out.push_str(LINE_BREAK);
                    }
                    out.push_str("</div>\n");
                    line_open = false;
                    continue;
                }
                TokenKind::Content | TokenKind::Close => (escape_entities(&token.raw), is_root),
            };

            if needs_line && !line_open {
                out.push_str("<div>");
                line_open = true;
            } else if !needs_line && line_open {
                out.push_str("</div>\n");
                line_open = false;
            }
            out.push_str(&html);
        }

        if line_open {
            out.push_str("</div>\n");
        }
        out
    }

    fn render_tag(&self, token: &Token) -> String {
        let mut content = self.render_list(&token.children, false);

        let Some((def, formatter)) = self
            .registry
            .get(&token.name)
            .and_then(|def| def.html.as_ref().map(|html| (def, html)))
        else {
            let closing = token
                .closing
                .map(|id| escape_entities(&self.tree[id].raw))
                .unwrap_or_default();
            return format!("{}{content}{closing}", escape_entities(&token.raw));
        };

        let last_is_inline = token
            .children
            .last()
            .is_none_or(|&last| html_inline(self.registry.get(&self.tree[last].name)));
        if !def.is_html_inline() && last_is_inline && !def.skip_last_line_break {
            content.push_str(LINE_BREAK);
        }

        match formatter {
            HtmlFormatter::Template(template) => format_template(template, |name| {
                if name == "0" {
                    Some(content.as_str())
                } else {
                    token.attrs.get(name)
                }
            }),
            HtmlFormatter::Callback(render) => render(token, &token.attrs, &content),
        }
    }
}
