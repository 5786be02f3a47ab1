//! Token tree back to BBCode.
//!
//! Known tags are re-emitted in canonical form: lower-case names, the
//! default attribute first, values quoted per the tag's quote type, and
//! structural line breaks written back from the block policy the newline
//! normalizer removed them with. Unknown tags, content and newlines are
//! written as they were read.

use bbweave_syntax::DEFAULT_ATTR;

use crate::options::{ParserOptions, QuoteType, tag_break};
use crate::parsing::token::{Token, TokenId, TokenKind, TokenTree};
use crate::registry::{TagDefinition, TagRegistry};

pub fn to_bbcode(tree: &TokenTree, registry: &TagRegistry, options: &ParserOptions) -> String {
    BbcodeWriter {
        tree,
        registry,
        options,
    }
    .write_list(tree.roots())
}

/// Quote an attribute value for tag `name`.
///
/// `Auto` leaves values without whitespace or `=` bare. Quoted values have
/// `\` and `"` backslash-escaped.
pub fn quote(value: &str, quote_type: &QuoteType, name: &str) -> String {
    match quote_type {
        QuoteType::Custom(f) => f(value, name),
        QuoteType::Never => value.to_string(),
        QuoteType::Auto if !value.contains(|c: char| c.is_whitespace() || c == '=') => {
            value.to_string()
        }
        QuoteType::Auto | QuoteType::Always => {
            format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
        }
    }
}

struct BbcodeWriter<'a> {
    tree: &'a TokenTree,
    registry: &'a TagRegistry,
    options: &'a ParserOptions,
}

impl BbcodeWriter<'_> {
    fn write_list(&self, ids: &[TokenId]) -> String {
        ids.iter().map(|&id| self.write_token(id)).collect()
    }

    fn write_token(&self, id: TokenId) -> String {
        let token = &self.tree[id];
        if token.kind != TokenKind::Open {
            return token.raw.clone();
        }
        match self.registry.get(&token.name) {
            Some(def) => self.write_tag(id, token, def),
            None => {
                let closing = self.tree.closing(id).map(|c| c.raw.as_str()).unwrap_or_default();
                format!("{}{}{closing}", token.raw, self.write_list(&token.children))
            }
        }
    }

    fn write_tag(&self, id: TokenId, token: &Token, def: &TagDefinition) -> String {
        let options = self.options;
        let block = !def.is_inline;
        let quote_type = def.quote_type.as_ref().unwrap_or(&options.quote_type);

        let mut out = String::new();
        if tag_break(block, options.break_before_block, def.break_before) {
            out.push('\n');
        }

        out.push('[');
        out.push_str(&token.name);
        if let Some(value) = token.attrs.default_attr().filter(|v| !v.is_empty()) {
            out.push('=');
            out.push_str(&quote(value, quote_type, DEFAULT_ATTR));
        }
        for (name, value) in token.attrs.iter().filter(|(name, _)| *name != DEFAULT_ATTR) {
            out.push(' ');
            out.push_str(name);
            out.push('=');
            out.push_str(&quote(value, quote_type, name));
        }
        out.push(']');

        if tag_break(
            block && !def.is_self_closing,
            options.break_start_block,
            def.break_start,
        ) {
            out.push('\n');
        }

        out.push_str(&self.write_list(&token.children));

        if !def.is_self_closing && !def.exclude_closing {
            if tag_break(block, options.break_end_block, def.break_end) {
                out.push('\n');
            }
            out.push_str("[/");
            out.push_str(&token.name);
            out.push(']');
        }

        if def.is_self_closing
            && let Some(closing) = self.tree.closing(id)
        {
            out.push_str(&closing.raw);
        }

        if tag_break(block, options.break_after_block, def.break_after) {
            out.push('\n');
        }
        out
    }
}
