//! Turns the flat token sequence into a tree.
//!
//! The builder keeps a stack of open tags and resolves, one token at a time:
//!
//! - tags implicitly closed by a sibling or an outer close (`closed_by`,
//!   e.g. `[*]a[*]b[/list]`)
//! - close tags that skip over inner open tags: the skipped tags are cloned
//!   and reopened after the close, so `[b][i]x[/b]y[/i]` becomes
//!   `[b][i]x[/i][/b][i]y[/i]`
//! - open tags that are never closed, and close tags with nothing to close,
//!   which are demoted to content; a close right after a self-closing tag
//!   of the same name is kept as that tag's closing instead
//! - children a tag does not allow, also demoted
//!
//! Whether a close tag is still ahead is answered from a per-name counter
//! rather than by scanning the remaining input.

use std::collections::HashMap;
use std::iter::Peekable;

use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::parsing::token::{Parent, Token, TokenId, TokenKind, TokenTree};
use crate::registry::TagRegistry;

pub struct TreeBuilder<'r> {
    registry: &'r TagRegistry,
    options: &'r ParserOptions,
    tree: TokenTree,
    open: Vec<TokenId>,
    /// Close tokens not yet consumed, by tag name.
    remaining_closes: HashMap<String, usize>,
}

/// Build a tree from `tokens`.
pub fn build(
    tokens: Vec<Token>,
    registry: &TagRegistry,
    options: &ParserOptions,
) -> Result<TokenTree, ParseError> {
    let mut builder = TreeBuilder::new(registry, options, &tokens);
    let mut rest = tokens.into_iter().peekable();
    while let Some(token) = rest.next() {
        builder.push(token, &mut rest)?;
    }
    Ok(builder.finish())
}

impl<'r> TreeBuilder<'r> {
    pub fn new(registry: &'r TagRegistry, options: &'r ParserOptions, tokens: &[Token]) -> Self {
        let mut remaining_closes = HashMap::new();
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Close) {
            *remaining_closes.entry(token.name.clone()).or_insert(0) += 1;
        }
        Self {
            registry,
            options,
            tree: TokenTree::new(),
            open: Vec::new(),
            remaining_closes,
        }
    }

    /// Consume one token. `rest` is the remaining input, used to look at and
    /// occasionally take the following token.
    pub fn push<I>(&mut self, mut token: Token, rest: &mut Peekable<I>) -> Result<(), ParseError>
    where
        I: Iterator<Item = Token>,
    {
        if token.kind == TokenKind::Close
            && let Some(n) = self.remaining_closes.get_mut(&token.name)
        {
            *n = n.saturating_sub(1);
        }

        if !self.child_allowed(&token) && !self.closes_top(&token) {
            log::debug!("demoting disallowed child {:?}", token.raw);
            token.demote();
        }

        match token.kind {
            TokenKind::Open => self.open_tag(token),
            TokenKind::Close => self.close_tag(token, rest),
            TokenKind::Newline => {
                self.end_before_newline(rest.peek());
                self.append(token);
                Ok(())
            }
            TokenKind::Content => {
                self.append(token);
                Ok(())
            }
        }
    }

    pub fn finish(self) -> TokenTree {
        self.tree
    }

    fn top(&self) -> Option<TokenId> {
        self.open.last().copied()
    }

    fn parent(&self) -> Parent {
        self.top().map_or(Parent::Root, Parent::Token)
    }

    fn append(&mut self, token: Token) -> TokenId {
        let parent = self.parent();
        self.tree.append(parent, token)
    }

    fn attach(&mut self, id: TokenId) {
        let parent = self.parent();
        self.tree.children_mut(parent).push(id);
    }

    fn push_open(&mut self, id: TokenId) -> Result<(), ParseError> {
        if self.open.len() >= self.options.max_depth {
            return Err(ParseError::TooDeeplyNested {
                limit: self.options.max_depth,
            });
        }
        self.open.push(id);
        Ok(())
    }

    fn remaining_closes(&self, name: &str) -> usize {
        self.remaining_closes.get(name).copied().unwrap_or(0)
    }

    /// Whether the innermost open tag is closed by `key`.
    fn top_closed_by(&self, key: &str) -> bool {
        self.top().is_some_and(|top| {
            self.registry
                .get(&self.tree[top].name)
                .is_some_and(|def| def.is_closed_by(key))
        })
    }

    fn closes_top(&self, token: &Token) -> bool {
        token.kind == TokenKind::Close
            && self
                .top()
                .is_some_and(|top| self.tree[top].name == token.name)
    }

    fn child_allowed(&self, token: &Token) -> bool {
        if !self.options.fix_invalid_children {
            return true;
        }
        self.top()
            .is_none_or(|top| self.registry.allows_child(&self.tree[top].name, &token.name))
    }

    fn open_tag(&mut self, token: Token) -> Result<(), ParseError> {
        if self.top_closed_by(&token.name) {
            self.open.pop();
        }

        let registry = self.registry;
        let definition = registry.get(&token.name);
        let closes_ahead = self.remaining_closes(&token.name) > 0;
        let id = self.append(token);

        match definition {
            Some(def) if def.is_self_closing => {}
            Some(def) if def.closed_by.is_some() || closes_ahead => self.push_open(id)?,
            _ => {
                log::debug!("demoting unclosed tag {:?}", self.tree[id].raw);
                self.tree[id].demote();
            }
        }
        Ok(())
    }

    fn close_tag<I>(&mut self, mut token: Token, rest: &mut Peekable<I>) -> Result<(), ParseError>
    where
        I: Iterator<Item = Token>,
    {
        let close_key = format!("/{}", token.name);
        if !self.closes_top(&token) && self.top_closed_by(&close_key) {
            self.open.pop();
        }

        if let Some(top) = self.top()
            && self.tree[top].name == token.name
        {
            let close = self.tree.push(token);
            self.tree[top].closing = Some(close);
            self.open.pop();
            return Ok(());
        }

        let Some(target) = self
            .open
            .iter()
            .rposition(|&id| self.tree[id].name == token.name)
        else {
            if let Some(opener) = self.self_closing_opener(&token.name) {
                let close = self.tree.push(token);
                self.tree[opener].closing = Some(close);
                return Ok(());
            }
            log::debug!("demoting unmatched close {:?}", token.raw);
            token.demote();
            self.append(token);
            return Ok(());
        };

        log::debug!(
            "close {:?} skips {} open tag(s), reopening them",
            token.raw,
            self.open.len() - target - 1
        );

        // Innermost first: each clone wraps the previous one.
        let mut clones = Vec::new();
        let mut outer = None;
        for id in self.open.split_off(target + 1).into_iter().rev() {
            let clone = self.tree.clone_shallow(id);
            if let Some(inner) = outer {
                self.tree[clone].children.push(inner);
            }
            outer = Some(clone);
            clones.push(clone);
        }

        let is_block = !self.registry.is_inline(&token.name);
        let close = self.tree.push(token);
        if let Some(matched) = self.open.pop() {
            self.tree[matched].closing = Some(close);
        }

        if is_block
            && let Some(newline) = rest.next_if(|next| next.kind == TokenKind::Newline)
        {
            self.append(newline);
        }

        if let Some(outer) = outer {
            self.attach(outer);
        }
        for clone in clones.into_iter().rev() {
            self.push_open(clone)?;
        }
        Ok(())
    }

    /// The self-closing tag written immediately before a close of the same
    /// name, such as `[hr]` in `[hr][/hr]`.
    fn self_closing_opener(&self, name: &str) -> Option<TokenId> {
        if !self.registry.get(name).is_some_and(|def| def.is_self_closing) {
            return None;
        }
        let &last = self.tree.children(self.parent()).last()?;
        let token = &self.tree[last];
        (token.kind == TokenKind::Open && token.name == name && token.closing.is_none())
            .then_some(last)
    }

    /// A line break right before the token that would implicitly close the
    /// current tag belongs outside it when the tag breaks after itself.
    fn end_before_newline(&mut self, next: Option<&Token>) {
        let (Some(top), Some(next)) = (self.top(), next) else {
            return;
        };

        let key = match next.kind {
            TokenKind::Close => format!("/{}", next.name),
            _ => next.name.clone(),
        };
        if !self.top_closed_by(&key) || self.closes_top(next) {
            return;
        }

        let Some(def) = self.registry.get(&self.tree[top].name) else {
            return;
        };
        let breaks_after = def.break_after == Some(true)
            || (!def.is_inline && self.options.break_after_block && def.break_after != Some(false));
        if breaks_after {
            self.open.pop();
        }
    }
}
