//! Tokens and the arena that owns them.
//!
//! Every token of one parse lives in a single [`TokenTree`] and is addressed
//! by [`TokenId`]. Child lists hold ids, so cloning a tag while the tree is
//! being built or repaired is a push onto the arena, and moving a subtree is
//! moving one id between two lists.

use std::ops::{Index, IndexMut};

use bbweave_syntax::Attrs;

/// Name carried by content tokens, including demoted tags.
pub const CONTENT_NAME: &str = "#";
/// Name carried by newline tokens.
pub const NEWLINE_NAME: &str = "#newline";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Open,
    Close,
    Newline,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Lower-cased tag name, [`CONTENT_NAME`] or [`NEWLINE_NAME`].
    pub name: String,
    /// The source text this token was scanned from.
    pub raw: String,
    pub attrs: Attrs,
    pub children: Vec<TokenId>,
    /// The close token that ended this tag.
    pub closing: Option<TokenId>,
}

impl Token {
    pub fn open(name: impl Into<String>, raw: impl Into<String>, attrs: Attrs) -> Self {
        Self {
            kind: TokenKind::Open,
            name: name.into(),
            raw: raw.into(),
            attrs,
            children: Vec::new(),
            closing: None,
        }
    }

    pub fn close(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Close,
            name: name.into(),
            raw: raw.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
            closing: None,
        }
    }

    pub fn newline(raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Newline,
            name: NEWLINE_NAME.to_string(),
            raw: raw.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
            closing: None,
        }
    }

    pub fn content(raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Content,
            name: CONTENT_NAME.to_string(),
            raw: raw.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
            closing: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.kind == TokenKind::Open
    }

    /// Reclassify as plain content, keeping the raw text.
    pub fn demote(&mut self) {
        self.kind = TokenKind::Content;
        self.name = CONTENT_NAME.to_string();
    }

    /// Copy without children.
    fn shallow(&self) -> Self {
        Self {
            kind: self.kind,
            name: self.name.clone(),
            raw: self.raw.clone(),
            attrs: self.attrs.clone(),
            children: Vec::new(),
            closing: self.closing,
        }
    }
}

/// Where a child list lives: the top level of the tree or an open tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Root,
    Token(TokenId),
}

/// Arena of tokens plus the list of top-level ids.
///
/// Tokens that are no longer reachable from the roots (matched close tags,
/// split remnants) stay in the arena until the tree is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTree {
    tokens: Vec<Token>,
    roots: Vec<TokenId>,
}

impl TokenTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached token to the arena.
    pub fn push(&mut self, token: Token) -> TokenId {
        let id = TokenId(self.tokens.len());
        self.tokens.push(token);
        id
    }

    /// Add a token and attach it as the last child of `parent`.
    pub fn append(&mut self, parent: Parent, token: Token) -> TokenId {
        let id = self.push(token);
        self.children_mut(parent).push(id);
        id
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.0)
    }

    pub fn roots(&self) -> &[TokenId] {
        &self.roots
    }

    pub fn children(&self, parent: Parent) -> &[TokenId] {
        match parent {
            Parent::Root => &self.roots,
            Parent::Token(id) => &self[id].children,
        }
    }

    pub fn children_mut(&mut self, parent: Parent) -> &mut Vec<TokenId> {
        match parent {
            Parent::Root => &mut self.roots,
            Parent::Token(id) => &mut self[id].children,
        }
    }

    /// The close token matched to `id`, if any.
    pub fn closing(&self, id: TokenId) -> Option<&Token> {
        self[id].closing.map(|c| &self[c])
    }

    /// Push a childless copy of `id` and return the copy's id.
    pub fn clone_shallow(&mut self, id: TokenId) -> TokenId {
        let copy = self[id].shallow();
        self.push(copy)
    }

    /// Split `id` before child `offset`.
    ///
    /// `id` keeps its first `offset` children; the returned clone of `id`
    /// takes the rest.
    pub fn split_at(&mut self, id: TokenId, offset: usize) -> TokenId {
        let tail = self[id].children.split_off(offset);
        let right = self.clone_shallow(id);
        self[right].children = tail;
        right
    }

    /// Number of tokens in the arena, reachable or not.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Reachable tokens in document order.
    pub fn walk(&self) -> Vec<TokenId> {
        let mut out = Vec::new();
        let mut stack: Vec<TokenId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        out
    }
}

impl Index<TokenId> for TokenTree {
    type Output = Token;

    fn index(&self, id: TokenId) -> &Token {
        &self.tokens[id.0]
    }
}

impl IndexMut<TokenId> for TokenTree {
    fn index_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.tokens[id.0]
    }
}
