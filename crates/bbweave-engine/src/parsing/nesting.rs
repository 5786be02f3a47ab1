//! Moves block tags out of inline tags.
//!
//! A block tag found under an inline ancestor is lifted one level at a time:
//! the inline parent is split at the block, and the block plus a clone of
//! the parent holding the remaining children are inserted right after the
//! parent. When the block accepts the parent as a child, the block's own
//! content is wrapped in another clone of the parent so its styling carries
//! through:
//!
//! ```text
//! b("a" quote("q") "z")  →  b("a") quote(b("q")) b("z")
//! ```
//!
//! The lifted block is visited again from its new position, so a block
//! nested under several inline tags climbs until no inline tag is above it.

use crate::options::ParserOptions;
use crate::parsing::token::{Parent, TokenId, TokenKind, TokenTree};
use crate::registry::TagRegistry;

pub fn fix_nesting(tree: &mut TokenTree, registry: &TagRegistry, options: &ParserOptions) {
    let mut fixer = NestingFixer {
        tree,
        registry,
        options,
    };
    fixer.fix_list(Parent::Root, &mut Vec::new(), false);
}

struct NestingFixer<'a> {
    tree: &'a mut TokenTree,
    registry: &'a TagRegistry,
    options: &'a ParserOptions,
}

impl NestingFixer<'_> {
    /// `ancestors` holds the open tags above `list`, innermost last.
    fn fix_list(&mut self, list: Parent, ancestors: &mut Vec<TokenId>, inside_inline: bool) {
        let mut i = 0;
        while i < self.tree.children(list).len() {
            let id = self.tree.children(list)[i];
            i += 1;
            if self.tree[id].kind != TokenKind::Open {
                continue;
            }

            let inline = self.registry.is_inline(&self.tree[id].name);
            if inside_inline && !inline && self.lift(id, ancestors) {
                return;
            }

            ancestors.push(id);
            self.fix_list(Parent::Token(id), ancestors, inside_inline || inline);
            ancestors.pop();
        }
    }

    /// Split the innermost ancestor around `block` and splice the pieces
    /// into the ancestor's own parent list.
    fn lift(&mut self, block: TokenId, ancestors: &[TokenId]) -> bool {
        let Some((&parent, rest)) = ancestors.split_last() else {
            return false;
        };
        let grand = rest.last().map_or(Parent::Root, |&g| Parent::Token(g));

        let Some(parent_index) = self.tree.children(grand).iter().position(|&c| c == parent) else {
            return false;
        };
        let Some(offset) = self.tree[parent].children.iter().position(|&c| c == block) else {
            return false;
        };

        log::debug!(
            "lifting block {:?} out of inline {:?}",
            self.tree[block].raw,
            self.tree[parent].raw
        );

        let right = self.tree.split_at(parent, offset);
        self.tree[right].children.remove(0);

        let wrap = !self.options.fix_invalid_children
            || self
                .registry
                .allows_child(&self.tree[block].name, &self.tree[parent].name);
        if wrap {
            let inner = self.tree.clone_shallow(parent);
            self.tree[inner].children = std::mem::take(&mut self.tree[block].children);
            self.tree[block].children = vec![inner];
        }

        let siblings = self.tree.children_mut(grand);
        siblings.insert(parent_index + 1, right);
        siblings.insert(parent_index + 1, block);

        if let Some(&next) = self.tree[right].children.first()
            && self.tree[next].kind == TokenKind::Newline
        {
            self.tree[right].children.remove(0);
            self.tree.children_mut(grand).insert(parent_index + 2, next);
        }

        true
    }
}
