//! Unwraps tags left with nothing but whitespace.
//!
//! Runs bottom-up, so a tag whose only child was an empty tag is unwrapped
//! in the same pass. Unwrapping keeps the whitespace children in place of
//! the tag. A non-breaking space counts as content.

use crate::parsing::token::{Parent, TokenId, TokenKind, TokenTree};
use crate::registry::TagRegistry;

pub fn remove_empty(tree: &mut TokenTree, registry: &TagRegistry) {
    prune_list(tree, registry, Parent::Root);
}

fn prune_list(tree: &mut TokenTree, registry: &TagRegistry, list: Parent) {
    let mut i = tree.children(list).len();
    while i > 0 {
        i -= 1;
        let id = tree.children(list)[i];
        if !tree[id].is_open() {
            continue;
        }
        prune_list(tree, registry, Parent::Token(id));

        let Some(def) = registry.get(&tree[id].name) else {
            continue;
        };
        if def.is_self_closing || def.allows_empty || !is_blank(tree, id) {
            continue;
        }

        log::debug!("unwrapping empty tag {:?}", tree[id].raw);
        let children = std::mem::take(&mut tree[id].children);
        tree.children_mut(list).splice(i..=i, children);
    }
}

/// Whether every child of `id` is a line break or whitespace other than NBSP.
pub(crate) fn is_blank(tree: &TokenTree, id: TokenId) -> bool {
    tree[id].children.iter().all(|&child| {
        let token = &tree[child];
        match token.kind {
            TokenKind::Newline => true,
            TokenKind::Content => token
                .raw
                .chars()
                .all(|c| c.is_whitespace() && c != '\u{a0}'),
            TokenKind::Open | TokenKind::Close => false,
        }
    })
}
