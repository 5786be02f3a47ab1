use crate::parsing::prune::is_blank;
use crate::parsing::token::{TokenId, TokenKind, TokenTree};
use crate::registry::TagRegistry;

/// Validates structural invariants of a built tree.
///
/// Asserts that:
/// - Content and newline tokens have no children
/// - No close token sits in a child list
/// - Every open tag in the tree is registered
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(tree: &TokenTree, registry: &TagRegistry) {
    for id in tree.walk() {
        let token = &tree[id];
        match token.kind {
            TokenKind::Content | TokenKind::Newline => assert!(
                token.children.is_empty(),
                "leaf token {:?} has {} children",
                token.raw,
                token.children.len()
            ),
            TokenKind::Close => panic!("close token {:?} left in the tree", token.raw),
            TokenKind::Open => assert!(
                registry.contains(&token.name),
                "unregistered tag {:?} left open",
                token.name
            ),
        }
    }
}

/// Validates the invariants the repair passes establish.
///
/// Asserts that:
/// - No block tag has an inline ancestor
/// - No tag that disallows emptiness contains only whitespace
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check_repaired(tree: &TokenTree, registry: &TagRegistry) {
    check(tree, registry);
    for &root in tree.roots() {
        check_nesting(tree, registry, root, false);
    }
    for id in tree.walk() {
        let token = &tree[id];
        let Some(def) = registry.get(&token.name) else {
            continue;
        };
        if token.kind != TokenKind::Open || def.allows_empty || def.is_self_closing {
            continue;
        }
        assert!(!is_blank(tree, id), "empty tag {:?} survived pruning", token.raw);
    }
}

fn check_nesting(tree: &TokenTree, registry: &TagRegistry, id: TokenId, inside_inline: bool) {
    let token = &tree[id];
    if token.kind != TokenKind::Open {
        return;
    }
    let inline = registry.is_inline(&token.name);
    assert!(
        !(inside_inline && !inline),
        "block tag {:?} nested inside an inline tag",
        token.raw
    );
    for &child in &token.children {
        check_nesting(tree, registry, child, inside_inline || inline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use crate::parsing::builder::build;
    use crate::parsing::tokenizer::tokenize;

    fn unpruned(text: &str, registry: &TagRegistry) -> TokenTree {
        build(tokenize(text, registry), registry, &ParserOptions::default()).unwrap()
    }

    #[test]
    #[should_panic(expected = "survived pruning")]
    fn whitespace_only_tag_is_reported() {
        let registry = TagRegistry::with_defaults();
        check_repaired(&unpruned("[b] \n[/b]", &registry), &registry);
    }

    #[test]
    fn non_breaking_space_counts_as_content() {
        let registry = TagRegistry::with_defaults();
        check_repaired(&unpruned("[b]\u{a0}[/b][td] [/td]", &registry), &registry);
    }
}
