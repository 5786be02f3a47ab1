//! Removes structural line breaks.
//!
//! Block tags are conventionally written on their own lines:
//!
//! ```text
//! [quote]
//! text
//! [/quote]
//! ```
//!
//! Those breaks exist only because of the convention, and the BBCode
//! serializer writes them back from the same policy, so they are dropped
//! from the tree. A newline is structural when it sits:
//!
//! - first in a tag that breaks at its start
//! - last in a tag that breaks at its end (at most one per list)
//! - right after a tag that breaks after itself
//! - right before a tag that breaks before itself
//!
//! Each list is walked backwards. A newline removed as a break-before
//! blocks the same treatment for the newline right before it, so `\n\n[quote]`
//! loses one break, not two.
//!
//! In preserve mode only breaks right after a block tag are removed.

use crate::options::{ParserOptions, tag_break};
use crate::parsing::token::{Parent, TokenId, TokenKind, TokenTree};
use crate::registry::{TagDefinition, TagRegistry};

pub fn normalize_newlines(
    tree: &mut TokenTree,
    registry: &TagRegistry,
    options: &ParserOptions,
    preserve_all: bool,
) {
    normalize_list(tree, registry, options, Parent::Root, preserve_all);
}

fn normalize_list(
    tree: &mut TokenTree,
    registry: &TagRegistry,
    options: &ParserOptions,
    list: Parent,
    preserve_all: bool,
) {
    let parent_def = match list {
        Parent::Root => None,
        Parent::Token(id) => registry.get(&tree[id].name),
    };
    let mut removed_break_end = false;
    let mut removed_break_before = false;

    let mut i = tree.children(list).len();
    while i > 0 {
        i -= 1;
        let children = tree.children(list);
        let id = children[i];
        let kind = tree[id].kind;
        if kind != TokenKind::Newline {
            removed_break_before = false;
            if kind == TokenKind::Open {
                normalize_list(tree, registry, options, Parent::Token(id), preserve_all);
            }
            continue;
        }

        let left = i.checked_sub(1).map(|j| children[j]);
        let right = children.get(i + 1).copied();
        let left_def = open_def(tree, registry, left);
        let right_def = open_def(tree, registry, right);
        let mut remove = false;

        if !preserve_all
            && let Some(def) = parent_def
            && !def.is_self_closing
        {
            if left.is_none() {
                remove = tag_break(!def.is_inline, options.break_start_block, def.break_start);
            } else if !removed_break_end && right.is_none() {
                remove = tag_break(!def.is_inline, options.break_end_block, def.break_end);
                removed_break_end = remove;
            }
        }

        if let Some(def) = left_def {
            let breaks_after = if preserve_all {
                !def.is_inline
            } else {
                tag_break(!def.is_inline, options.break_after_block, def.break_after)
            };
            remove |= breaks_after;
        }

        let mut break_before = false;
        if !preserve_all
            && !removed_break_before
            && let Some(def) = right_def
        {
            break_before = tag_break(!def.is_inline, options.break_before_block, def.break_before);
            remove |= break_before;
        }

        if remove {
            tree.children_mut(list).remove(i);
        }
        removed_break_before = break_before;
    }
}

fn open_def<'r>(
    tree: &TokenTree,
    registry: &'r TagRegistry,
    neighbour: Option<TokenId>,
) -> Option<&'r TagDefinition> {
    neighbour
        .filter(|&n| tree[n].is_open())
        .and_then(|n| registry.get(&tree[n].name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::builder::build;
    use crate::parsing::snapshot::outline;
    use crate::parsing::tokenizer::tokenize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn normalized(text: &str, options: &ParserOptions, preserve_all: bool) -> String {
        let registry = TagRegistry::with_defaults();
        let mut tree = build(tokenize(text, &registry), &registry, options).unwrap();
        normalize_newlines(&mut tree, &registry, options, preserve_all);
        outline(&tree)
    }

    fn all_block_breaks() -> ParserOptions {
        ParserOptions {
            break_before_block: true,
            break_start_block: true,
            break_end_block: true,
            break_after_block: true,
            ..ParserOptions::default()
        }
    }

    #[rstest]
    #[case("[quote]x[/quote]\ny", r#"quote("x") "y""#)]
    #[case("[b]x[/b]\ny", r#"b("x") NL "y""#)]
    #[case("[quote]\nx\n[/quote]", r#"quote(NL "x" NL)"#)]
    #[case("a\n\nb", r#""a" NL NL "b""#)]
    fn default_policy(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(normalized(text, &ParserOptions::default(), false), expected);
    }

    #[test]
    fn start_and_end_breaks_removed_when_enabled() {
        assert_eq!(
            normalized("[quote]\nx\n[/quote]", &all_block_breaks(), false),
            r#"quote("x")"#
        );
    }

    #[test]
    fn list_breaks_removed() {
        assert_eq!(
            normalized("[list]\n[*]a\n[*]b\n[/list]\n", &ParserOptions::default(), false),
            r#"list(*("a") *("b"))"#
        );
    }

    #[test]
    fn only_one_break_before_removed() {
        assert_eq!(
            normalized("a\n\n[quote]x[/quote]", &all_block_breaks(), false),
            r#""a" NL quote("x")"#
        );
    }

    #[test]
    fn break_after_removal_does_not_shield_earlier_break() {
        let options = ParserOptions {
            break_before_block: true,
            ..ParserOptions::default()
        };
        assert_eq!(
            normalized("\n[quote]x[/quote]\n[b]y[/b]", &options, false),
            r#"quote("x") b("y")"#
        );
    }

    #[test]
    fn break_before_guard_ends_at_a_tag() {
        let options = ParserOptions {
            break_before_block: true,
            ..ParserOptions::default()
        };
        assert_eq!(
            normalized("\n[code]c[/code]\n[quote]x[/quote]", &options, false),
            r#"code("c") quote("x")"#
        );
    }

    #[test]
    fn only_one_end_break_removed() {
        assert_eq!(
            normalized("[quote]x\n\n[/quote]", &all_block_breaks(), false),
            r#"quote("x" NL)"#
        );
    }

    #[test]
    fn tag_can_opt_out_of_block_policy() {
        let mut registry = TagRegistry::with_defaults();
        registry.update("quote", |def| def.break_after = Some(false));
        let options = ParserOptions::default();
        let mut tree = build(tokenize("[quote]x[/quote]\ny", &registry), &registry, &options).unwrap();
        normalize_newlines(&mut tree, &registry, &options, false);
        assert_eq!(outline(&tree), r#"quote("x") NL "y""#);
    }

    #[test]
    fn preserve_mode_only_drops_breaks_after_blocks() {
        let options = all_block_breaks();
        assert_eq!(
            normalized("[quote]\nx\n[/quote]\ny\n[b]z[/b]\n", &options, true),
            r#"quote(NL "x" NL) "y" NL b("z") NL"#
        );
    }

    #[test]
    fn newline_after_self_closing_block_removed() {
        assert_eq!(
            normalized("[hr]\nx", &ParserOptions::default(), false),
            r#"hr() "x""#
        );
    }
}
