use std::fmt::Write;

use crate::parsing::token::{Parent, TokenId, TokenKind, TokenTree};

/// Indented listing of every reachable token.
///
/// ```text
/// Open b "[b]" -> "[/b]"
///   Content "x"
/// Newline "\n"
/// ```
pub fn dump(tree: &TokenTree) -> String {
    let mut out = String::new();
    dump_list(tree, tree.roots(), 0, &mut out);
    out
}

fn dump_list(tree: &TokenTree, ids: &[TokenId], depth: usize, out: &mut String) {
    for &id in ids {
        let token = &tree[id];
        let indent = "  ".repeat(depth);
        let _ = match token.kind {
            TokenKind::Open => write!(out, "{indent}Open {} {:?}", token.name, token.raw),
            TokenKind::Close => write!(out, "{indent}Close {} {:?}", token.name, token.raw),
            TokenKind::Newline => write!(out, "{indent}Newline {:?}", token.raw),
            TokenKind::Content => write!(out, "{indent}Content {:?}", token.raw),
        };
        if !token.attrs.is_empty() {
            let attrs: Vec<String> = token
                .attrs
                .iter()
                .map(|(k, v)| format!("{k}={v:?}"))
                .collect();
            let _ = write!(out, " {{{}}}", attrs.join(" "));
        }
        if let Some(closing) = tree.closing(id) {
            let _ = write!(out, " -> {:?}", closing.raw);
        }
        out.push('\n');
        dump_list(tree, &token.children, depth + 1, out);
    }
}

/// One-line structure: `b("x" i("y")) NL "z"`.
///
/// Open tags show as `name(children)`, content as its quoted raw text and
/// newlines as `NL`.
pub fn outline(tree: &TokenTree) -> String {
    outline_list(tree, Parent::Root)
}

fn outline_list(tree: &TokenTree, parent: Parent) -> String {
    tree.children(parent)
        .iter()
        .map(|&id| {
            let token = &tree[id];
            match token.kind {
                TokenKind::Open => {
                    format!("{}({})", token.name, outline_list(tree, Parent::Token(id)))
                }
                TokenKind::Close => format!("/{}", token.name),
                TokenKind::Newline => "NL".to_string(),
                TokenKind::Content => format!("{:?}", token.raw),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::token::Token;
    use bbweave_syntax::Attrs;

    fn sample() -> TokenTree {
        let mut tree = TokenTree::new();
        let attrs: Attrs = [("defaultattr", "http://x")].into_iter().collect();
        let url = tree.append(Parent::Root, Token::open("url", "[url=http://x]", attrs));
        tree.append(Parent::Token(url), Token::content("link"));
        let close = tree.push(Token::close("url", "[/url]"));
        tree[url].closing = Some(close);
        tree.append(Parent::Root, Token::newline("\n"));
        tree
    }

    #[test]
    fn dump_lists_attrs_and_closing() {
        insta::assert_snapshot!(dump(&sample()), @r#"
        Open url "[url=http://x]" {defaultattr="http://x"} -> "[/url]"
          Content "link"
        Newline "\n"
        "#);
    }

    #[test]
    fn outline_is_compact() {
        assert_eq!(outline(&sample()), r#"url("link") NL"#);
    }
}
