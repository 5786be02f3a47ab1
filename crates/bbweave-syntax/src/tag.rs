//! Tag head extraction: the name and attributes of a bracketed tag lexeme.

use crate::attrs::{Attrs, parse_attrs};
use crate::cursor::Cursor;

/// Name and attributes of an open tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagHead {
    /// Lower-cased tag name.
    pub name: String,
    pub attrs: Attrs,
}

/// Split an open tag lexeme (`[name attrs]`) into its head.
///
/// The name is the leading run of chars up to whitespace or `=`. Returns
/// `None` when there is no name (`[ b]`, `[=x]`) or the text is not bracketed.
pub fn parse_open_tag(raw: &str) -> Option<TagHead> {
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;

    let mut cur = Cursor::at(inner, 0);
    if cur.bump_while(|c| c != ']' && c != '=' && !c.is_whitespace()) == 0 {
        return None;
    }
    let name = inner[..cur.i].to_lowercase();

    let section = cur.rest().trim();
    let attrs = if section.is_empty() {
        Attrs::new()
    } else {
        parse_attrs(section)
    };

    Some(TagHead { name, attrs })
}

/// Lower-cased name of a close tag lexeme (`[/name]`).
pub fn parse_close_tag(raw: &str) -> Option<String> {
    let name = raw.strip_prefix("[/")?.strip_suffix(']')?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_lowercase())
}
