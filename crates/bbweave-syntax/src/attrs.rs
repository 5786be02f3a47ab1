//! Attribute scanning for open tags.
//!
//! An open tag's attribute section comes in two shapes:
//!
//! - `[url=http://example.com]` - a single default value, stored under
//!   [`DEFAULT_ATTR`]
//! - `[quote author="a b" date=123]` - `name=value` pairs, where a value is
//!   either quoted (`"` or `'`, with `\` escaping the quote) or a bare run
//!   that stops where the next `name=` begins
//!
//! Both can be mixed: `[img=100x80 alt="x"]` yields `defaultattr`, then `alt`.
//! Anything that does not fit the grammar is skipped; scanning never fails.

use crate::cursor::Cursor;

/// Key holding the `[tag=value]` shorthand value.
pub const DEFAULT_ATTR: &str = "defaultattr";

/// Insertion-ordered attribute map.
///
/// Serialization emits attributes in the order they were written, so this is
/// a small vector rather than a hash map. Tags rarely carry more than a
/// handful of attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `[tag=value]` shorthand value, if any.
    pub fn default_attr(&self) -> Option<&str> {
        self.get(DEFAULT_ATTR)
    }

    /// Insert a value, replacing an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Attrs::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// Parse the (already trimmed) attribute section of an open tag.
pub fn parse_attrs(section: &str) -> Attrs {
    let mut attrs = Attrs::new();

    if let Some(rest) = section.strip_prefix('=')
        && !rest.contains('=')
    {
        attrs.insert(DEFAULT_ATTR, strip_quotes(rest));
        return attrs;
    }

    let prefixed;
    let section = if section.starts_with('=') {
        prefixed = format!("{DEFAULT_ATTR}{section}");
        prefixed.as_str()
    } else {
        section
    };

    let mut cur = Cursor::at(section, 0);
    while !cur.eof() {
        let start = cur.i;
        if cur.bump_while(|c| !c.is_whitespace() && c != '=') == 0 {
            cur.bump();
            continue;
        }
        let name = &section[start..cur.i];
        if cur.peek() != Some('=') {
            continue;
        }
        cur.bump();
        if let Some(value) = scan_value(&mut cur) {
            attrs.insert(name.to_lowercase(), value);
        }
    }

    attrs
}

/// Remove backslash escapes, then one pair of matching surrounding quotes.
pub fn strip_quotes(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && !is_line_terminator(next)
        {
            unescaped.push(next);
            chars.next();
        } else {
            unescaped.push(c);
        }
    }

    let quoted = unescaped.len() >= 2
        && (unescaped.starts_with('"') && unescaped.ends_with('"')
            || unescaped.starts_with('\'') && unescaped.ends_with('\''))
        && !unescaped.contains(is_line_terminator);
    if quoted {
        unescaped[1..unescaped.len() - 1].to_string()
    } else {
        unescaped
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn scan_value(cur: &mut Cursor<'_>) -> Option<String> {
    if let Some(quote @ ('"' | '\'')) = cur.peek()
        && let Some(close) = quoted_end(cur.rest(), quote)
    {
        let value = strip_quotes(&cur.rest()[1..close]);
        cur.i += close + 1;
        return Some(value);
    }
    scan_bare(cur)
}

/// Byte offset of the quote closing a value that starts with `quote`.
///
/// Escaped quotes are skipped. Without a plain closing quote the last escaped
/// one closes the value instead, leaving its backslash inside.
fn quoted_end(s: &str, quote: char) -> Option<usize> {
    let mut cur = Cursor::at(s, quote.len_utf8());
    let mut last_escaped = None;
    while let Some(c) = cur.peek() {
        if c == '\\' && cur.peek_second() == Some(quote) {
            cur.bump();
            last_escaped = Some(cur.i);
            cur.bump();
        } else if c == quote {
            return Some(cur.i);
        } else {
            cur.bump();
        }
    }
    last_escaped
}

/// A bare value runs up to and including the char that precedes the next
/// ` name=`, or to the end of the line.
fn scan_bare(cur: &mut Cursor<'_>) -> Option<String> {
    let s = cur.rest();
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if is_line_terminator(c) {
            break;
        }
        end = i + c.len_utf8();
        if starts_next_attr(&s[end..]) {
            break;
        }
    }
    if end == 0 {
        return None;
    }
    cur.i += end;
    Some(s[..end].to_string())
}

fn starts_next_attr(s: &str) -> bool {
    let mut chars = s.chars();
    if !chars.next().is_some_and(char::is_whitespace) {
        return false;
    }
    chars
        .take_while(|c| !c.is_whitespace())
        .skip(1)
        .any(|c| c == '=')
}
