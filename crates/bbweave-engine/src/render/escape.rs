//! Escaping and value normalisation for emitted markup.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Entity-escape text for use in element content or a quoted attribute.
///
/// Two spaces become `&nbsp; ` so runs of spaces survive, and every line
/// ending becomes `<br />`.
pub fn escape_entities(text: &str) -> String {
    html_escape::encode_quoted_attribute(text)
        .replace('`', "&#96;")
        .replace("  ", "&nbsp; ")
        .replace("\r\n", "<br />")
        .replace(['\r', '\n'], "<br />")
}

fn valid_scheme() -> &'static Regex {
    static VALID_SCHEME: OnceLock<Regex> = OnceLock::new();
    VALID_SCHEME.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?:https?|s?ftp|mailto|spotify|skype|ssh|teamspeak|tel):|//|data:image/(?:png|bmp|gif|p?jpe?g);)",
        )
        .expect("Invalid scheme regex")
    })
}

/// Neutralise a URL whose scheme is not on the allow list.
///
/// A URL has a scheme when a `:` appears before any `/`. Allowed schemes and
/// scheme-less URLs pass through; anything else is turned into a relative
/// path so `javascript:` and friends never reach an `href` or `src`.
pub fn escape_uri_scheme(url: &str) -> String {
    let has_scheme = url
        .find(':')
        .is_some_and(|colon| !url[..colon].contains('/'));
    if !has_scheme || valid_scheme().is_match(url) {
        url.to_string()
    } else {
        format!("./{url}")
    }
}

fn rgb_colour() -> &'static Regex {
    static RGB: OnceLock<Regex> = OnceLock::new();
    RGB.get_or_init(|| {
        Regex::new(r"(?i)rgb\((\d{1,3}),\s*(\d{1,3}),\s*(\d{1,3})\)").expect("Invalid rgb regex")
    })
}

fn short_hex_colour() -> &'static Regex {
    static SHORT_HEX: OnceLock<Regex> = OnceLock::new();
    SHORT_HEX.get_or_init(|| {
        Regex::new(r"(?i)#([0-9a-f])([0-9a-f])([0-9a-f])\s*$").expect("Invalid hex regex")
    })
}

/// Normalise `rgb(r, g, b)` and `#abc` to six-digit hex; anything else is
/// returned unchanged. An empty colour is black.
pub fn normalise_colour(colour: &str) -> String {
    let colour = if colour.is_empty() { "#000" } else { colour };

    if let Some(caps) = rgb_colour().captures(colour) {
        let hex = |i: usize| {
            let n: u32 = caps[i].parse().unwrap_or(0);
            format!("{:02x}", n.min(255))
        };
        return format!("#{}{}{}", hex(1), hex(2), hex(3));
    }

    if let Some(caps) = short_hex_colour().captures(colour) {
        return format!(
            "#{0}{0}{1}{1}{2}{2}",
            &caps[1], &caps[2], &caps[3]
        );
    }

    colour.to_string()
}

fn markup_tag() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid markup regex"))
}

/// Drop element tags from rendered content, keeping the text between them.
pub fn strip_markup(html: &str) -> String {
    markup_tag().replace_all(html, "").into_owned()
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("Invalid placeholder regex"))
}

/// Fill `{name}` placeholders from `lookup`.
///
/// Values are entity-escaped unless the name is prefixed with `!`. `{0}`
/// is always raw since it holds already-rendered content. Placeholders
/// `lookup` cannot resolve are left as written.
pub fn format_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures<'_>| {
            let group = &caps[1];
            let (name, escape) = match group.strip_prefix('!') {
                Some(raw) => (raw, false),
                None => (group, group != "0"),
            };
            match lookup(name) {
                Some(value) if escape => escape_entities(value),
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
