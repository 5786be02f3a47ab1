//! The standard BBCode tag set.
//!
//! Text styling, fonts, lists, tables, links, media, quotes, code,
//! alignment and text direction, each with its HTML rendering, its reverse
//! formatter and the markup elements it stands for.

use bbweave_syntax::Attrs;

use crate::options::QuoteType;
use crate::parsing::token::Token;
use crate::render::escape::{escape_entities, escape_uri_scheme, normalise_colour, strip_markup};

use super::{ElementMatcher, HtmlElement, TagDefinition, TagRegistry, ValueClause};

const LIST_ITEM_CLOSERS: &[&str] = &["/ul", "/ol", "/list", "*", "li"];

const BOLD_WEIGHTS: &[&str] = &[
    "bold", "bolder", "401", "500", "600", "700", "800", "900",
];

/// Register every standard tag, replacing existing entries of the same name.
pub fn register(registry: &mut TagRegistry) {
    register_text_styles(registry);
    register_fonts(registry);
    register_lists(registry);
    register_tables(registry);
    register_media(registry);
    register_blocks(registry);
}

fn simple(element: &str, tag: &str) -> TagDefinition {
    TagDefinition::new()
        .html_template(format!("<{element}>{{0}}</{element}>"))
        .format_template(format!("[{tag}]{{0}}[/{tag}]"))
}

fn register_text_styles(registry: &mut TagRegistry) {
    registry.set(
        "b",
        simple("strong", "b").matcher(
            ElementMatcher::new()
                .tag("b")
                .tag("strong")
                .style("font-weight", ValueClause::one_of(BOLD_WEIGHTS.iter().copied())),
        ),
    );
    registry.set(
        "i",
        simple("em", "i").matcher(
            ElementMatcher::new()
                .tag("i")
                .tag("em")
                .style("font-style", ValueClause::one_of(["italic", "oblique"])),
        ),
    );
    registry.set(
        "u",
        simple("u", "u").matcher(
            ElementMatcher::new()
                .tag("u")
                .style("text-decoration", ValueClause::one_of(["underline"])),
        ),
    );
    registry.set(
        "s",
        simple("s", "s").matcher(
            ElementMatcher::new()
                .tag("s")
                .tag("strike")
                .style("text-decoration", ValueClause::one_of(["line-through"])),
        ),
    );
    registry.set("sub", simple("sub", "sub").matcher(ElementMatcher::new().tag("sub")));
    registry.set("sup", simple("sup", "sup").matcher(ElementMatcher::new().tag("sup")));
}

fn element_value<'a>(element: &'a HtmlElement, attr: &str, style: &str) -> &'a str {
    element
        .attrs
        .get(attr)
        .or_else(|| element.styles.get(style))
        .unwrap_or_default()
}

fn register_fonts(registry: &mut TagRegistry) {
    registry.set(
        "font",
        TagDefinition::new()
            .quote(QuoteType::Never)
            .html_template("<font face=\"{defaultattr}\">{0}</font>")
            .format_fn(|el, content| {
                format!("[font={}]{content}[/font]", element_value(el, "face", "font-family"))
            })
            .matcher(
                ElementMatcher::new()
                    .tag_with("font", [("face", ValueClause::Any)])
                    .style("font-family", ValueClause::Any),
            ),
    );
    registry.set(
        "size",
        TagDefinition::new()
            .html_template("<font size=\"{defaultattr}\">{!0}</font>")
            .format_fn(|el, content| {
                format!("[size={}]{content}[/size]", element_value(el, "size", "font-size"))
            })
            .matcher(
                ElementMatcher::new()
                    .tag_with("font", [("size", ValueClause::Any)])
                    .style("font-size", ValueClause::Any),
            ),
    );
    registry.set(
        "color",
        TagDefinition::new()
            .quote(QuoteType::Never)
            .html_fn(color_html)
            .format_fn(|el, content| {
                let colour = normalise_colour(element_value(el, "color", "color"));
                format!("[color={colour}]{content}[/color]")
            })
            .matcher(
                ElementMatcher::new()
                    .tag_with("font", [("color", ValueClause::Any)])
                    .style("color", ValueClause::Any),
            ),
    );
}

fn color_html(_: &Token, attrs: &Attrs, content: &str) -> String {
    let colour = normalise_colour(attrs.default_attr().unwrap_or_default());
    format!("<font color=\"{}\">{content}</font>", escape_entities(&colour))
}

fn list(element: &str, tag: &str) -> TagDefinition {
    simple(element, tag)
        .block()
        .break_start(true)
        .skip_last_line_break()
}

fn register_lists(registry: &mut TagRegistry) {
    registry.set("ul", list("ul", "ul").matcher(ElementMatcher::new().tag("ul")));
    registry.set("list", list("ul", "list"));
    registry.set("ol", list("ol", "ol").matcher(ElementMatcher::new().tag("ol")));
    registry.set(
        "li",
        simple("li", "li")
            .block()
            .closed_by(LIST_ITEM_CLOSERS)
            .matcher(ElementMatcher::new().tag("li")),
    );
    registry.set(
        "*",
        TagDefinition::new()
            .block()
            .closed_by(LIST_ITEM_CLOSERS)
            .html_template("<li>{0}</li>")
            .format_template("[*]{0}"),
    );
}

fn register_tables(registry: &mut TagRegistry) {
    registry.set(
        "table",
        simple("table", "table")
            .block()
            .html_inline(true)
            .skip_last_line_break()
            .matcher(ElementMatcher::new().tag("table")),
    );
    registry.set(
        "tr",
        simple("tr", "tr")
            .block()
            .skip_last_line_break()
            .matcher(ElementMatcher::new().tag("tr")),
    );
    for cell in ["th", "td"] {
        registry.set(
            cell,
            simple(cell, cell)
                .block()
                .allows_empty()
                .matcher(ElementMatcher::new().tag(cell)),
        );
    }
}

fn register_media(registry: &mut TagRegistry) {
    registry.set(
        "emoticon",
        TagDefinition::new()
            .allows_empty()
            .html_template("{0}")
            .format_fn(|el, _| el.attrs.get("alt").unwrap_or_default().to_string())
            .matcher(
                ElementMatcher::new().tag_with("img", [("data-sceditor-emoticon", ValueClause::Any)]),
            ),
    );
    registry.set(
        "hr",
        TagDefinition::new()
            .block()
            .self_closing()
            .allows_empty()
            .html_template("<hr />")
            .format_template("[hr]{0}")
            .matcher(ElementMatcher::new().tag("hr")),
    );
    registry.set(
        "img",
        TagDefinition::new()
            .allows_empty()
            .allowed_children(&["#"])
            .quote(QuoteType::Never)
            .html_fn(img_html)
            .format_fn(img_format)
            .matcher(ElementMatcher::new().tag_with("img", [("src", ValueClause::Any)])),
    );
    registry.set(
        "url",
        TagDefinition::new()
            .allows_empty()
            .quote(QuoteType::Never)
            .html_fn(url_html)
            .format_fn(|el, content| {
                let href = el.attrs.get("href").unwrap_or_default();
                match href.strip_prefix("mailto:") {
                    Some(address) => format!("[email={address}]{content}[/email]"),
                    None => format!("[url={href}]{content}[/url]"),
                }
            })
            .matcher(ElementMatcher::new().tag_with("a", [("href", ValueClause::Any)])),
    );
    registry.set(
        "email",
        TagDefinition::new()
            .quote(QuoteType::Never)
            .html_fn(email_html),
    );
    registry.set(
        "youtube",
        TagDefinition::new()
            .allows_empty()
            .html_fn(youtube_html)
            .format_fn(|el, _| {
                let id = el.attrs.get("data-youtube-id").unwrap_or_default();
                format!("[youtube]{id}[/youtube]")
            })
            .matcher(
                ElementMatcher::new().tag_with("iframe", [("data-youtube-id", ValueClause::Any)]),
            ),
    );
}

/// `[img=WxH]`, `[img width=W height=H]` or plain `[img]`.
fn img_html(_: &Token, attrs: &Attrs, content: &str) -> String {
    let mut width = attrs.get("width");
    let mut height = attrs.get("height");
    if let Some(size) = attrs.default_attr().filter(|s| !s.is_empty()) {
        let parts: Vec<&str> = size.split(['x', 'X']).collect();
        width = Some(parts[0]);
        height = Some(if parts.len() == 2 { parts[1] } else { parts[0] });
    }

    let mut out = String::from("<img");
    if let Some(w) = width {
        out.push_str(&format!(" width=\"{}\"", escape_entities(w)));
    }
    if let Some(h) = height {
        out.push_str(&format!(" height=\"{}\"", escape_entities(h)));
    }
    out.push_str(&format!(
        " src=\"{}\" />",
        escape_uri_scheme(&strip_markup(content))
    ));
    out
}

fn img_format(el: &HtmlElement, _: &str) -> String {
    let src = el.attrs.get("src").unwrap_or_default();
    match (el.attrs.get("width"), el.attrs.get("height")) {
        (Some(w), Some(h)) => format!("[img={w}x{h}]{src}[/img]"),
        (Some(w), None) => format!("[img width={w}]{src}[/img]"),
        (None, Some(h)) => format!("[img height={h}]{src}[/img]"),
        (None, None) => format!("[img]{src}[/img]"),
    }
}

fn url_html(_: &Token, attrs: &Attrs, content: &str) -> String {
    let href = match attrs.default_attr().filter(|s| !s.is_empty()) {
        Some(url) => escape_entities(url),
        None => strip_markup(content),
    };
    format!("<a href=\"{}\">{content}</a>", escape_uri_scheme(&href))
}

fn email_html(_: &Token, attrs: &Attrs, content: &str) -> String {
    let address = match attrs.default_attr().filter(|s| !s.is_empty()) {
        Some(address) => escape_entities(address),
        None => strip_markup(content),
    };
    format!("<a href=\"mailto:{address}\">{content}</a>")
}

fn youtube_html(_: &Token, _: &Attrs, content: &str) -> String {
    let id: String = strip_markup(content)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect();
    format!(
        "<iframe width=\"560\" height=\"315\" frameborder=\"0\" \
         src=\"https://www.youtube-nocookie.com/embed/{id}?wmode=opaque\" \
         data-youtube-id=\"{id}\" allowfullscreen></iframe>"
    )
}

fn quote_html(_: &Token, attrs: &Attrs, content: &str) -> String {
    match attrs.default_attr().filter(|s| !s.is_empty()) {
        Some(author) => format!(
            "<blockquote><cite>{}</cite>{content}</blockquote>",
            escape_entities(author)
        ),
        None => format!("<blockquote>{content}</blockquote>"),
    }
}

fn aligned(align: &str) -> TagDefinition {
    let vendor = [
        align.to_string(),
        format!("-webkit-{align}"),
        format!("-moz-{align}"),
        format!("-khtml-{align}"),
    ];
    TagDefinition::new()
        .block()
        .allows_empty()
        .html_template(format!("<div align=\"{align}\">{{0}}</div>"))
        .format_template(format!("[{align}]{{0}}[/{align}]"))
        .matcher(ElementMatcher::new().style("text-align", ValueClause::one_of(vendor)))
}

fn direction(dir: &str) -> TagDefinition {
    TagDefinition::new()
        .block()
        .html_template(format!("<div style=\"direction: {dir}\">{{0}}</div>"))
        .format_template(format!("[{dir}]{{0}}[/{dir}]"))
        .matcher(ElementMatcher::new().style("direction", ValueClause::one_of([dir])))
}

fn register_blocks(registry: &mut TagRegistry) {
    registry.set(
        "quote",
        TagDefinition::new()
            .block()
            .quote(QuoteType::Never)
            .html_fn(quote_html)
            .format_template("[quote]{0}[/quote]")
            .matcher(ElementMatcher::new().tag("blockquote")),
    );
    registry.set(
        "code",
        simple("code", "code")
            .block()
            .allowed_children(&["#", "#newline"])
            .matcher(ElementMatcher::new().tag("code")),
    );
    for align in ["left", "center", "right", "justify"] {
        registry.set(align, aligned(align));
    }
    for dir in ["rtl", "ltr"] {
        registry.set(dir, direction(dir));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> TagRegistry {
        TagRegistry::with_defaults()
    }

    #[test]
    fn registers_standard_names() {
        let names: Vec<_> = registry().names().map(str::to_string).collect();
        for expected in [
            "*", "b", "center", "code", "color", "email", "emoticon", "font", "hr", "i", "img",
            "justify", "left", "li", "list", "ltr", "ol", "quote", "right", "rtl", "s", "size",
            "sub", "sup", "table", "td", "th", "tr", "u", "ul", "url", "youtube",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn classification() {
        let reg = registry();
        assert!(reg.is_inline("b"));
        assert!(!reg.is_inline("quote"));
        assert!(!reg.is_inline("li"));
        assert!(reg.get("hr").unwrap().is_self_closing);
        assert!(reg.get("li").unwrap().is_closed_by("/list"));
        assert!(reg.get("*").unwrap().is_closed_by("*"));
        assert!(reg.get("table").unwrap().is_html_inline());
        assert!(!reg.allows_child("code", "b"));
        assert!(reg.allows_child("code", "#newline"));
    }

    #[test]
    fn img_sizes() {
        let token = Token::content("");
        let attrs: Attrs = [("defaultattr", "100x80")].into_iter().collect();
        assert_eq!(
            img_html(&token, &attrs, "a.png"),
            "<img width=\"100\" height=\"80\" src=\"a.png\" />"
        );

        let attrs: Attrs = [("defaultattr", "50")].into_iter().collect();
        assert_eq!(
            img_html(&token, &attrs, "a.png"),
            "<img width=\"50\" height=\"50\" src=\"a.png\" />"
        );

        let attrs: Attrs = [("width", "\"x")].into_iter().collect();
        assert_eq!(
            img_html(&token, &attrs, "a.png"),
            "<img width=\"&quot;x\" src=\"a.png\" />"
        );
    }

    #[test]
    fn url_prefers_default_attr() {
        let token = Token::content("");
        let attrs: Attrs = [("defaultattr", "http://a.b/?x=1&y=2")].into_iter().collect();
        assert_eq!(
            url_html(&token, &attrs, "text"),
            "<a href=\"http://a.b/?x=1&amp;y=2\">text</a>"
        );
        assert_eq!(
            url_html(&token, &Attrs::new(), "javascript:alert(1)"),
            "<a href=\"./javascript:alert(1)\">javascript:alert(1)</a>"
        );
    }

    #[test]
    fn youtube_id_is_sanitised() {
        let html = youtube_html(&Token::content(""), &Attrs::new(), "dQw4w9WgXcQ&quot;x");
        assert!(html.contains("embed/dQw4w9WgXcQquotx?"));
    }

    #[test]
    fn reverse_formatters() {
        let reg = registry();
        let link = HtmlElement::new("a").with_attr("href", "mailto:a@b.c");
        let format = reg.get("url").and_then(|d| d.format.as_ref()).unwrap();
        assert_eq!(format.render(&link, "me"), "[email=a@b.c]me[/email]");

        let bold = HtmlElement::new("span").with_style("font-weight", "700");
        assert_eq!(reg.match_element(&bold, false), vec!["b"]);

        let image = HtmlElement::new("img").with_attr("src", "a.png").with_attr("width", "5");
        let format = reg.get("img").and_then(|d| d.format.as_ref()).unwrap();
        assert_eq!(format.render(&image, ""), "[img width=5]a.png[/img]");
    }
}
