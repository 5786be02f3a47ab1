use bbweave_engine::parsing::snapshot;
use bbweave_engine::{BbcodeParser, ParserOptions, QuoteType, TagDefinition, TagRegistry};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn to_bbcode(text: &str) -> String {
    let registry = TagRegistry::with_defaults();
    BbcodeParser::new(&registry).to_bbcode(text, false).unwrap()
}

fn to_html(text: &str) -> String {
    let registry = TagRegistry::with_defaults();
    BbcodeParser::new(&registry).to_html(text, false).unwrap()
}

#[test]
fn fixture_forum_post() {
    assert_fixture("forum_post");
}

#[test]
fn fixture_misnested() {
    assert_fixture("misnested");
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn assert_fixture(name: &str) {
    let input = read_fixture(&format!("{name}.bbcode"));
    let registry = TagRegistry::with_defaults();
    let parser = BbcodeParser::new(&registry);

    let tree = parser.parse(&input, false).unwrap();
    snapshot::check_repaired(&tree, &registry);

    assert_eq!(parser.render_html(&tree), read_fixture(&format!("{name}.html")));
    assert_eq!(parser.render_bbcode(&tree), read_fixture(&format!("{name}.canonical")));
}

#[test]
fn unknown_tags_pass_through() {
    assert_eq!(to_bbcode("[zzz]x[/zzz]"), "[zzz]x[/zzz]");
    assert_eq!(to_html("[zzz]x[/zzz]"), "<div>[zzz]x[/zzz]</div>\n");
    assert_eq!(
        to_html("[zzz onclick=\"x\"]y[/zzz]"),
        "<div>[zzz onclick=&quot;x&quot;]y[/zzz]</div>\n"
    );
}

#[test]
fn nesting_repair() {
    let registry = TagRegistry::with_defaults();
    let options = ParserOptions {
        break_after_block: false,
        ..ParserOptions::default()
    };
    let parser = BbcodeParser::with_options(&registry, options);
    assert_eq!(
        parser.to_bbcode("[b]test[code]test[/code]test[/b]", false).unwrap(),
        "[b]test[/b][code]test[/code][b]test[/b]"
    );
}

#[test]
fn list_items_close_before_next_item() {
    assert_eq!(
        to_bbcode("[list][*]a[*]b[/list]"),
        "[list]\n[*]a[/*]\n[*]b[/*]\n[/list]\n"
    );
}

#[test]
fn list_tree_shape() {
    let registry = TagRegistry::with_defaults();
    let tree = BbcodeParser::new(&registry).parse("[list][*]a[*]b[/list]", false).unwrap();
    insta::assert_snapshot!(snapshot::dump(&tree), @r#"
    Open list "[list]" -> "[/list]"
      Open * "[*]"
        Content "a"
      Open * "[*]"
        Content "b"
    "#);
}

#[rstest]
#[case("[b][color]test[/b][/color]", "[b][color]test[/color][/b]")]
#[case("[b][i]x[/b]y[/i]", "[b][i]x[/i][/b][i]y[/i]")]
#[case("[hr]test", "[hr]\ntest")]
#[case("[quote][center]test[/center][/quote]", "[quote][center]test[/center]\n[/quote]\n")]
fn repairs(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(to_bbcode(text), expected);
}

#[test]
fn bold_in_single_line_wrapper() {
    assert_eq!(to_html("[b]test[/b]"), "<div><strong>test</strong></div>\n");
}

#[rstest]
#[case(QuoteType::Auto, "[size=big]x[/size]", "[size=big]x[/size]")]
#[case(QuoteType::Auto, "[size=very big]x[/size]", "[size=\"very big\"]x[/size]")]
#[case(QuoteType::Auto, "[size=\"a=b\"]x[/size]", "[size=\"a=b\"]x[/size]")]
#[case(QuoteType::Always, "[size=big]x[/size]", "[size=\"big\"]x[/size]")]
#[case(QuoteType::Never, "[size=very big]x[/size]", "[size=very big]x[/size]")]
fn quoting_policies(#[case] quote_type: QuoteType, #[case] text: &str, #[case] expected: &str) {
    let registry = TagRegistry::with_defaults();
    let options = ParserOptions {
        quote_type,
        ..ParserOptions::default()
    };
    let parser = BbcodeParser::with_options(&registry, options);
    assert_eq!(parser.to_bbcode(text, false).unwrap(), expected);
}

#[test]
fn custom_quoting() {
    let registry = TagRegistry::with_defaults();
    let options = ParserOptions {
        quote_type: QuoteType::custom(|value, _| format!("'{value}'")),
        ..ParserOptions::default()
    };
    let parser = BbcodeParser::with_options(&registry, options);
    assert_eq!(parser.to_bbcode("[size=3]x[/size]", false).unwrap(), "[size='3']x[/size]");
}

#[test]
fn img_attribute_injection() {
    let html = to_html("[img]fake.png\" onerror=\"alert(1)[/img]");
    let src_start = html.find("src=\"").unwrap() + 5;
    let src_len = html[src_start..].find('"').unwrap();
    assert_eq!(&html[src_start..src_start + src_len], "fake.png&quot; onerror=&quot;alert(1)");
}

#[rstest]
#[case("[url]javascript:alert(1)[/url]")]
#[case("[url=javascript:alert(1)]x[/url]")]
#[case("[img]javascript:alert(1)[/img]")]
#[case("[email=javascript:alert(1)]x[/email]")]
#[case("[url=JavaScript:alert(1)]x[/url]")]
fn script_urls_never_reach_attributes(#[case] text: &str) {
    let html = to_html(text);
    assert!(!html.to_lowercase().contains("=\"javascript:"), "{html}");
}

#[test]
fn whitespace_only_tags_are_unwrapped() {
    assert_eq!(to_bbcode("a[b]  [/b]b"), "a  b");
    assert_eq!(to_bbcode("[td] [/td]"), "[td] [/td]\n");
}

#[test]
fn preserved_newlines() {
    let registry = TagRegistry::with_defaults();
    let options = ParserOptions {
        break_start_block: true,
        ..ParserOptions::default()
    };
    let parser = BbcodeParser::with_options(&registry, options);
    assert_eq!(
        parser.to_html_fragment("[quote]\nx[/quote]", true).unwrap(),
        "<blockquote><br />x<br /></blockquote>"
    );
    assert_eq!(
        parser.to_html_fragment("[quote]\nx[/quote]", false).unwrap(),
        "<blockquote>x<br /></blockquote>"
    );
}

#[test]
fn registry_edits_take_effect_between_parsers() {
    let mut registry = TagRegistry::with_defaults();
    let handle = registry.set(
        "spoiler",
        TagDefinition::new()
            .block()
            .html_template("<details>{0}</details>"),
    );
    assert_eq!(
        BbcodeParser::new(&registry).to_html("[spoiler]x[/spoiler]", false).unwrap(),
        "<details>x<br /></details>"
    );

    handle.remove(&mut registry);
    assert_eq!(
        BbcodeParser::new(&registry).to_bbcode("[spoiler]x[/spoiler]", false).unwrap(),
        "[spoiler]x[/spoiler]"
    );

    assert!(registry.rename("b", "bold"));
    assert_eq!(
        BbcodeParser::new(&registry).to_html("[bold]x[/bold]", false).unwrap(),
        "<div><strong>x</strong></div>\n"
    );
}
