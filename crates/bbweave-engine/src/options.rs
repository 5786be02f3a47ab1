use std::fmt;
use std::sync::Arc;

/// User-supplied attribute quoting: `(value, attribute name) -> quoted value`.
pub type QuoteCallback = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// How attribute values are quoted when serializing back to BBCode.
#[derive(Clone, Default)]
pub enum QuoteType {
    /// Always wrap in `"`, escaping `\` and `"`.
    Always,
    /// Emit the raw value.
    Never,
    /// Quote only values containing whitespace or `=`.
    #[default]
    Auto,
    /// Delegate entirely to a function.
    Custom(QuoteCallback),
}

impl QuoteType {
    pub fn custom(f: impl Fn(&str, &str) -> String + Send + Sync + 'static) -> Self {
        QuoteType::Custom(Arc::new(f))
    }
}

impl fmt::Debug for QuoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteType::Always => f.write_str("Always"),
            QuoteType::Never => f.write_str("Never"),
            QuoteType::Auto => f.write_str("Auto"),
            QuoteType::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-parser settings.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Block tags are written with a line break before them.
    pub break_before_block: bool,
    /// Block tags are written with a line break after their open tag.
    pub break_start_block: bool,
    /// Block tags are written with a line break before their close tag.
    pub break_end_block: bool,
    /// Block tags are written with a line break after them.
    pub break_after_block: bool,
    /// Unwrap tags that only contain whitespace unless they allow it.
    pub remove_empty_tags: bool,
    /// Move block tags out of inline tags.
    pub fix_invalid_nesting: bool,
    /// Demote children a tag does not allow to plain content.
    pub fix_invalid_children: bool,
    /// Default attribute quoting for tags without their own.
    pub quote_type: QuoteType,
    /// Element matchers require every clause instead of any.
    pub strict_match: bool,
    /// Maximum number of simultaneously open tags.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            break_before_block: false,
            break_start_block: false,
            break_end_block: false,
            break_after_block: true,
            remove_empty_tags: true,
            fix_invalid_nesting: true,
            fix_invalid_children: true,
            quote_type: QuoteType::Auto,
            strict_match: false,
            max_depth: 256,
        }
    }
}

/// Whether a tag gets a structural line break at one of its four positions.
///
/// A tag's own setting wins when it is `true`; `false` opts a block tag out
/// of the global block policy.
pub(crate) fn tag_break(is_block: bool, global: bool, own: Option<bool>) -> bool {
    (is_block && global && own != Some(false)) || own == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, true, None, true)]
    #[case(true, true, Some(false), false)]
    #[case(true, false, None, false)]
    #[case(false, true, None, false)]
    #[case(false, false, Some(true), true)]
    #[case(true, false, Some(true), true)]
    fn tag_break_resolution(
        #[case] is_block: bool,
        #[case] global: bool,
        #[case] own: Option<bool>,
        #[case] expected: bool,
    ) {
        assert_eq!(tag_break(is_block, global, own), expected);
    }

    #[test]
    fn defaults() {
        let opts = ParserOptions::default();
        assert!(opts.break_after_block);
        assert!(!opts.break_before_block);
        assert!(opts.remove_empty_tags);
        assert_eq!(opts.max_depth, 256);
        assert!(matches!(opts.quote_type, QuoteType::Auto));
    }
}
