use bbweave_engine::{Formatter, HtmlFormatter, ParserOptions, QuoteType, TagDefinition, TagRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Tag [{name}] is not registered and declares no html template")]
    UnknownTag { name: String },
}

/// `bbweave` settings, read from `~/.config/bbweave/config.toml`.
///
/// ```toml
/// [parser]
/// break_before_block = true
/// quote_type = "always"
///
/// [tags.spoiler]
/// block = true
/// html = "<details>{0}</details>"
///
/// [tags.youtube]
/// disabled = true
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub tags: BTreeMap<String, TagOverride>,
}

/// The `[parser]` table, field for field [`ParserOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub break_before_block: bool,
    pub break_start_block: bool,
    pub break_end_block: bool,
    pub break_after_block: bool,
    pub remove_empty_tags: bool,
    pub fix_invalid_nesting: bool,
    pub fix_invalid_children: bool,
    pub quote_type: QuoteStyle,
    pub strict_match: bool,
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let options = ParserOptions::default();
        Self {
            break_before_block: options.break_before_block,
            break_start_block: options.break_start_block,
            break_end_block: options.break_end_block,
            break_after_block: options.break_after_block,
            remove_empty_tags: options.remove_empty_tags,
            fix_invalid_nesting: options.fix_invalid_nesting,
            fix_invalid_children: options.fix_invalid_children,
            quote_type: QuoteStyle::Auto,
            strict_match: options.strict_match,
            max_depth: options.max_depth,
        }
    }
}

/// The quote types a config file can name. Custom quoting needs code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Always,
    Never,
    #[default]
    Auto,
}

impl From<QuoteStyle> for QuoteType {
    fn from(style: QuoteStyle) -> Self {
        match style {
            QuoteStyle::Always => QuoteType::Always,
            QuoteStyle::Never => QuoteType::Never,
            QuoteStyle::Auto => QuoteType::Auto,
        }
    }
}

/// One `[tags.<name>]` table. Unset fields leave the registered definition
/// alone.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagOverride {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_inline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allows_empty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_closing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_closing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_last_line_break: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_children: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_before: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_start: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_end: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_after: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_type: Option<QuoteStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_match: Option<bool>,
    /// HTML template: `{0}` content, `{attr}` escaped, `{!attr}` raw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// BBCode template for the markup direction: `{0}` content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TagOverride {
    fn apply(&self, def: &mut TagDefinition) {
        if let Some(block) = self.block {
            def.is_inline = !block;
        }
        if self.html_inline.is_some() {
            def.is_html_inline = self.html_inline;
        }
        if let Some(allows_empty) = self.allows_empty {
            def.allows_empty = allows_empty;
        }
        if let Some(self_closing) = self.self_closing {
            def.is_self_closing = self_closing;
        }
        if let Some(exclude_closing) = self.exclude_closing {
            def.exclude_closing = exclude_closing;
        }
        if let Some(skip) = self.skip_last_line_break {
            def.skip_last_line_break = skip;
        }
        if let Some(closed_by) = &self.closed_by {
            def.closed_by = Some(closed_by.iter().map(|n| n.to_lowercase()).collect());
        }
        if let Some(children) = &self.allowed_children {
            def.allowed_children = Some(children.iter().map(|n| n.to_lowercase()).collect());
        }
        for (target, value) in [
            (&mut def.break_before, self.break_before),
            (&mut def.break_start, self.break_start),
            (&mut def.break_end, self.break_end),
            (&mut def.break_after, self.break_after),
        ] {
            if value.is_some() {
                *target = value;
            }
        }
        if let Some(style) = self.quote_type {
            def.quote_type = Some(style.into());
        }
        if self.strict_match.is_some() {
            def.strict_match = self.strict_match;
        }
        if let Some(template) = &self.html {
            def.html = Some(HtmlFormatter::Template(template.clone()));
        }
        if let Some(template) = &self.format {
            def.format = Some(Formatter::Template(template.clone()));
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/bbweave");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expand `~` and environment variables in a user-supplied path.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    pub fn parser_options(&self) -> ParserOptions {
        let parser = &self.parser;
        ParserOptions {
            break_before_block: parser.break_before_block,
            break_start_block: parser.break_start_block,
            break_end_block: parser.break_end_block,
            break_after_block: parser.break_after_block,
            remove_empty_tags: parser.remove_empty_tags,
            fix_invalid_nesting: parser.fix_invalid_nesting,
            fix_invalid_children: parser.fix_invalid_children,
            quote_type: parser.quote_type.into(),
            strict_match: parser.strict_match,
            max_depth: parser.max_depth,
        }
    }

    /// Apply every `[tags.<name>]` table to `registry`.
    ///
    /// A table for an unregistered name creates the tag, which then needs
    /// an `html` template. `disabled = true` removes the tag.
    pub fn apply_tags(&self, registry: &mut TagRegistry) -> Result<(), ConfigError> {
        for (name, tag) in &self.tags {
            if tag.disabled {
                registry.remove(name);
                continue;
            }
            if !registry.contains(name) && tag.html.is_none() {
                return Err(ConfigError::UnknownTag { name: name.clone() });
            }
            registry.update(name, |def| tag.apply(def));
        }
        Ok(())
    }

    /// The standard tag set with this config's tag tables applied.
    pub fn registry(&self) -> Result<TagRegistry, ConfigError> {
        let mut registry = TagRegistry::with_defaults();
        self.apply_tags(&mut registry)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbweave_engine::BbcodeParser;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/bbweave/config.toml"));
    }

    #[test]
    fn test_empty_config_matches_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());

        let options = config.parser_options();
        let defaults = ParserOptions::default();
        assert_eq!(options.break_after_block, defaults.break_after_block);
        assert_eq!(options.max_depth, defaults.max_depth);
        assert!(matches!(options.quote_type, QuoteType::Auto));
    }

    #[test]
    fn test_parser_table() {
        let config: Config = toml::from_str(
            r#"
[parser]
break_before_block = true
quote_type = "never"
max_depth = 32
"#,
        )
        .unwrap();

        let options = config.parser_options();
        assert!(options.break_before_block);
        assert!(options.break_after_block);
        assert!(matches!(options.quote_type, QuoteType::Never));
        assert_eq!(options.max_depth, 32);
    }

    #[test]
    fn test_unknown_quote_type_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[parser]\nquote_type = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_tag_tables_override_and_add() {
        let config: Config = toml::from_str(
            r#"
[tags.b]
html = "<b>{0}</b>"

[tags.spoiler]
block = true
html = "<details>{0}</details>"

[tags.youtube]
disabled = true
"#,
        )
        .unwrap();

        let registry = config.registry().unwrap();
        assert!(!registry.contains("youtube"));
        assert!(!registry.is_inline("spoiler"));

        let parser = BbcodeParser::new(&registry);
        assert_eq!(
            parser.to_html_fragment("[b]x[/b][spoiler]y[/spoiler]", false).unwrap(),
            "<b>x</b><details>y<br /></details>"
        );
    }

    #[test]
    fn test_new_tag_without_template_is_an_error() {
        let config: Config = toml::from_str("[tags.mystery]\nblock = true\n").unwrap();
        let err = config.registry().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTag { ref name } if name == "mystery"));
    }

    #[test]
    fn test_break_override_keeps_other_fields() {
        let config: Config = toml::from_str("[tags.quote]\nbreak_after = false\n").unwrap();
        let registry = config.registry().unwrap();
        let quote = registry.get("quote").unwrap();
        assert_eq!(quote.break_after, Some(false));
        assert!(!quote.is_inline);
        assert!(quote.html.is_some());
    }

    #[test]
    fn test_expand_home_relative_config() {
        let Some(expanded) = Config::expand_path(Path::new("~/forum/bbweave.toml")) else {
            panic!("home-relative path did not expand");
        };
        let expanded = expanded.to_string_lossy().into_owned();
        assert!(!expanded.starts_with('~'), "{expanded}");
        assert!(expanded.ends_with("forum/bbweave.toml"), "{expanded}");
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("BBWEAVE_TEST_DIR", "/test/env/path");
        }

        let path = PathBuf::from("$BBWEAVE_TEST_DIR/config.toml");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/config.toml")));

        unsafe {
            env::remove_var("BBWEAVE_TEST_DIR");
        }
    }

    #[test]
    fn test_missing_config_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("bbweave.toml");

        assert_eq!(Config::load_from_path(&missing).unwrap(), None);
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser\nmax_depth = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::default();
        test_config.parser.break_end_block = true;
        test_config.parser.quote_type = QuoteStyle::Always;
        test_config.tags.insert(
            "spoiler".to_string(),
            TagOverride {
                block: Some(true),
                html: Some("<details>{0}</details>".to_string()),
                closed_by: Some(vec!["/quote".to_string()]),
                ..TagOverride::default()
            },
        );

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
