use anyhow::{Context, Result, bail};
use bbweave_config::Config;
use bbweave_engine::{BbcodeParser, parsing::snapshot};
use std::{
    env,
    io::{self, Read, Write},
    path::PathBuf,
    process,
};

const USAGE: &str = "Usage: bbweave [--to html|fragment|bbcode|tree] [--preserve-newlines] [--config <path>] [file]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Output {
    #[default]
    Html,
    Fragment,
    Bbcode,
    Tree,
}

impl Output {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "html" => Some(Output::Html),
            "fragment" => Some(Output::Fragment),
            "bbcode" => Some(Output::Bbcode),
            "tree" => Some(Output::Tree),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    output: Output,
    preserve_newlines: bool,
    config: Option<PathBuf>,
    /// Read stdin when absent.
    input: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--to" => {
                let name = args.next().context("--to needs a format")?;
                parsed.output = Output::from_name(&name)
                    .with_context(|| format!("unknown output format '{name}'"))?;
            }
            "--preserve-newlines" => parsed.preserve_newlines = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
            _ if parsed.input.is_some() => bail!("only one input file can be given"),
            _ => parsed.input = Some(PathBuf::from(&arg)),
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::load()?.unwrap_or_default());
    };
    let path = Config::expand_path(path).unwrap_or_else(|| path.clone());
    Config::load_from_path(&path)?
        .with_context(|| format!("config file '{}' not found", path.display()))
}

fn convert(args: &Args, config: &Config, text: &str) -> Result<String> {
    let registry = config.registry()?;
    let parser = BbcodeParser::with_options(&registry, config.parser_options());
    let tree = parser.parse(text, args.preserve_newlines)?;
    log::debug!("parsed {} tokens", tree.len());

    Ok(match args.output {
        Output::Html => parser.render_html(&tree),
        Output::Fragment => parser.render_html_fragment(&tree),
        Output::Bbcode => parser.render_bbcode(&tree),
        Output::Tree => snapshot::dump(&tree),
    })
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = load_config(args.config.as_ref())?;
    let text = read_input(args.input.as_ref())?;
    let output = convert(&args, &config, &text)?;

    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}
