//! The `texfence` binary.

use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use texfence::plugins::quickjs::QuickJsTypesetter;
use texfence::{
    fence, render_document, render_fences, txt, CommandConverter, Options, RenderOutcome,
};

const EXIT_DIAGNOSTICS: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Debug, Parser)]
#[command(about, author, version)]
#[command(after_help = "\
By default, texfence will attempt to read command-line options from a config file specified by \
--config-file. This behaviour can be disabled by passing --config-file none. The config file is \
split into words as a shell would, and those words are placed before the other arguments.")]
struct Cli {
    /// README file to render; or standard input if none passed
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to config file containing command-line arguments, or 'none'
    #[arg(short, long, value_name = "PATH", default_value = get_default_config_path())]
    config_file: Option<String>,

    /// Input format; inferred from the file name when omitted
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Command converting fenced md or rst to HTML, e.g. "comrak --unsafe"
    #[arg(long, value_name = "COMMAND")]
    converter: Option<String>,

    /// KaTeX bundle providing katex.renderToString
    #[arg(long, value_name = "PATH", env = "TEXFENCE_KATEX")]
    katex: Option<PathBuf>,

    /// Report malformed TeX instead of rendering it best-effort
    #[arg(long)]
    strict: bool,

    /// Stop after fencing and print the fenced source
    #[arg(long)]
    fence_only: bool,

    /// Wrap the output in a complete HTML page
    #[arg(long)]
    standalone: bool,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log more; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Markdown, converted with --converter
    Md,
    /// reStructuredText, converted with --converter
    Rst,
    /// Plain text
    Txt,
    /// HTML that already went through a converter
    Html,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "md" | "markdown" => Some(Format::Md),
            "rst" => Some(Format::Rst),
            "txt" => Some(Format::Txt),
            "html" | "htm" => Some(Format::Html),
            _ => None,
        }
    }
}

fn get_default_config_path() -> String {
    autodetect_default_config_path().unwrap_or_else(|| "none".into())
}

#[cfg(all(not(windows), not(target_arch = "wasm32")))]
fn autodetect_default_config_path() -> Option<String> {
    let dirs = xdg::BaseDirectories::with_prefix("texfence").ok()?;
    dirs.get_config_file("config").to_str().map(String::from)
}

#[cfg(any(windows, target_arch = "wasm32"))]
fn autodetect_default_config_path() -> Option<String> {
    None
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut cli = Cli::parse();

    if let Some(path) = &cli.config_file {
        if path != "none" {
            if let Ok(config) = fs::read_to_string(path) {
                let mut args = std::env::args();
                let mut words = vec![args.next().unwrap_or_else(|| "texfence".into())];
                words.extend(shell_words::split(&config)?);
                words.extend(args);
                cli = Cli::parse_from(words);
            }
        }
    }

    StderrLogger::install(cli.verbose);

    let source = read_input(cli.file.as_deref())?;
    let format = cli
        .format
        .or_else(|| cli.file.as_deref().and_then(Format::from_path))
        .unwrap_or(Format::Md);

    let mut options = Options::default();
    options.render.strict = cli.strict;

    if cli.fence_only {
        let fenced = fence(&source, &options)?;
        write_output(cli.output.as_deref(), &fenced)?;
        return Ok(());
    }

    let script_path = match &cli.katex {
        Some(path) => path,
        None => {
            eprintln!("texfence: --katex PATH (or TEXFENCE_KATEX) is required to typeset math");
            process::exit(EXIT_USAGE);
        }
    };
    let script = fs::read(script_path).map_err(|e| {
        texfence::Error::EngineUnavailable(format!("{}: {}", script_path.display(), e))
    })?;
    let typesetter = QuickJsTypesetter::new(script)?;

    let outcome: RenderOutcome = match format {
        Format::Txt => txt::render(&source, &options, &typesetter)?,
        Format::Html => render_fences(&source, &options, &typesetter)?,
        Format::Md | Format::Rst => {
            let words = match &cli.converter {
                Some(command) => shell_words::split(command)?,
                None => {
                    eprintln!("texfence: --converter is required for {:?} input", format);
                    process::exit(EXIT_USAGE);
                }
            };
            let converter = match CommandConverter::from_words(words) {
                Some(converter) => converter,
                None => {
                    eprintln!("texfence: --converter is empty");
                    process::exit(EXIT_USAGE);
                }
            };
            render_document(&source, &options, &converter, &typesetter)?
        }
    };

    for diagnostic in &outcome.diagnostics {
        eprintln!("{}", diagnostic.summary);
        if !diagnostic.detail.is_empty() {
            eprintln!("    {}", diagnostic.detail.replace('\n', "\n    "));
        }
    }

    let html = if cli.standalone {
        standalone_page(&outcome.html)
    } else {
        outcome.html
    };
    write_output(cli.output.as_deref(), &html)?;

    if !outcome.diagnostics.is_empty() {
        process::exit(EXIT_DIAGNOSTICS);
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut s = String::with_capacity(2048);
            io::stdin().read_to_string(&mut s)?;
            Ok(s)
        }
    }
}

fn write_output(path: Option<&Path>, html: &str) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, html),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(html.as_bytes())?;
            if !html.ends_with('\n') {
                lock.write_all(b"\n")?;
            }
            lock.flush()
        }
    }
}

const KATEX_VERSION: &str = "0.16.9";

fn standalone_page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/github-markdown-css/5.5.1/github-markdown-light.css" />
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/KaTeX/{katex}/katex.css" />
    <style>
        .markdown-body {{
            box-sizing: border-box;
            min-width: 200px;
            max-width: 980px;
            margin: 0 auto;
            padding: 45px;
        }}
        .markdown-body pre[lang="math"] {{
            background: none;
            text-align: center;
        }}
        @media (max-width: 767px) {{
            .markdown-body {{
                padding: 15px;
            }}
        }}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>"#,
        katex = KATEX_VERSION,
        body = body
    )
}

/// Writes `log` records to stderr.
struct StderrLogger {
    level: log::LevelFilter,
}

impl StderrLogger {
    fn install(verbosity: u8) {
        let level = match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
