// src/main.rs
//
// jspfmt: structural formatter for JSP documents
//
// - Re-indents the markup skeleton: block-scoped custom tags (c:if, c:forEach,
//   jsp:body, …) and ordinary markup nest; void elements and single-tag custom
//   elements (br, img, c:set, jsp:param, …) never do.
// - Scriptlets and declarations: one statement per line, indented by braces.
// - Directives: one attribute per line once they get long.
// - Comments, EL fragments and <script>/<style> bodies come back verbatim.
//
// CLI flags:
//   --check                    : report, do not write; non-zero exit if changes are needed
//   --indent-width N           : columns per level (default 4)
//   --tabs                     : indent with tabs
//   --no-preserve-blank-lines  : drop blank lines instead of capping runs
//   --max-blank-lines N        : longest blank-line run kept (default 2)
//   --wrap-length N            : wrap hint, currently advisory (default 120)
//   -v / -vv / -vvv            : log verbosity (RUST_LOG overrides)
// INPUT may be `-` for stdin; the result then goes to stdout unless OUTPUT is given.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use jspfmt::{format_edit, FormatOptions, FormatOutcome};
use log::LevelFilter;

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Do not write anything; exit with an error if the input needs formatting
    #[arg(long, action = ArgAction::SetTrue)]
    check: bool,

    /// Columns per indentation level
    #[arg(long, value_name = "N", default_value_t = 4, value_parser = parse_positive)]
    indent_width: usize,

    /// Indent with one tab per level instead of spaces
    #[arg(long, action = ArgAction::SetTrue)]
    tabs: bool,

    /// Remove blank lines instead of capping their runs
    #[arg(long = "no-preserve-blank-lines", action = ArgAction::SetTrue)]
    no_preserve_blank_lines: bool,

    /// Longest run of consecutive blank lines to keep
    #[arg(long, value_name = "N", default_value_t = 2)]
    max_blank_lines: usize,

    /// Soft wrap length hint
    #[arg(long, value_name = "N", default_value_t = 120, value_parser = parse_positive)]
    wrap_length: usize,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Input file, or `-` for stdin
    input: PathBuf,

    /// Output file (default: overwrite input, or stdout for stdin)
    output: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> FormatOptions {
        FormatOptions {
            indent_width: self.indent_width,
            insert_spaces: !self.tabs,
            preserve_blank_lines: !self.no_preserve_blank_lines,
            max_consecutive_blank_lines: self.max_blank_lines,
            wrap_length: self.wrap_length,
        }
    }

    fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.options();
    options.validate()?;

    let src = read_input(&cli)?;
    let outcome = format_edit(&src, &options);
    let label = if cli.reads_stdin() {
        "<stdin>".to_string()
    } else {
        cli.input.display().to_string()
    };

    if cli.check {
        if let FormatOutcome::Replace(_) = outcome {
            eprintln!("needs formatting: {label}");
            bail!("input requires formatting");
        }
        log::info!("{label} is already formatted");
        return Ok(());
    }

    let formatted = outcome.apply(&src);
    match (&cli.output, cli.reads_stdin()) {
        (Some(out_path), _) => write_file(out_path, formatted)?,
        (None, true) => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(formatted.as_bytes())
                .context("failed to write to stdout")?;
        }
        (None, false) => {
            if outcome.is_unchanged() {
                log::info!("{label} is already formatted");
            } else {
                write_file(&cli.input, formatted)?;
                log::info!("formatted {label}");
            }
        }
    }
    Ok(())
}

fn read_input(cli: &Cli) -> Result<String> {
    if cli.reads_stdin() {
        let mut src = String::new();
        io::stdin()
            .read_to_string(&mut src)
            .context("failed to read stdin")?;
        Ok(src)
    } else {
        fs::read_to_string(&cli.input)
            .with_context(|| format!("failed to read {}", cli.input.display()))
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
