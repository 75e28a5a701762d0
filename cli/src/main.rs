mod config;
mod fetch;
mod locator;
mod logging;
mod test_runner;

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use gemtext::{Document, ParseMode};
use speech::{RecordingShell, SpeechError, SystemShell};
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, ConfigError};
use crate::fetch::{CommandFetcher, FetchError, Fetcher, Source};
use crate::locator::LocatorError;

const SUBCOMMANDS: &[&str] = &["play", "show", "check", "test", "help"];

/// Global options that consume the following argument.
const VALUE_OPTIONS: &[&str] = &["--config"];

#[derive(Parser)]
#[command(name = "gemspeak", version, about = "Listen to gemtext documents")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: ./gemspeak.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a gemini:// document and read it aloud
    Play(PlayArgs),

    /// Print the transcript (or node dump) of a local file or remote document
    Show(ShowArgs),

    /// Report lines whose meaning depends on the parse mode
    Check(CheckArgs),

    /// Run .test.gmi fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct PlayArgs {
    /// Document locator; `gemini://` is assumed when no scheme is given
    locator: String,

    /// Accept bare `=>`, `>` and `#` markers
    #[arg(long)]
    lenient: bool,

    /// Print the audio and speech commands instead of running them
    #[arg(long)]
    dry_run: bool,
}

#[derive(clap::Args)]
struct ShowArgs {
    /// Path to a local gemtext file, or a document locator
    source: String,

    /// Accept bare `=>`, `>` and `#` markers
    #[arg(long)]
    lenient: bool,

    /// Dump the parsed nodes instead of the transcript
    #[arg(long)]
    ast: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Gemtext file to check
    file: PathBuf,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.gmi file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

fn main() {
    let args = inject_default_subcommand(std::env::args().collect());
    let cli = Cli::parse_from(&args);
    logging::init(cli.verbose);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {}", error);
            1
        }
    };
    process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Command::Play(args) => {
            let config = Config::load(cli.config.as_deref())?;
            do_play(args, &config)?;
            Ok(0)
        }
        Command::Show(args) => {
            let config = Config::load(cli.config.as_deref())?;
            do_show(args, &config)?;
            Ok(0)
        }
        Command::Check(args) => do_check(args, cli.no_color),
        Command::Test(args) => {
            let path = Path::new(&args.path);
            if args.list_categories {
                test_runner::list_categories(path);
                return Ok(0);
            }
            Ok(test_runner::run_tests(path, cli.no_color, &args.category))
        }
    }
}

// So that `gemspeak gemini://host/` works like `gemspeak play gemini://host/`,
// insert `play` before the first positional argument when it is not a
// subcommand name.
fn inject_default_subcommand(mut args: Vec<String>) -> Vec<String> {
    let mut index = 1;
    while index < args.len() {
        let arg = &args[index];
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            index += 2;
            continue;
        }
        if arg.starts_with('-') {
            index += 1;
            continue;
        }
        if !SUBCOMMANDS.contains(&arg.as_str()) {
            args.insert(index, "play".to_string());
        }
        break;
    }
    args
}

fn parse_mode(lenient: bool) -> ParseMode {
    ParseMode::from_strict(!lenient)
}

fn load_document(raw: &str, lenient: bool, config: &Config) -> Result<Document, CliError> {
    let source = Source::resolve(raw)?;
    let fetcher = CommandFetcher::from_command_line(&config.fetch.command);
    let text = source.load(&fetcher)?;
    Ok(gemtext::parse(&text, parse_mode(lenient)))
}

fn do_play(args: PlayArgs, config: &Config) -> Result<(), CliError> {
    // Scheme problems surface here, before anything is fetched.
    let url = locator::sanitize(&args.locator)?;
    let fetcher = CommandFetcher::from_command_line(&config.fetch.command);
    let text = fetcher.fetch(&url)?;
    let document = gemtext::parse(&text, parse_mode(args.lenient));
    debug!(%url, nodes = document.len(), "playing");

    if args.dry_run {
        let (shell, _) =
            speech::speak(&document, &config.speech, RecordingShell::new(), io::sink())?;
        for command in shell.commands() {
            println!("{}", command);
        }
        return Ok(());
    }

    let stdout = io::stdout();
    speech::speak(&document, &config.speech, SystemShell, stdout.lock())?;
    Ok(())
}

fn do_show(args: ShowArgs, config: &Config) -> Result<(), CliError> {
    let document = load_document(&args.source, args.lenient, config)?;
    if args.ast {
        println!("{:#?}", document);
    } else {
        print!("{}", speech::transcript(&document));
    }
    Ok(())
}

fn do_check(args: CheckArgs, no_color: bool) -> Result<i32, CliError> {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = fetch::read_file(&args.file)?;
    let lints = gemtext::lint::check(&source);
    if lints.is_empty() {
        eprintln!("ok: {} has no warnings", args.file.display());
        return Ok(0);
    }

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.display().to_string(), source);
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for lint in &lints {
        let diagnostic = lint.to_diagnostic(file_id);
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
    }
    eprintln!("{}: {} warning(s)", args.file.display(), lints.len());
    Ok(1)
}
