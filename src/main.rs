use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use linediff::areas::session::Session;
use linediff::artifacts::core::Output;
use linediff::artifacts::options::DiffOptions;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(
    name = "linediff",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A two-level line and character diff tool",
    long_about = "This is a text diff tool written in Rust. \
    It aligns two files line by line first, then refines every small changed block \
    character by character, so edits inside a line are shown precisely.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "diff",
        about = "Show the changes between two files",
        long_about = "This command prints a unified diff of two files with the changed \
        characters of every refined block highlighted."
    )]
    Diff {
        #[command(flatten)]
        args: DiffArgs,
        #[arg(long, help = "Print directly instead of through a pager")]
        no_pager: bool,
    },
    #[command(
        name = "compute",
        about = "Print the wire encoding of a diff",
        long_about = "This command prints the diff of two files in its compact JSON encoding, \
        with changes as positional arrays of line numbers and inner changes."
    )]
    Compute {
        #[command(flatten)]
        args: DiffArgs,
        #[arg(short, long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
}

#[derive(Args)]
struct DiffArgs {
    #[arg(index = 1, help = "The original file")]
    original: PathBuf,
    #[arg(index = 2, help = "The modified file")]
    modified: PathBuf,
    #[arg(
        short = 'w',
        long,
        help = "Ignore changes in leading and trailing whitespace"
    )]
    ignore_trim_whitespace: bool,
    #[arg(
        long,
        default_value_t = 5000,
        help = "Time budget in milliseconds, 0 for none"
    )]
    max_computation_time_ms: u32,
    #[arg(long, help = "Refine changed blocks of any size")]
    minimal: bool,
    #[arg(
        long,
        value_enum,
        default_value_t = ColorChoice::Auto,
        help = "When to color the output"
    )]
    color: ColorChoice,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl DiffArgs {
    fn options(&self) -> DiffOptions {
        DiffOptions {
            ignore_trim_whitespace: self.ignore_trim_whitespace,
            max_computation_time_ms: self.max_computation_time_ms,
            compute_more_minimal_edits: self.minimal,
        }
    }

    fn apply_color_choice(&self) {
        match self.color {
            ColorChoice::Always => colored::control::set_override(true),
            ColorChoice::Never => colored::control::set_override(false),
            ColorChoice::Auto => {
                if !std::io::stdout().is_terminal() {
                    colored::control::set_override(false);
                }
            }
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("LINEDIFF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let pwd = std::env::current_dir()?;

    match &cli.command {
        Commands::Diff { args, no_pager } => {
            args.apply_color_choice();
            let output = Output::detect(*no_pager);
            let session = Session::new(&pwd.to_string_lossy(), output.writer())?;

            session.diff(&args.original, &args.modified, &args.options())?;

            drop(session);
            output.finish()?
        }
        Commands::Compute { args, pretty } => {
            let session = Session::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            session.compute(&args.original, &args.modified, &args.options(), *pretty)?
        }
    }

    Ok(())
}
