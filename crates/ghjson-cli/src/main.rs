mod cmd_edit;
mod cmd_fmt;
mod cmd_get;
mod cmd_init;
mod cmd_put;
mod cmd_validate;
mod remote;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ghjson")]
#[command(about = "Load, edit, and save JSON files stored in GitHub repositories")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    remote: remote::Remote,

    /// Log requests and state changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a remote JSON file, creating it with a default document if missing
    Get {
        #[command(flatten)]
        target: remote::Target,
    },
    /// Replace a remote JSON file with the contents of a local file
    Put {
        #[command(flatten)]
        target: remote::Target,

        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: String,
    },
    /// Open a remote JSON file in $VISUAL / $EDITOR and save the result
    Edit {
        #[command(flatten)]
        target: remote::Target,
    },
    /// Create the remote file with a default document unless it already exists
    Init {
        #[command(flatten)]
        target: remote::Target,
    },
    /// Pretty-print local JSON with two-space indentation
    Fmt {
        /// Input file (use - for stdin)
        input: String,

        /// Rewrite the file instead of printing
        #[arg(long)]
        in_place: bool,
    },
    /// Check that local text is valid JSON
    Validate {
        /// Input file (use - for stdin)
        input: String,
    },
}

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise stay quiet unless --verbose
    let default_filter = if verbose {
        "ghjson=debug,ghjson_cli=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Get { target } => cmd_get::run(&cli.remote, &target),
        Commands::Put { target, input } => cmd_put::run(&cli.remote, &target, &input),
        Commands::Edit { target } => cmd_edit::run(&cli.remote, &target),
        Commands::Init { target } => cmd_init::run(&cli.remote, &target),
        Commands::Fmt { input, in_place } => cmd_fmt::run(&input, in_place),
        Commands::Validate { input } => cmd_validate::run(&input),
    }
}
