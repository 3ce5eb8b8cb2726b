use clap::{Parser, Subcommand};
use staticsend_core::cli::{self, ResolveArgs};
use staticsend_core::logging::{LogMode, default_log_mode, init_logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "staticsend",
    version,
    about = "staticsend: resolve request paths to static files"
)]
struct Cli {
    /// Log format; defaults to pretty on a terminal and JSON otherwise
    #[arg(long, global = true, value_enum)]
    log: Option<LogMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an options file and print what it resolves to
    Check {
        /// Path to the options file
        #[arg(long, default_value = "staticsend.hcl")]
        config: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dry-run a request and print the response it would produce
    Resolve(ResolveArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log.unwrap_or_else(default_log_mode));

    match cli.command {
        Command::Check { config, json } => cli::check(&config, json),
        Command::Resolve(args) => cli::resolve(args).await,
    }
}
