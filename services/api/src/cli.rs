use crate::screen::{run_batch, run_screen, BatchArgs, ScreenArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use docscreen::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Document Screening Service",
    about = "Screen machine readable travel documents from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Screen one captured document from a JSON file
    Screen(ScreenArgs),
    /// Screen a CSV of captures and print the batch summary
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Screen(args) => run_screen(args),
        Command::Batch(args) => run_batch(args),
    }
}
