//! stacks CLI - record service launcher
//!
//! Starts the books/users HTTP service. Database location, bind address,
//! and port come from the `serve` subcommand's flags.

use anyhow::Result;
use clap::{Parser, Subcommand};
use stacks_server::{run_server, ServerArgs};

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "stacks",
    author,
    version,
    about = "Record-management service for books and users"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServerArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init_tracing(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => run_server(args).await,
    }
}
