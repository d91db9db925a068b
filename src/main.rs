//! klereo-bridge - Publish Klereo pool probes to Home Assistant

use clap::Parser;

mod bridge;
mod cache;
mod cli;
mod client;
mod clock;
mod config;
mod error;
mod models;
mod output;

use cli::args::GlobalOptions;
use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);

    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_module("klereo_bridge", log::LevelFilter::Debug);
    }
    builder.format_timestamp_secs().init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Test => cli::test::run(&opts).await,
        Commands::Pools => cli::pools::list(&opts).await,
        Commands::Probes { pool_id } => cli::pools::probes(&opts, &pool_id).await,
        Commands::Maintenance => cli::maintenance::run(opts.format),
        Commands::Sync => cli::sync::once(&opts).await,
        Commands::Run { interval } => cli::sync::run(&opts, interval).await,
        Commands::Version => {
            println!("klereo-bridge version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => cli::completion::run(shell),
    }
}
