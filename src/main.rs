//! skyusage - Fetch, reconcile and report satellite-internet usage

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use skyusage::{
    cli::{Cli, Command},
    commands::run,
    config::Settings,
};
use skyusage_terminal::get_formatter;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(verbose: bool) {
    // RUST_LOG wins; otherwise --verbose raises the default from warn to info
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new(
                "skyusage=info,skyusage_core=info,skyusage_provider_starlink=info",
            )
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables take precedence
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Warning: could not load .env file: {e}");
    }

    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("skyusage {}", skyusage::VERSION);

    let settings = Settings::from_args(&cli.connection).context("Invalid configuration")?;
    let client = settings
        .build_client()
        .context("Failed to create API client")?;

    let is_tty = is_terminal::is_terminal(std::io::stdout());
    let colored_output = is_tty && std::env::var_os("NO_COLOR").is_none();
    let formatter = get_formatter(cli.json, cli.compact, colored_output);

    let progress = match &cli.command {
        Command::Usage(args) if !cli.json && is_tty => {
            Some(spinner(&format!("Fetching usage for account {}", args.account)))
        }
        _ => None,
    };

    info!("Running {:?}", cli.command);
    let result = run(&client, &cli.command, formatter.as_ref()).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    println!("{}", result?);
    Ok(())
}
