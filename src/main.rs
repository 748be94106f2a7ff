use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use syft::config::load_config;
use syft::{FilePicker, Screen, SearchController, SubmitOutcome, SyftClient};

/// Syft: search inside audio and video
#[derive(Parser)]
#[command(name = "syft")]
#[command(about = "Send an audio or video file to the Syft search service and list the matching moments.")]
#[command(version)]
struct Cli {
    /// Configuration file (toml, json or yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override client.base_url
    #[arg(long, global = true, env = "SYFT_BASE_URL")]
    base_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a media file
    Search {
        /// Path to an audio or video file
        #[arg(short, long)]
        file: PathBuf,
        /// Keywords to look for
        #[arg(short, long, default_value = "")]
        query: String,
        /// Use context matching instead of literal matching
        #[arg(long)]
        context: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the search service is reachable
    Ping,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }
    let client = SyftClient::from_config(&config.client)?;

    match cli.command {
        Commands::Ping => {
            if client.ping().await? {
                println!("{} is up", client.base_url());
                Ok(())
            } else {
                bail!("{} did not answer the test route", client.base_url())
            }
        }
        Commands::Search {
            file,
            query,
            context,
            json,
        } => {
            let mut picker = FilePicker::from_config(&config.picker);
            let selected = picker.pick_path(&file).await?;

            let session = SearchController::with_client(client);
            session.select_file(selected).await;
            session.set_query_text(query).await;
            session.set_context_flag(context).await;

            let outcome = session.submit().await;
            let screen = session.screen().await;

            if json {
                println!("{}", serde_json::to_string_pretty(&screen)?);
            } else {
                print_screen(&screen);
            }

            match outcome {
                SubmitOutcome::Completed(syft::Phase::Ready) => Ok(()),
                _ => bail!("search did not complete"),
            }
        }
    }
}

fn print_screen(screen: &Screen) {
    match screen {
        Screen::Results {
            access_link,
            elapsed_time,
            rows,
        } => {
            println!("{} match(es) in {elapsed_time:.2}s", rows.len());
            println!("Media: {access_link}\n");
            for (i, row) in rows.iter().enumerate() {
                println!("  [{}] {}  ({})", i + 1, row.range, row.confidence);
                if !row.transcript.is_empty() {
                    println!("      \"{}\"", row.transcript);
                }
            }
        }
        Screen::NoMatches {
            access_link,
            elapsed_time,
        } => {
            println!("Nothing found ({elapsed_time:.2}s).");
            println!("Media: {access_link}");
        }
        Screen::Form {
            banner: Some(banner),
            ..
        } => eprintln!("{banner}"),
        Screen::Form { drop_label, .. } | Screen::Searching { drop_label } => {
            println!("{drop_label}");
        }
    }
}
