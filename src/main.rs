use anyhow::Context;
use clap::{Parser, Subcommand};
use grill_orders::app::{self, AppConfig, Services};
use grill_orders::commands::parse_line;
use grill_orders::kitchen;
use grill_orders::session::SessionEvent;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Collect group grill orders and report cumulative cook times
#[derive(Parser)]
#[command(name = "grill-orders", version)]
#[command(about = "Collect group grill orders and report cumulative cook times", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read slash commands from stdin, one per line, and print the replies
    ///
    /// Lines look like `#channel user /order bread 2` or just `/order bread 2`.
    Serve,
    /// Print the cook time in seconds for one order
    CookTime {
        /// Number of units ordered
        quantity: u64,
        /// Units that fit on the grill at once
        capacity: u32,
        /// Seconds one batch takes
        seconds: u64,
    },
    /// Load and validate the configuration, then print it
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let app_config = AppConfig::new(cli.verbose).with_config_path(cli.config.clone());
    app::init_logging(&app_config);

    if let Err(e) = run(cli.command, &app_config).await {
        app::handle_fatal_error(e, app_config.verbose);
    }
}

async fn run(command: Commands, app_config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve => serve(app_config).await,
        Commands::CookTime {
            quantity,
            capacity,
            seconds,
        } => {
            let total = kitchen::cook_time(quantity, capacity, seconds)?;
            println!("{total}");
            Ok(())
        }
        Commands::CheckConfig => {
            let config = app::load_bot_config(app_config).await?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

async fn serve(app_config: &AppConfig) -> anyhow::Result<()> {
    let config = app::load_bot_config(app_config).await?;
    let router = app::build_router(&config, Services::from_config(&config)?);
    info!("Reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_line(&line) {
            Ok(Some(request)) => {
                let reply = router.dispatch(&request).await;
                println!("[{}] {}", request.origin.channel, reply);
            }
            Ok(None) => {}
            Err(e) => println!("{}", e.user_message()),
        }
    }

    // Subscribe before checking so a close in between is not missed
    let mut events = router.session().subscribe();
    if router.session().is_open().await {
        info!("Input closed, waiting for the session deadline");
        tokio::select! {
            _ = wait_for_close(&mut events) => {}
            _ = tokio::signal::ctrl_c() => warn!("Interrupted, pending orders were not summarized"),
        }
    }
    Ok(())
}

async fn wait_for_close(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Finalized { .. }) | Err(broadcast::error::RecvError::Closed) => return,
            _ => continue,
        }
    }
}
