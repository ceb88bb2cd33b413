/*
[INPUT]:  CLI arguments, optional YAML overrides, API_* environment, OS shutdown signals
[OUTPUT]: REST smoke results or long-running WebSocket soak runs
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use kucoin_universal_sdk::{DefaultClient, WebSocketClientOption, WebSocketEvent};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kucoin_sdk_regression::service::{self, Summary};
use kucoin_sdk_regression::{Credentials, RegressionConfig, forever, reconnect};

#[derive(Parser, Debug)]
#[command(name = "kucoin-regression", version, about = "KuCoin universal SDK regression runner")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", env = "REGRESSION_CONFIG")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run every REST case once and exit non-zero on failure
    Service,
    /// Poll REST and churn WebSocket connections until Ctrl-C
    Forever,
    /// Hold many subscriptions open across reconnects until Ctrl-C
    Reconnect,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        // A missing .env is the normal case.
        if !err.not_found() {
            return Err(anyhow!(err)).context("load .env");
        }
    }

    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = RegressionConfig::load(args.config_path.as_deref())?;
    let credentials = Credentials::from_env();
    info!(command = ?args.command, ?credentials, "starting kucoin-regression");

    let option = config.client_option(&credentials, websocket_option())?;
    let client = DefaultClient::new(option).context("create client")?;

    match args.command {
        Command::Service => run_service(&client, &config).await,
        Command::Forever => {
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            forever::run(client, config, shutdown).await
        }
        Command::Reconnect => {
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            reconnect::run(client, config, shutdown).await
        }
    }
}

async fn run_service(client: &DefaultClient, config: &RegressionConfig) -> Result<()> {
    let results = service::run_all(client, config).await;
    for result in &results {
        println!("{result}");
        if let Some(error) = &result.error {
            println!("    {error}");
        }
    }

    let summary = Summary::from_results(&results);
    println!("{summary}");
    if !summary.success() {
        std::process::exit(1);
    }
    Ok(())
}

fn websocket_option() -> WebSocketClientOption {
    WebSocketClientOption::builder()
        .event_callback(|event, message| match event {
            WebSocketEvent::ErrorReceived
            | WebSocketEvent::CallbackError
            | WebSocketEvent::ReSubscribeError
            | WebSocketEvent::ClientFail
            | WebSocketEvent::Disconnected => warn!(%event, detail = message, "ws event"),
            _ => info!(%event, detail = message, "ws event"),
        })
        .build()
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
