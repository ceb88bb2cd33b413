/*
[INPUT]:  DefaultClient, RegressionConfig, shutdown token
[OUTPUT]: Long-running REST polling and WebSocket churn with periodic stats
[POS]:    Regression runner - soak test until Ctrl-C
[UPDATE]: When changing soak loops or their pacing
*/

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kucoin_universal_sdk::{DefaultClient, GetAllSymbolsReq, OrderbookDepthEvent, TickerEvent};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::RegressionConfig;
use crate::stats::RunStats;

/// Sleep for `duration`; false when shutdown fired first
pub async fn sleep_or_cancel(shutdown: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Run every soak loop until `shutdown` is cancelled
pub async fn run(
    client: DefaultClient,
    config: RegressionConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    let stats = Arc::new(RunStats::default());
    let client = Arc::new(client);
    let config = Arc::new(config);

    let handles: Vec<(&str, JoinHandle<()>)> = vec![
        (
            "symbols",
            tokio::spawn(poll_symbols(
                client.clone(),
                config.clone(),
                stats.clone(),
                shutdown.clone(),
            )),
        ),
        (
            "orderbook",
            tokio::spawn(long_lived_orderbook(
                client.clone(),
                config.clone(),
                stats.clone(),
                shutdown.clone(),
            )),
        ),
        (
            "ws-cycle",
            tokio::spawn(ws_cycle(
                client.clone(),
                config.clone(),
                stats.clone(),
                shutdown.clone(),
            )),
        ),
        (
            "stats",
            tokio::spawn(report_stats(config.clone(), stats.clone(), shutdown.clone())),
        ),
    ];

    info!(loops = handles.len(), "forever run started");
    shutdown.cancelled().await;

    for (name, handle) in handles {
        if let Err(err) = handle.await {
            warn!(task = name, error = %err, "loop ended abnormally");
        }
    }
    info!(stats = %stats.snapshot(), "forever run finished");
    Ok(())
}

async fn poll_symbols(
    client: Arc<DefaultClient>,
    config: Arc<RegressionConfig>,
    stats: Arc<RunStats>,
    shutdown: CancellationToken,
) {
    let req = GetAllSymbolsReq::builder().market(config.market.as_str()).build();
    let market = client.rest_service().spot_service().market_api();

    loop {
        match market.get_all_symbols(&req).await {
            Ok(response) => stats.record_symbols(response.data.len()),
            Err(err) => {
                stats.record_rest_error();
                warn!(error = %err, "get all symbols failed");
            }
        }
        if !sleep_or_cancel(&shutdown, config.interval()).await {
            break;
        }
    }
}

async fn long_lived_orderbook(
    client: Arc<DefaultClient>,
    config: Arc<RegressionConfig>,
    stats: Arc<RunStats>,
    shutdown: CancellationToken,
) {
    let ws = client.ws_service().new_spot_public_ws();
    if let Err(err) = subscribe_orderbook(&ws, &config, stats.clone()).await {
        stats.record_ws_error();
        warn!(error = %format!("{err:#}"), "order book stream unavailable");
    }

    shutdown.cancelled().await;
    if let Err(err) = ws.stop().await {
        warn!(error = %err, "order book stream stop failed");
    }
}

async fn subscribe_orderbook(
    ws: &kucoin_universal_sdk::SpotPublicWs,
    config: &RegressionConfig,
    stats: Arc<RunStats>,
) -> Result<()> {
    ws.start().await.context("start order book stream")?;
    let id = ws
        .orderbook_level50(&config.symbols, move |_, _, _: OrderbookDepthEvent| {
            stats.record_ws_message();
            Ok(())
        })
        .await
        .context("subscribe level50 order book")?;
    info!(id = %id, "order book stream subscribed");
    Ok(())
}

async fn ws_cycle(
    client: Arc<DefaultClient>,
    config: Arc<RegressionConfig>,
    stats: Arc<RunStats>,
    shutdown: CancellationToken,
) {
    loop {
        if let Err(err) = ws_cycle_once(&client, &config, &shutdown).await {
            stats.record_ws_error();
            warn!(error = %format!("{err:#}"), "ws cycle failed");
        }
        stats.record_ws_cycle();

        if !sleep_or_cancel(&shutdown, config.interval()).await {
            break;
        }
    }
}

async fn ws_cycle_once(
    client: &DefaultClient,
    config: &RegressionConfig,
    shutdown: &CancellationToken,
) -> Result<()> {
    let ws = client.ws_service().new_spot_public_ws();
    ws.start().await.context("start ws")?;

    let subscribed = ws
        .ticker(&config.symbols, |_, _, _: TickerEvent| Ok(()))
        .await
        .context("subscribe ticker");

    let outcome = match subscribed {
        Ok(id) => {
            sleep_or_cancel(shutdown, config.interval()).await;
            ws.unsubscribe(&id).await.context("unsubscribe ticker")
        }
        Err(err) => Err(err),
    };

    ws.stop().await.context("stop ws")?;
    outcome
}

async fn report_stats(
    config: Arc<RegressionConfig>,
    stats: Arc<RunStats>,
    shutdown: CancellationToken,
) {
    while sleep_or_cancel(&shutdown, config.interval()).await {
        info!(stats = %stats.snapshot(), "forever stats");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sleep_or_cancel() {
        let shutdown = CancellationToken::new();
        assert!(sleep_or_cancel(&shutdown, Duration::from_millis(1)).await);

        shutdown.cancel();
        assert!(!sleep_or_cancel(&shutdown, Duration::from_secs(60)).await);
    }
}
