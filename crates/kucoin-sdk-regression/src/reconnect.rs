/*
[INPUT]:  DefaultClient, RegressionConfig, shutdown token
[OUTPUT]: Many live subscriptions kept across server-side disconnects
[POS]:    Regression runner - reconnect / resubscribe soak
[UPDATE]: When changing the subscribed topic mix
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use kucoin_universal_sdk::{
    DefaultClient, FuturesTickerV1Event, FuturesTickerV2Event, GetAllSymbolsReq, TickerEvent,
    TradeEvent,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::RegressionConfig;
use crate::forever::sleep_or_cancel;
use crate::stats::RunStats;

/// First `limit` symbols of the configured market
pub async fn trade_symbols(
    client: &DefaultClient,
    config: &RegressionConfig,
) -> Result<Vec<String>> {
    let req = GetAllSymbolsReq::builder().market(config.market.as_str()).build();
    let response = client
        .rest_service()
        .spot_service()
        .market_api()
        .get_all_symbols(&req)
        .await
        .context("get all symbols")?;

    Ok(response
        .data
        .into_iter()
        .take(config.max_trade_symbols)
        .map(|info| info.symbol)
        .collect())
}

pub async fn run(
    client: DefaultClient,
    config: RegressionConfig,
    shutdown: CancellationToken,
) -> Result<()> {
    let stats = Arc::new(RunStats::default());
    let symbols = trade_symbols(&client, &config).await?;
    info!(count = symbols.len(), market = %config.market, "trade symbols loaded");

    let spot = client.ws_service().new_spot_public_ws();
    spot.start().await.context("start spot public ws")?;
    let futures = client.ws_service().new_futures_public_ws();
    futures.start().await.context("start futures public ws")?;

    let mut total = 0usize;
    for symbol in &symbols {
        let counter = stats.clone();
        match spot
            .trade(&[symbol.as_str()], move |_, _, _: TradeEvent| {
                counter.record_ws_message();
                Ok(())
            })
            .await
        {
            Ok(_) => total += 1,
            Err(err) => warn!(symbol = %symbol, error = %err, "trade subscribe failed"),
        }
    }

    let counter = stats.clone();
    spot.ticker(&config.symbols, move |_, _, _: TickerEvent| {
        counter.record_ws_message();
        Ok(())
    })
    .await
    .context("subscribe spot ticker")?;
    total += 1;

    let counter = stats.clone();
    futures
        .ticker_v2(&config.futures_symbol, move |_, _, _: FuturesTickerV2Event| {
            counter.record_ws_message();
            Ok(())
        })
        .await
        .context("subscribe futures ticker v2")?;
    total += 1;

    let counter = stats.clone();
    futures
        .ticker_v1(&config.futures_symbol, move |_, _, _: FuturesTickerV1Event| {
            counter.record_ws_message();
            Ok(())
        })
        .await
        .context("subscribe futures ticker v1")?;
    total += 1;

    info!(total, "total subscribe");

    while sleep_or_cancel(&shutdown, config.interval()).await {
        info!(stats = %stats.snapshot(), "reconnect run alive");
    }

    if let Err(err) = spot.stop().await {
        warn!(error = %err, "spot public ws stop failed");
    }
    if let Err(err) = futures.stop().await {
        warn!(error = %err, "futures public ws stop failed");
    }
    info!(stats = %stats.snapshot(), "reconnect run finished");
    Ok(())
}
