/*
[INPUT]:  Public spot and futures market streams
[OUTPUT]: Ticker updates printed for a few seconds
[POS]:    Examples - WebSocket stream handling
[UPDATE]: When WebSocket API changes
*/

use std::time::Duration;

use kucoin_universal_sdk::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ws_option = WebSocketClientOption::builder()
        .event_callback(|event, message| println!("event {event}: {message}"))
        .build();
    let option = ClientOption::builder()
        .websocket_client_option(ws_option)
        .build()?;
    let client = DefaultClient::new(option)?;

    let spot = client.ws_service().new_spot_public_ws();
    spot.start().await?;
    let ticker_id = spot
        .ticker(&["BTC-USDT", "ETH-USDT"], |topic, _, event: TickerEvent| {
            println!("{topic}: {} @ {}", event.size, event.price);
            Ok(())
        })
        .await?;

    let futures = client.ws_service().new_futures_public_ws();
    futures.start().await?;
    let v2_id = futures
        .ticker_v2("XBTUSDTM", |_, _, event: FuturesTickerV2Event| {
            println!("{} bid {} ask {}", event.symbol, event.best_bid_price, event.best_ask_price);
            Ok(())
        })
        .await?;

    tokio::time::sleep(Duration::from_secs(10)).await;

    spot.unsubscribe(&ticker_id).await?;
    futures.unsubscribe(&v2_id).await?;
    spot.stop().await?;
    futures.stop().await?;
    Ok(())
}
