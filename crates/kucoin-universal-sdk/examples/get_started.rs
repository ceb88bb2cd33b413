/*
[INPUT]:  Optional API_KEY / API_SECRET / API_PASSPHRASE environment variables
[OUTPUT]: Server time, ticker and (when signed) fee rates
[POS]:    Examples - REST quick start
[UPDATE]: When REST API surface changes
*/

use kucoin_universal_sdk::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let transport = TransportOption::builder()
        .add_interceptor(std::sync::Arc::new(LoggingInterceptor))
        .build();
    let option = ClientOption::builder()
        .key(std::env::var("API_KEY").unwrap_or_default())
        .secret(std::env::var("API_SECRET").unwrap_or_default())
        .passphrase(std::env::var("API_PASSPHRASE").unwrap_or_default())
        .transport_option(transport)
        .build()?;
    let client = DefaultClient::new(option)?;
    let rest = client.rest_service();

    let market = rest.spot_service().market_api();
    let time = market.get_server_time().await?;
    println!("server time: {} (rate limit remaining {})", time.data, time.rate_limit.remaining);

    let ticker = market
        .get_ticker(&GetTickerReq::builder().symbol("BTC-USDT").build())
        .await?;
    println!("BTC-USDT best bid {} / best ask {}", ticker.data.best_bid, ticker.data.best_ask);

    if std::env::var("API_KEY").is_ok() {
        let fee = rest
            .account_service()
            .fee_api()
            .get_basic_fee(&GetBasicFeeReq::builder().currency_type(CurrencyType::Crypto).build())
            .await?;
        println!("maker {} / taker {}", fee.data.maker_fee_rate, fee.data.taker_fee_rate);
    }

    Ok(())
}
