/*
[INPUT]:  DefaultClient with credentials
[OUTPUT]: Pass/fail result per REST regression case and a summary
[POS]:    Regression runner - REST smoke run across every service
[UPDATE]: When adding REST cases or changing acceptance checks
*/

use std::future::Future;

use anyhow::{Context, Result, ensure};
use kucoin_universal_sdk::config::RESULT_CODE_SUCCESS;
use kucoin_universal_sdk::{
    AddOrderReq, CancelOrderByIdReq, CurrencyType, DefaultClient, FuturesAddOrderReq,
    GetBasicFeeReq, GetSavingsProductsReq, MarginAddOrderReq, MarginMode, OrderIdReq, OrderType,
    RestResponse, Side, SymbolReq,
};
use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::RegressionConfig;

/// Outcome of one regression case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub name: &'static str,
    pub error: Option<String>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

impl std::fmt::Display for CaseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.passed() {
            write!(f, "{} - OK", self.name)
        } else {
            write!(f, "{} - FAILED", self.name)
        }
    }
}

/// Totals over a regression run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_results(results: &[CaseResult]) -> Self {
        let passed = results.iter().filter(|result| result.passed()).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total: {}, passed: {}, failed: {}",
            self.total, self.passed, self.failed
        )
    }
}

/// Common acceptance check: success code and rate-limit headers present
pub fn check_response<T>(response: &RestResponse<T>) -> Result<()> {
    ensure!(
        response.code == RESULT_CODE_SUCCESS,
        "unexpected code {}",
        response.code
    );
    ensure!(response.rate_limit.is_present(), "rate limit headers missing");
    Ok(())
}

async fn run_case<F>(name: &'static str, case: F) -> CaseResult
where
    F: Future<Output = Result<()>>,
{
    match case.await {
        Ok(()) => {
            info!(case = name, "case passed");
            CaseResult { name, error: None }
        }
        Err(err) => {
            error!(case = name, error = %format!("{err:#}"), "case failed");
            CaseResult {
                name,
                error: Some(format!("{err:#}")),
            }
        }
    }
}

/// Run every REST case in order
pub async fn run_all(client: &DefaultClient, config: &RegressionConfig) -> Vec<CaseResult> {
    vec![
        run_case("account", account_case(client)).await,
        run_case("earn", earn_case(client)).await,
        run_case("margin", margin_case(client, config)).await,
        run_case("spot", spot_case(client, config)).await,
        run_case("futures", futures_case(client, config)).await,
    ]
}

fn first_symbol(config: &RegressionConfig) -> &str {
    config.symbols.first().map(String::as_str).unwrap_or("BTC-USDT")
}

fn limit_buy(symbol: &str) -> AddOrderReq {
    AddOrderReq::builder()
        .client_oid(Uuid::new_v4().to_string())
        .side(Side::Buy)
        .symbol(symbol)
        .order_type(OrderType::Limit)
        .remark("sdk_test")
        .price(Decimal::from(10000))
        .size(Decimal::new(1, 3))
        .build()
}

pub async fn account_case(client: &DefaultClient) -> Result<()> {
    let req = GetBasicFeeReq::builder()
        .currency_type(CurrencyType::Crypto)
        .build();
    let response = client
        .rest_service()
        .account_service()
        .fee_api()
        .get_basic_fee(&req)
        .await
        .context("get basic fee")?;
    check_response(&response)?;
    ensure!(
        !response.data.maker_fee_rate.is_sign_negative()
            && !response.data.taker_fee_rate.is_sign_negative(),
        "negative basic fee rate"
    );
    info!(
        maker = %response.data.maker_fee_rate,
        taker = %response.data.taker_fee_rate,
        "basic fee"
    );
    Ok(())
}

pub async fn earn_case(client: &DefaultClient) -> Result<()> {
    let req = GetSavingsProductsReq::builder().currency("USDT").build();
    let response = client
        .rest_service()
        .earn_service()
        .earn_api()
        .get_savings_products(&req)
        .await
        .context("get savings products")?;
    check_response(&response)?;
    ensure!(!response.data.is_empty(), "no USDT savings products");
    info!(products = response.data.len(), "savings products");
    Ok(())
}

pub async fn margin_case(client: &DefaultClient, config: &RegressionConfig) -> Result<()> {
    let symbol = first_symbol(config);
    let api = client.rest_service().margin_service().order_api();

    let req = MarginAddOrderReq::builder()
        .order(limit_buy(symbol))
        .is_isolated(true)
        .auto_borrow(true)
        .auto_repay(true)
        .build();
    let added = api.add_order(&req).await.context("margin add order")?;
    check_response(&added)?;
    ensure!(!added.data.order_id.is_empty(), "margin order id is empty");
    info!(order_id = %added.data.order_id, "margin order placed");

    let by_id = OrderIdReq::builder()
        .order_id(added.data.order_id.as_str())
        .symbol(symbol)
        .build();
    let queried = api
        .get_order_by_order_id(&by_id)
        .await
        .context("margin query order")?;
    check_response(&queried)?;
    ensure!(!queried.data.symbol.is_empty(), "margin order symbol is empty");

    let cancelled = api
        .cancel_order_by_order_id(&by_id)
        .await
        .context("margin cancel order")?;
    check_response(&cancelled)?;
    ensure!(
        !cancelled.data.order_id.is_empty(),
        "margin cancelled order id is empty"
    );
    Ok(())
}

pub async fn spot_case(client: &DefaultClient, config: &RegressionConfig) -> Result<()> {
    let symbol = first_symbol(config);
    let spot = client.rest_service().spot_service();

    let stats = spot
        .market_api()
        .get_24hr_stats(&SymbolReq::builder().symbol(symbol).build())
        .await
        .context("get 24hr stats")?;
    check_response(&stats)?;
    let last = stats.data.last.as_deref().unwrap_or_default();
    ensure!(!last.is_empty(), "24hr stats missing last price");
    info!(symbol = %stats.data.symbol, last, "24hr stats");

    let added = spot
        .order_api()
        .add_order_sync(&limit_buy(symbol))
        .await
        .context("spot add order sync")?;
    check_response(&added)?;
    ensure!(!added.data.order_id.is_empty(), "spot order id is empty");
    ensure!(added.data.order_time > 0, "spot order time is not set");
    info!(order_id = %added.data.order_id, status = %added.data.status, "spot order placed");

    let by_id = OrderIdReq::builder()
        .order_id(added.data.order_id.as_str())
        .symbol(symbol)
        .build();
    let queried = spot
        .order_api()
        .get_order_by_order_id(&by_id)
        .await
        .context("spot query order")?;
    check_response(&queried)?;
    ensure!(!queried.data.symbol.is_empty(), "spot order symbol is empty");

    let cancelled = spot
        .order_api()
        .cancel_order_by_order_id(&by_id)
        .await
        .context("spot cancel order")?;
    check_response(&cancelled)?;
    ensure!(
        !cancelled.data.order_id.is_empty(),
        "spot cancelled order id is empty"
    );
    Ok(())
}

pub async fn futures_case(client: &DefaultClient, config: &RegressionConfig) -> Result<()> {
    let futures = client.rest_service().futures_service();

    let stats = futures
        .market_api()
        .get_24hr_stats()
        .await
        .context("get futures 24hr stats")?;
    check_response(&stats)?;
    info!(turnover = stats.data.turnover_of_24h, "futures 24hr stats");

    let api = futures.order_api();
    let req = FuturesAddOrderReq::builder()
        .client_oid(Uuid::new_v4().to_string())
        .side(Side::Buy)
        .symbol(config.futures_symbol.as_str())
        .leverage(1)
        .order_type(OrderType::Limit)
        .remark("sdk_test")
        .margin_mode(MarginMode::Cross)
        .price(Decimal::ONE)
        .size(1)
        .build();
    let added = api.add_order(&req).await.context("futures add order")?;
    check_response(&added)?;
    ensure!(!added.data.order_id.is_empty(), "futures order id is empty");
    info!(order_id = %added.data.order_id, "futures order placed");

    let by_id = CancelOrderByIdReq::builder()
        .order_id(added.data.order_id.as_str())
        .build();
    let queried = api
        .get_order_by_order_id(&by_id)
        .await
        .context("futures query order")?;
    check_response(&queried)?;
    ensure!(!queried.data.symbol.is_empty(), "futures order symbol is empty");

    let cancelled = api
        .cancel_order_by_id(&by_id)
        .await
        .context("futures cancel order")?;
    check_response(&cancelled)?;
    ensure!(
        cancelled.data.cancelled_order_ids.contains(&added.data.order_id),
        "futures order {} not in cancelled ids",
        added.data.order_id
    );
    Ok(())
}
