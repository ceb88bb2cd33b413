/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust request structs with builders and serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::Serialize;

use super::enums::{CurrencyType, MarginMode, OrderType, Side, Stp, TimeInForce};

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// GET /api/v1/base-fee
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBasicFeeReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_type: Option<CurrencyType>,
}

impl GetBasicFeeReq {
    pub fn builder() -> GetBasicFeeReqBuilder {
        GetBasicFeeReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct GetBasicFeeReqBuilder {
    inner: GetBasicFeeReq,
}

impl GetBasicFeeReqBuilder {
    pub fn currency_type(mut self, currency_type: CurrencyType) -> Self {
        self.inner.currency_type = Some(currency_type);
        self
    }

    pub fn build(self) -> GetBasicFeeReq {
        self.inner
    }
}

/// GET /api/v1/trade-fees
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetSpotActualFeeReq {
    /// Comma separated, up to 10 symbols
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<String>,
}

impl GetSpotActualFeeReq {
    pub fn builder() -> GetSpotActualFeeReqBuilder {
        GetSpotActualFeeReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct GetSpotActualFeeReqBuilder {
    inner: GetSpotActualFeeReq,
}

impl GetSpotActualFeeReqBuilder {
    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = symbols
            .into_iter()
            .map(|symbol| symbol.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.inner.symbols = Some(joined);
        self
    }

    pub fn build(self) -> GetSpotActualFeeReq {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// Earn
// ---------------------------------------------------------------------------

/// GET /api/v1/earn/saving/products
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetSavingsProductsReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl GetSavingsProductsReq {
    pub fn builder() -> GetSavingsProductsReqBuilder {
        GetSavingsProductsReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct GetSavingsProductsReqBuilder {
    inner: GetSavingsProductsReq,
}

impl GetSavingsProductsReqBuilder {
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.inner.currency = Some(currency.into());
        self
    }

    pub fn build(self) -> GetSavingsProductsReq {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// Spot market
// ---------------------------------------------------------------------------

/// Single-symbol market queries (stats, level1 ticker)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SymbolReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl SymbolReq {
    pub fn builder() -> SymbolReqBuilder {
        SymbolReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct SymbolReqBuilder {
    inner: SymbolReq,
}

impl SymbolReqBuilder {
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.inner.symbol = Some(symbol.into());
        self
    }

    pub fn build(self) -> SymbolReq {
        self.inner
    }
}

pub type Get24hrStatsReq = SymbolReq;
pub type GetTickerReq = SymbolReq;

/// GET /api/v2/symbols
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetAllSymbolsReq {
    /// Trading market, e.g. `USDS`, `BTC`, `ALTS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
}

impl GetAllSymbolsReq {
    pub fn builder() -> GetAllSymbolsReqBuilder {
        GetAllSymbolsReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct GetAllSymbolsReqBuilder {
    inner: GetAllSymbolsReq,
}

impl GetAllSymbolsReqBuilder {
    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.inner.market = Some(market.into());
        self
    }

    pub fn build(self) -> GetAllSymbolsReq {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// Spot / margin orders
// ---------------------------------------------------------------------------

/// POST /api/v1/hf/orders and /api/v1/hf/orders/sync
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp: Option<Stp>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iceberg: Option<bool>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_size: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Seconds, GTT orders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_after: Option<i64>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds: Option<Decimal>,
}

impl AddOrderReq {
    pub fn builder() -> AddOrderReqBuilder {
        AddOrderReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct AddOrderReqBuilder {
    inner: AddOrderReq,
}

impl AddOrderReqBuilder {
    pub fn client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.inner.client_oid = Some(client_oid.into());
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.inner.side = Some(side);
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.inner.symbol = Some(symbol.into());
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.inner.order_type = Some(order_type);
        self
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.inner.remark = Some(remark.into());
        self
    }

    pub fn stp(mut self, stp: Stp) -> Self {
        self.inner.stp = Some(stp);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.inner.price = Some(price);
        self
    }

    pub fn size(mut self, size: Decimal) -> Self {
        self.inner.size = Some(size);
        self
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.inner.time_in_force = Some(time_in_force);
        self
    }

    pub fn post_only(mut self, post_only: bool) -> Self {
        self.inner.post_only = Some(post_only);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.inner.hidden = Some(hidden);
        self
    }

    pub fn iceberg(mut self, iceberg: bool) -> Self {
        self.inner.iceberg = Some(iceberg);
        self
    }

    pub fn visible_size(mut self, visible_size: Decimal) -> Self {
        self.inner.visible_size = Some(visible_size);
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.inner.tags = Some(tags.into());
        self
    }

    pub fn cancel_after(mut self, seconds: i64) -> Self {
        self.inner.cancel_after = Some(seconds);
        self
    }

    pub fn funds(mut self, funds: Decimal) -> Self {
        self.inner.funds = Some(funds);
        self
    }

    pub fn build(self) -> AddOrderReq {
        self.inner
    }
}

pub type AddOrderSyncReq = AddOrderReq;

/// Order id path variable plus symbol query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl OrderIdReq {
    pub fn builder() -> OrderIdReqBuilder {
        OrderIdReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct OrderIdReqBuilder {
    inner: OrderIdReq,
}

impl OrderIdReqBuilder {
    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.inner.order_id = Some(order_id.into());
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.inner.symbol = Some(symbol.into());
        self
    }

    pub fn build(self) -> OrderIdReq {
        self.inner
    }
}

pub type GetOrderByOrderIdReq = OrderIdReq;
pub type CancelOrderByOrderIdReq = OrderIdReq;

/// POST /api/v3/hf/margin/order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAddOrderReq {
    #[serde(flatten)]
    pub order: AddOrderReq,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_isolated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_borrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_repay: Option<bool>,
}

impl MarginAddOrderReq {
    pub fn builder() -> MarginAddOrderReqBuilder {
        MarginAddOrderReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct MarginAddOrderReqBuilder {
    inner: MarginAddOrderReq,
}

impl MarginAddOrderReqBuilder {
    /// Common order fields
    pub fn order(mut self, order: AddOrderReq) -> Self {
        self.inner.order = order;
        self
    }

    pub fn is_isolated(mut self, is_isolated: bool) -> Self {
        self.inner.is_isolated = Some(is_isolated);
        self
    }

    pub fn auto_borrow(mut self, auto_borrow: bool) -> Self {
        self.inner.auto_borrow = Some(auto_borrow);
        self
    }

    pub fn auto_repay(mut self, auto_repay: bool) -> Self {
        self.inner.auto_repay = Some(auto_repay);
        self
    }

    pub fn build(self) -> MarginAddOrderReq {
        self.inner
    }
}

// ---------------------------------------------------------------------------
// Futures
// ---------------------------------------------------------------------------

/// POST /api/v1/orders (futures domain)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesAddOrderReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<i32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_mode: Option<MarginMode>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Number of contracts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stp: Option<Stp>,
}

impl FuturesAddOrderReq {
    pub fn builder() -> FuturesAddOrderReqBuilder {
        FuturesAddOrderReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct FuturesAddOrderReqBuilder {
    inner: FuturesAddOrderReq,
}

impl FuturesAddOrderReqBuilder {
    pub fn client_oid(mut self, client_oid: impl Into<String>) -> Self {
        self.inner.client_oid = Some(client_oid.into());
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.inner.side = Some(side);
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.inner.symbol = Some(symbol.into());
        self
    }

    pub fn leverage(mut self, leverage: i32) -> Self {
        self.inner.leverage = Some(leverage);
        self
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.inner.order_type = Some(order_type);
        self
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.inner.remark = Some(remark.into());
        self
    }

    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.inner.reduce_only = Some(reduce_only);
        self
    }

    pub fn close_order(mut self, close_order: bool) -> Self {
        self.inner.close_order = Some(close_order);
        self
    }

    pub fn margin_mode(mut self, margin_mode: MarginMode) -> Self {
        self.inner.margin_mode = Some(margin_mode);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.inner.price = Some(price);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.inner.size = Some(size);
        self
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.inner.time_in_force = Some(time_in_force);
        self
    }

    pub fn post_only(mut self, post_only: bool) -> Self {
        self.inner.post_only = Some(post_only);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.inner.hidden = Some(hidden);
        self
    }

    pub fn stp(mut self, stp: Stp) -> Self {
        self.inner.stp = Some(stp);
        self
    }

    pub fn build(self) -> FuturesAddOrderReq {
        self.inner
    }
}

/// Futures order addressed by id (futures domain)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderByIdReq {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl CancelOrderByIdReq {
    pub fn builder() -> CancelOrderByIdReqBuilder {
        CancelOrderByIdReqBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct CancelOrderByIdReqBuilder {
    inner: CancelOrderByIdReq,
}

impl CancelOrderByIdReqBuilder {
    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.inner.order_id = Some(order_id.into());
        self
    }

    pub fn build(self) -> CancelOrderByIdReq {
        self.inner
    }
}

pub type FuturesGetOrderByOrderIdReq = CancelOrderByIdReq;
