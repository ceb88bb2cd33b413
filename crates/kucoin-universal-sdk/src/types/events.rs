/*
[INPUT]:  `data` payloads of WebSocket `message` frames
[OUTPUT]: Typed push events handed to subscription callbacks
[POS]:    Data layer - WebSocket payload definitions
[UPDATE]: When a topic payload changes or a topic is added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::Side;

/// One order book level: price and size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel(
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
);

/// Futures level: size is a contract count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractLevel(#[serde(with = "rust_decimal::serde::str")] pub Decimal, pub i64);

// Spot public

/// `/market/ticker:{symbols}` and `/market/ticker:all`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerEvent {
    pub sequence: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_ask: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_ask_size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_bid: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_bid_size: Decimal,
    #[serde(alias = "Time")]
    pub time: i64,
}

/// `/market/match:{symbols}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    pub maker_order_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub sequence: String,
    pub side: Side,
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    pub symbol: String,
    pub taker_order_id: String,
    /// Nanoseconds, sent as a string
    pub time: String,
    pub trade_id: String,
    #[serde(rename = "type")]
    pub trade_type: String,
}

/// `/spotMarket/level2Depth5:{symbols}` and `/spotMarket/level2Depth50:{symbols}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookDepthEvent {
    pub asks: Vec<PriceLevel>,
    pub bids: Vec<PriceLevel>,
    pub timestamp: i64,
}

// Margin public

/// `/indicator/index:{symbols}` and `/indicator/markPrice:{symbols}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPriceEvent {
    pub symbol: String,
    pub granularity: i64,
    pub timestamp: i64,
    pub value: f64,
}

// Futures public

/// `/contractMarket/ticker:{symbol}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesTickerV1Event {
    pub symbol: String,
    pub sequence: i64,
    pub side: Side,
    pub size: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub best_bid_size: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_bid_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_ask_price: Decimal,
    pub trade_id: String,
    pub best_ask_size: i64,
    pub ts: i64,
}

/// `/contractMarket/tickerV2:{symbol}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesTickerV2Event {
    pub symbol: String,
    pub sequence: i64,
    pub best_bid_size: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_bid_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_ask_price: Decimal,
    pub best_ask_size: i64,
    pub ts: i64,
}

/// `/contractMarket/execution:{symbol}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesExecutionEvent {
    pub symbol: String,
    pub sequence: i64,
    pub side: Side,
    pub size: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub taker_order_id: String,
    pub maker_order_id: String,
    pub trade_id: String,
    pub ts: i64,
}

/// `/contractMarket/level2Depth50:{symbol}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesOrderbookDepthEvent {
    pub bids: Vec<ContractLevel>,
    pub asks: Vec<ContractLevel>,
    pub sequence: i64,
    pub timestamp: i64,
    pub ts: i64,
}

// Spot private

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationContext {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// `/account/balance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEvent {
    pub account_id: String,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub hold: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub available_change: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub hold_change: Decimal,
    #[serde(default)]
    pub relation_context: Option<RelationContext>,
    pub relation_event: String,
    pub relation_event_id: String,
    pub time: String,
}

/// `/spotMarket/tradeOrdersV2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderV2Event {
    #[serde(default)]
    pub client_oid: Option<String>,
    pub order_id: String,
    pub order_time: i64,
    pub order_type: String,
    #[serde(default)]
    pub origin_size: Option<String>,
    pub side: Side,
    pub status: String,
    pub symbol: String,
    pub ts: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub canceled_size: Option<String>,
    #[serde(default)]
    pub filled_size: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub remain_size: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_futures_depth_levels() {
        let raw = r#"{"bids":[["89778.6",1534],["89778.2",54]],"sequence":1709294490099,
            "timestamp":1731680249700,"ts":1731680249700,"asks":[["89778.7",854],["89779.2",4]]}"#;
        let event: FuturesOrderbookDepthEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.bids.len(), 2);
        assert_eq!(event.asks[0].1, 854);
        assert_eq!(event.bids[0].0, "89778.6".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_ticker_accepts_capitalized_time() {
        let raw = r#"{"sequence":"1545896668986","price":"0.08","size":"0.011","bestAsk":"0.08",
            "bestAskSize":"0.18","bestBid":"0.049","bestBidSize":"0.036","Time":1704873323416}"#;
        let event: TickerEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.time, 1_704_873_323_416);
    }

    #[test]
    fn test_order_v2_optional_fields() {
        let raw = r#"{"clientOid":"5c52e11203aa677f33e493fc","orderId":"6720da3fa30a360007f5f832",
            "orderTime":1730206271588,"orderType":"market","originSize":"0.00001","side":"buy",
            "status":"new","symbol":"BTC-USDT","ts":1730206271616000000,"type":"received"}"#;
        let event: OrderV2Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event_type, "received");
        assert!(event.price.is_none());
    }

    #[test]
    fn test_balance_event() {
        let raw = r#"{"accountId":"548674591753","currency":"USDT","total":"21.133773386762",
            "available":"20.132773386762","hold":"1.001","availableChange":"-0.5005",
            "holdChange":"0.5005","relationContext":{"symbol":"BTC-USDT","orderId":"6721d0632db25b0007071fdc"},
            "relationEvent":"trade.hold","relationEventId":"354689988084000","time":"1730269283892"}"#;
        let event: BalanceEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.hold, "1.001".parse::<Decimal>().unwrap());
        assert_eq!(
            event.relation_context.and_then(|ctx| ctx.symbol).as_deref(),
            Some("BTC-USDT")
        );
    }
}
