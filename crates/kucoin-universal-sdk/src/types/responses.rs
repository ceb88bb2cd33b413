/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with deserialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{MarginMode, OrderType, Side};

// Account

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBasicFeeResp {
    #[serde(with = "rust_decimal::serde::str")]
    pub taker_fee_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub maker_fee_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolFee {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub taker_fee_rate: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub maker_fee_rate: Decimal,
}

pub type GetSpotActualFeeResp = Vec<SymbolFee>;

// Earn

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProduct {
    pub id: String,
    pub currency: String,
    pub category: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub precision: i32,
    pub product_upper_limit: String,
    #[serde(default)]
    pub product_remain_amount: Option<String>,
    pub user_upper_limit: String,
    pub user_lower_limit: String,
    pub redeem_period: i32,
    #[serde(default)]
    pub lock_start_time: Option<i64>,
    #[serde(default)]
    pub lock_end_time: Option<i64>,
    #[serde(default)]
    pub apply_start_time: Option<i64>,
    #[serde(default)]
    pub apply_end_time: Option<i64>,
    pub return_rate: String,
    pub income_currency: String,
    pub early_redeem_supported: i32,
    pub status: String,
    pub redeem_type: String,
    pub income_release_type: String,
    #[serde(default)]
    pub interest_date: Option<i64>,
    pub duration: i32,
    pub new_user_only: i32,
}

pub type GetSavingsProductsResp = Vec<SavingsProduct>;

// Spot market

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub fee_currency: String,
    pub market: String,
    pub base_min_size: String,
    pub quote_min_size: String,
    pub base_max_size: String,
    pub quote_max_size: String,
    pub base_increment: String,
    pub quote_increment: String,
    pub price_increment: String,
    pub price_limit_rate: String,
    #[serde(default)]
    pub min_funds: Option<String>,
    pub is_margin_enabled: bool,
    pub enable_trading: bool,
    #[serde(default)]
    pub fee_category: Option<i32>,
    #[serde(default)]
    pub maker_fee_coefficient: Option<String>,
    #[serde(default)]
    pub taker_fee_coefficient: Option<String>,
    #[serde(default)]
    pub st: Option<bool>,
    #[serde(default)]
    pub callauction_is_enabled: Option<bool>,
}

pub type GetAllSymbolsResp = Vec<SymbolInfo>;

/// Level1 best bid/ask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTickerResp {
    pub time: i64,
    pub sequence: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_bid: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_bid_size: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_ask: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_ask_size: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Get24hrStatsResp {
    pub time: i64,
    pub symbol: String,
    #[serde(default)]
    pub buy: Option<String>,
    #[serde(default)]
    pub sell: Option<String>,
    #[serde(default)]
    pub change_rate: Option<String>,
    #[serde(default)]
    pub change_price: Option<String>,
    #[serde(default)]
    pub high: Option<String>,
    #[serde(default)]
    pub low: Option<String>,
    #[serde(default)]
    pub vol: Option<String>,
    #[serde(default)]
    pub vol_value: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub average_price: Option<String>,
    #[serde(default)]
    pub taker_fee_rate: Option<String>,
    #[serde(default)]
    pub maker_fee_rate: Option<String>,
    #[serde(default)]
    pub taker_coefficient: Option<String>,
    #[serde(default)]
    pub maker_coefficient: Option<String>,
}

/// Server time in milliseconds
pub type GetServerTimeResp = i64;

// Spot / margin orders

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderResp {
    pub order_id: String,
    #[serde(default)]
    pub client_oid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderSyncResp {
    pub order_id: String,
    #[serde(default)]
    pub client_oid: Option<String>,
    pub order_time: i64,
    #[serde(default)]
    pub origin_size: Option<String>,
    #[serde(default)]
    pub deal_size: Option<String>,
    #[serde(default)]
    pub remain_size: Option<String>,
    #[serde(default)]
    pub canceled_size: Option<String>,
    pub status: String,
    #[serde(default)]
    pub match_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderByOrderIdResp {
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: String,
    #[serde(default)]
    pub client_oid: Option<String>,
    pub symbol: String,
    #[serde(default)]
    pub op_type: Option<String>,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub funds: Option<String>,
    #[serde(default)]
    pub deal_size: Option<String>,
    #[serde(default)]
    pub deal_funds: Option<String>,
    #[serde(default)]
    pub remain_size: Option<String>,
    #[serde(default)]
    pub remain_funds: Option<String>,
    #[serde(default)]
    pub cancelled_size: Option<String>,
    #[serde(default)]
    pub cancelled_funds: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub stp: Option<String>,
    #[serde(default)]
    pub time_in_force: Option<String>,
    #[serde(default)]
    pub post_only: Option<bool>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub iceberg: Option<bool>,
    #[serde(default)]
    pub visible_size: Option<String>,
    #[serde(default)]
    pub cancel_after: Option<i64>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub cancel_exist: Option<bool>,
    #[serde(default)]
    pub trade_type: Option<String>,
    #[serde(default)]
    pub in_order_book: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub tax: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub last_updated_at: Option<i64>,
}

pub type GetOrderByOrderIdResp = OrderDetail;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAddOrderResp {
    pub order_id: String,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub borrow_size: Option<String>,
    #[serde(default)]
    pub loan_apply_id: Option<String>,
}

// Futures

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesTickerResp {
    pub sequence: i64,
    pub symbol: String,
    pub side: Side,
    pub size: i64,
    pub trade_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_bid_price: Decimal,
    pub best_bid_size: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub best_ask_price: Decimal,
    pub best_ask_size: i64,
    /// Nanoseconds
    pub ts: i64,
}

/// 24h turnover across every futures contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Futures24hrStatsResp {
    #[serde(rename = "turnoverOf24h")]
    pub turnover_of_24h: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesAddOrderResp {
    pub order_id: String,
    #[serde(default)]
    pub client_oid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderByIdResp {
    pub cancelled_order_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesOrderDetail {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: Side,
    #[serde(default)]
    pub price: Option<String>,
    pub size: i64,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub deal_value: Option<String>,
    #[serde(default)]
    pub deal_size: Option<i64>,
    #[serde(default)]
    pub time_in_force: Option<String>,
    #[serde(default)]
    pub post_only: Option<bool>,
    #[serde(default)]
    pub leverage: Option<String>,
    #[serde(default)]
    pub client_oid: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub cancel_exist: Option<bool>,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
    /// Nanoseconds
    #[serde(default)]
    pub order_time: Option<i64>,
    #[serde(default)]
    pub settle_currency: Option<String>,
    #[serde(default)]
    pub margin_mode: Option<MarginMode>,
    #[serde(default)]
    pub avg_deal_price: Option<String>,
    #[serde(default)]
    pub filled_size: Option<i64>,
    #[serde(default)]
    pub filled_value: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reduce_only: Option<bool>,
}

pub type FuturesGetOrderByOrderIdResp = FuturesOrderDetail;
