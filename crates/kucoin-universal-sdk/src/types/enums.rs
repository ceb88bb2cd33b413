/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
    #[serde(rename = "GTT")]
    Gtt,
    #[serde(rename = "IOC")]
    Ioc,
    #[serde(rename = "FOK")]
    Fok,
}

/// Self-trade prevention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stp {
    #[serde(rename = "DC")]
    DecreaseAndCancel,
    #[serde(rename = "CO")]
    CancelOldest,
    #[serde(rename = "CN")]
    CancelNewest,
    #[serde(rename = "CB")]
    CancelBoth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarginMode {
    Isolated,
    Cross,
}

/// Fee schedule selector for base fee queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CurrencyType {
    Crypto,
    Fiat,
}

impl From<CurrencyType> for u8 {
    fn from(value: CurrencyType) -> Self {
        match value {
            CurrencyType::Crypto => 0,
            CurrencyType::Fiat => 1,
        }
    }
}

impl TryFrom<u8> for CurrencyType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CurrencyType::Crypto),
            1 => Ok(CurrencyType::Fiat),
            other => Err(format!("unknown currency type {other}")),
        }
    }
}
