//! 거래 상품(인스트루먼트) 정의.
//!
//! 이 모듈은 거래소 티커 형식의 상품 식별자를 정의합니다.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 거래 가능한 상품을 나타내는 거래소 티커.
///
/// Binance 현물 티커 형식을 그대로 사용합니다 (예: "BTCUSDT", "ETHUSDT").
/// 프로세스 전역에서 정확히 하나의 상품이 선택됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instrument(String);

impl Instrument {
    /// 새 인스트루먼트를 생성합니다. 티커는 대문자로 정규화됩니다.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into().trim().to_uppercase())
    }

    /// 거래소 티커 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Instrument {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Parse("empty instrument symbol".to_string()));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::Parse(format!(
                "invalid instrument symbol: {}",
                s
            )));
        }
        Ok(Self::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_normalization() {
        let instrument = Instrument::new("btcusdt");
        assert_eq!(instrument.as_str(), "BTCUSDT");
        assert_eq!(instrument.to_string(), "BTCUSDT");
    }

    #[test]
    fn test_instrument_from_str() {
        let instrument: Instrument = "ethusdt".parse().unwrap();
        assert_eq!(instrument.as_str(), "ETHUSDT");

        assert!("".parse::<Instrument>().is_err());
        assert!("BTC/USDT".parse::<Instrument>().is_err());
    }
}
