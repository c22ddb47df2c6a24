//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 거래소에서 조회한 캔들스틱 데이터 타입을 정의합니다.

use crate::types::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들스틱 데이터.
///
/// 하나의 시간 버킷에 대한 가격/거래량 바입니다. 조회 이후에는
/// 변경되지 않습니다. 심볼과 간격은 캔들 자체가 아니라 캐시 키가
/// 가지고 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량 (기준 자산 단위)
    pub volume: Quantity,
    /// 캔들 종료 시간
    pub close_time: DateTime<Utc>,
    /// 거래대금 (호가 자산 단위)
    pub quote_volume: Decimal,
    /// 체결 건수
    pub num_trades: u32,
    /// 테이커 매수 거래량 (기준 자산)
    pub taker_buy_base_volume: Decimal,
    /// 테이커 매수 거래대금 (호가 자산)
    pub taker_buy_quote_volume: Decimal,
}

impl Kline {
    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 시가 대비 종가 변동률(%)을 반환합니다.
    pub fn change_percent(&self) -> Decimal {
        if self.open.is_zero() {
            return Decimal::ZERO;
        }
        (self.close - self.open) / self.open * Decimal::from(100)
    }
}
