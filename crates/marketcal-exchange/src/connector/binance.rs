//! Binance 시장 데이터 커넥터.
//!
//! Binance Spot 공개 REST API의 캔들 조회 구현.
//! 인증이 필요 없는 엔드포인트만 사용합니다.

#![allow(dead_code)] // API 응답 필드 전체 매핑 (일부만 사용)

use crate::traits::{ExchangeResult, MarketDataSource};
use crate::ExchangeError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marketcal_core::{BinanceSettings, Instrument, Kline, Timeframe};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, error};

/// 조회당 기본 캔들 수.
const DEFAULT_LIMIT: u32 = 500;

// ============================================================================
// 설정
// ============================================================================

/// Binance 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST 기본 URL (테스트에서 mock 서버로 교체)
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl BinanceConfig {
    /// 기본 URL을 설정합니다.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 애플리케이션 설정 섹션에서 생성합니다.
    pub fn from_settings(settings: &BinanceSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }
}

// ============================================================================
// 응답 타입
// ============================================================================

/// Binance 에러 응답 본문.
#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i32,
    msg: String,
}

/// Binance 캔들 응답 (위치 기반 12원소 배열).
#[derive(Debug, Deserialize)]
struct BinanceKline(
    i64,    // 0: Open time
    String, // 1: Open
    String, // 2: High
    String, // 3: Low
    String, // 4: Close
    String, // 5: Volume
    i64,    // 6: Close time
    String, // 7: Quote asset volume
    i64,    // 8: Number of trades
    String, // 9: Taker buy base asset volume
    String, // 10: Taker buy quote asset volume
    String, // 11: Ignore
);

// ============================================================================
// 클라이언트
// ============================================================================

/// Binance 공개 시장 데이터 클라이언트.
///
/// 호출당 아웃바운드 GET 하나. 내부 캐시 없음, 재시도 없음.
pub struct BinanceMarketData {
    config: BinanceConfig,
    client: Client,
}

impl BinanceMarketData {
    /// 새 클라이언트를 생성합니다.
    pub fn new(config: BinanceConfig) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { config, client })
    }

    /// 공개 API 요청 (인증 불필요).
    async fn public_get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ExchangeResult<T> {
        let url = format!("{}{}", self.config.base_url, endpoint);

        debug!("GET {} params={:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;

        self.handle_response(response).await
    }

    /// 상태 코드와 본문을 검사하고 역직렬화합니다.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> ExchangeResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                error!("Failed to parse response: {} - Body: {}", e, body);
                ExchangeError::ParseError(e.to_string())
            })
        } else {
            // 에러 응답 파싱 시도
            if let Ok(error) = serde_json::from_str::<BinanceError>(&body) {
                Err(Self::map_error_code(error.code, &error.msg))
            } else {
                Err(ExchangeError::ApiError {
                    code: status.as_u16() as i32,
                    message: body,
                })
            }
        }
    }

    /// Binance 에러 코드를 ExchangeError로 매핑.
    fn map_error_code(code: i32, msg: &str) -> ExchangeError {
        match code {
            -1003 => ExchangeError::RateLimited,
            _ => ExchangeError::ApiError {
                code,
                message: msg.to_string(),
            },
        }
    }

    /// 문자열에서 Decimal 파싱.
    fn parse_decimal(s: &str) -> Decimal {
        s.parse().unwrap_or(Decimal::ZERO)
    }

    /// 위치 기반 응답을 Kline으로 변환.
    fn to_kline(k: BinanceKline) -> Kline {
        Kline {
            open_time: DateTime::from_timestamp_millis(k.0).unwrap_or_else(Utc::now),
            open: Self::parse_decimal(&k.1),
            high: Self::parse_decimal(&k.2),
            low: Self::parse_decimal(&k.3),
            close: Self::parse_decimal(&k.4),
            volume: Self::parse_decimal(&k.5),
            close_time: DateTime::from_timestamp_millis(k.6).unwrap_or_else(Utc::now),
            quote_volume: Self::parse_decimal(&k.7),
            num_trades: k.8 as u32,
            taker_buy_base_volume: Self::parse_decimal(&k.9),
            taker_buy_quote_volume: Self::parse_decimal(&k.10),
        }
    }
}

#[async_trait]
impl MarketDataSource for BinanceMarketData {
    fn name(&self) -> &str {
        "binance"
    }

    async fn fetch_klines(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Kline>> {
        let interval = timeframe.to_binance_interval();

        let mut params = vec![
            ("symbol", instrument.as_str().to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.unwrap_or(DEFAULT_LIMIT).to_string()),
        ];
        if let Some(start) = start_time {
            params.push(("startTime", start.timestamp_millis().to_string()));
        }
        if let Some(end) = end_time {
            params.push(("endTime", end.timestamp_millis().to_string()));
        }

        let resp: Vec<BinanceKline> = self.public_get("/api/v3/klines", &params).await?;

        debug!(
            instrument = %instrument,
            interval,
            count = resp.len(),
            "Fetched klines"
        );

        Ok(resp.into_iter().map(Self::to_kline).collect())
    }
}
