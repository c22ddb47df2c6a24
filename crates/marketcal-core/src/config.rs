//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 우선순위: 기본값 → 설정 파일(TOML) → `MARKETCAL__` 환경 변수.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Binance 데이터 엔드포인트 설정
    pub binance: BinanceSettings,
    /// 초기 선택 상태 설정
    pub market: MarketSettings,
    /// 로깅 설정
    pub logging: LoggingSettings,
}

/// Binance 데이터 엔드포인트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BinanceSettings {
    /// REST 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 조회당 최대 캔들 수
    pub default_limit: u32,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 30,
            default_limit: 500,
        }
    }
}

/// 초기 선택 상태 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketSettings {
    /// 시작 시 선택되는 인스트루먼트 (거래소 티커)
    pub default_symbol: String,
    /// 시작 시 선택되는 타임프레임 (간격 코드)
    pub default_timeframe: String,
    /// 인스트루먼트 순환 키로 이동할 수 있는 티커 목록
    pub watchlist: Vec<String>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            default_symbol: "BTCUSDT".to_string(),
            default_timeframe: "1d".to_string(),
            watchlist: vec![
                "BTCUSDT".to_string(),
                "ETHUSDT".to_string(),
                "BNBUSDT".to_string(),
                "SOLUSDT".to_string(),
            ],
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// 로그 레벨 필터 (예: "info", "marketcal_core=debug")
    pub level: String,
    /// 출력 형식 (pretty, json, compact)
    pub format: String,
    /// 로그 파일 경로 (TUI 모드에서는 파일 출력 권장)
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("binance.base_url", "https://api.binance.com")?
            .set_default("binance.timeout_secs", 30)?
            .set_default("binance.default_limit", 500)?
            .set_default("market.default_symbol", "BTCUSDT")?
            .set_default("market.default_timeframe", "1d")?
            .set_default(
                "market.watchlist",
                vec!["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT"],
            )?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("MARKETCAL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize().map_err(CoreError::from)
    }

    /// 설정 파일이 주어지면 로드하고, 없으면 기본값을 사용합니다.
    pub fn load_or_default(path: Option<&str>) -> CoreResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.binance.base_url, "https://api.binance.com");
        assert_eq!(config.binance.default_limit, 500);
        assert_eq!(config.market.default_symbol, "BTCUSDT");
        assert_eq!(config.market.default_timeframe, "1d");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(AppConfig::load("definitely/missing.toml").is_err());
    }
}
