//! 달력 데이터 조회를 위한 타임프레임 정의.
//!
//! 이 모듈은 사용자에게 노출되는 타임프레임 타입과
//! Binance 간격 코드 간의 변환을 정의합니다.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 사용자가 선택할 수 있는 타임프레임.
///
/// 하부 데이터 버킷 크기(간격 코드)와는 구분되는 사용자 대면 값입니다.
/// 프로세스 전역에서 정확히 하나가 선택됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// 일봉
    Day,
    /// 주봉
    Week,
    /// 월봉
    Month,
}

impl Timeframe {
    /// 선택 가능한 전체 타임프레임.
    pub const ALL: [Timeframe; 3] = [Timeframe::Day, Timeframe::Week, Timeframe::Month];

    /// 바이낸스 간격 문자열로 변환합니다.
    pub fn to_binance_interval(&self) -> &'static str {
        match self {
            Timeframe::Day => "1d",
            Timeframe::Week => "1w",
            Timeframe::Month => "1M",
        }
    }

    /// 바이낸스 간격 문자열에서 파싱합니다.
    pub fn from_binance_interval(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(Timeframe::Day),
            "1w" => Some(Timeframe::Week),
            "1M" => Some(Timeframe::Month),
            _ => None,
        }
    }

    /// 선택 UI에 표시되는 레이블.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Day => "Day",
            Timeframe::Week => "Week",
            Timeframe::Month => "Month",
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Day
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_binance_interval())
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 간격 코드와 영문 이름 모두 허용 (CLI 인자 편의)
        Self::from_binance_interval(s)
            .or_else(|| match s.to_lowercase().as_str() {
                "day" => Some(Timeframe::Day),
                "week" => Some(Timeframe::Week),
                "month" => Some(Timeframe::Month),
                _ => None,
            })
            .ok_or_else(|| CoreError::Parse(format!("invalid timeframe: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_binance_interval() {
        assert_eq!(Timeframe::Day.to_binance_interval(), "1d");
        assert_eq!(Timeframe::Week.to_binance_interval(), "1w");
        assert_eq!(Timeframe::Month.to_binance_interval(), "1M");

        assert_eq!(Timeframe::from_binance_interval("1w"), Some(Timeframe::Week));
        assert_eq!(Timeframe::from_binance_interval("4h"), None);
    }

    #[test]
    fn test_timeframe_from_str() {
        assert_eq!("1d".parse::<Timeframe>().unwrap(), Timeframe::Day);
        assert_eq!("week".parse::<Timeframe>().unwrap(), Timeframe::Week);
        assert_eq!("Month".parse::<Timeframe>().unwrap(), Timeframe::Month);
        assert!("1h".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_timeframe_labels() {
        let labels: Vec<_> = Timeframe::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["Day", "Week", "Month"]);
    }

    #[test]
    fn test_timeframe_serde() {
        assert_eq!(serde_json::to_string(&Timeframe::Week).unwrap(), "\"week\"");
        assert_eq!(
            serde_json::from_str::<Timeframe>("\"month\"").unwrap(),
            Timeframe::Month
        );
    }
}
