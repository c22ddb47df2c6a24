//! 시장 데이터 소스 trait 정의.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marketcal_core::{Instrument, Kline, Timeframe};

use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 시간 버킷 단위 캔들 데이터를 제공하는 소스.
///
/// 오케스트레이터와 테스트가 실거래소 커넥터를 대체할 수 있도록
/// 하는 공통 인터페이스입니다.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 소스 이름 반환.
    fn name(&self) -> &str;

    /// 과거 캔들스틱 조회.
    ///
    /// `limit`이 없으면 500개를 조회합니다. `start_time`/`end_time`은
    /// 선택적 조회 구간입니다. 내부에서 재시도하거나 캐싱하지 않습니다.
    async fn fetch_klines(
        &self,
        instrument: &Instrument,
        timeframe: Timeframe,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Kline>>;
}
