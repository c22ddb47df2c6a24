//! 프로세스 전역 시장 데이터 스토어.
//!
//! 렌더링 레이어에 노출되는 상태는
//! `{instrument, timeframe, data: {cache, loading, error}}` 하나이며,
//! 정의된 `StoreAction`을 통해서만 변경됩니다. 임의 호출 지점의 직접
//! 필드 쓰기는 허용되지 않습니다 (필드는 비공개).

use marketcal_core::{Instrument, Kline, Timeframe};
use std::collections::HashMap;

/// 캐시와 조회 상태.
///
/// `loading`/`error`는 키별이 아니라 가장 최근 조회 하나를 반영하는
/// 공유 필드입니다. 새 조회는 이전에 캐시된 다른 키를 지우지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct DataState {
    /// 인스트루먼트 → 간격 코드 → 캔들 시퀀스
    cache: HashMap<Instrument, HashMap<&'static str, Vec<Kline>>>,
    /// 진행 중인 조회 여부
    loading: bool,
    /// 가장 최근 실패의 사람이 읽을 수 있는 메시지
    error: Option<String>,
}

impl DataState {
    /// 캐시된 캔들을 조회합니다.
    pub fn klines(&self, instrument: &Instrument, interval: &str) -> Option<&[Kline]> {
        self.cache
            .get(instrument)
            .and_then(|by_interval| by_interval.get(interval))
            .map(|klines| klines.as_slice())
    }

    /// 해당 키가 캐시에 존재하는지 확인합니다.
    pub fn contains(&self, instrument: &Instrument, interval: &str) -> bool {
        self.klines(instrument, interval).is_some()
    }

    /// 진행 중인 조회 여부.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// 가장 최근 실패 메시지.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// 스토어 상태 전이 액션.
#[derive(Debug, Clone)]
pub enum StoreAction {
    /// 인스트루먼트 선택
    SelectInstrument(Instrument),
    /// 타임프레임 선택
    SelectTimeframe(Timeframe),
    /// 조회 시작 (loading=true, error 초기화)
    FetchStarted,
    /// 조회 성공 (해당 키에 저장)
    FetchSucceeded {
        instrument: Instrument,
        interval: &'static str,
        klines: Vec<Kline>,
    },
    /// 조회 실패 (error 기록, 캐시는 그대로)
    FetchFailed { message: String },
}

/// 프로세스 전역 시장 데이터 스토어.
#[derive(Debug, Clone)]
pub struct MarketStore {
    instrument: Instrument,
    timeframe: Timeframe,
    data: DataState,
}

impl MarketStore {
    /// 초기 선택 상태로 스토어를 생성합니다.
    pub fn new(instrument: Instrument, timeframe: Timeframe) -> Self {
        Self {
            instrument,
            timeframe,
            data: DataState::default(),
        }
    }

    /// 현재 선택된 인스트루먼트.
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// 현재 선택된 타임프레임.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// 캐시/조회 상태.
    pub fn data(&self) -> &DataState {
        &self.data
    }

    /// 현재 선택 키에 캐시된 캔들.
    pub fn current_klines(&self) -> Option<&[Kline]> {
        self.data
            .klines(&self.instrument, self.timeframe.to_binance_interval())
    }

    /// 액션을 적용하고 상태가 실제로 변경되었는지 반환합니다.
    ///
    /// 선택 액션에서 같은 값 재선택은 변경으로 치지 않습니다.
    /// 호출자는 이 반환값으로 조회 트리거 여부를 결정합니다.
    pub fn apply(&mut self, action: StoreAction) -> bool {
        match action {
            StoreAction::SelectInstrument(instrument) => {
                if self.instrument == instrument {
                    return false;
                }
                self.instrument = instrument;
                true
            }
            StoreAction::SelectTimeframe(timeframe) => {
                if self.timeframe == timeframe {
                    return false;
                }
                self.timeframe = timeframe;
                true
            }
            StoreAction::FetchStarted => {
                self.data.loading = true;
                self.data.error = None;
                true
            }
            StoreAction::FetchSucceeded {
                instrument,
                interval,
                klines,
            } => {
                self.data
                    .cache
                    .entry(instrument)
                    .or_default()
                    .insert(interval, klines);
                self.data.loading = false;
                self.data.error = None;
                true
            }
            StoreAction::FetchFailed { message } => {
                self.data.loading = false;
                self.data.error = Some(message);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MarketStore {
        MarketStore::new(Instrument::new("BTCUSDT"), Timeframe::Day)
    }

    #[test]
    fn test_reselecting_same_value_is_not_a_change() {
        let mut store = store();
        assert!(!store.apply(StoreAction::SelectInstrument(Instrument::new("BTCUSDT"))));
        assert!(!store.apply(StoreAction::SelectTimeframe(Timeframe::Day)));

        assert!(store.apply(StoreAction::SelectTimeframe(Timeframe::Week)));
        assert_eq!(store.timeframe(), Timeframe::Week);
    }

    #[test]
    fn test_fetch_lifecycle_transitions() {
        let mut store = store();

        store.apply(StoreAction::FetchStarted);
        assert!(store.data().loading());
        assert!(store.data().error().is_none());

        store.apply(StoreAction::FetchSucceeded {
            instrument: Instrument::new("BTCUSDT"),
            interval: "1d",
            klines: vec![],
        });
        assert!(!store.data().loading());
        assert!(store.data().contains(&Instrument::new("BTCUSDT"), "1d"));
    }

    #[test]
    fn test_failed_fetch_keeps_cache_and_records_error() {
        let mut store = store();

        store.apply(StoreAction::FetchSucceeded {
            instrument: Instrument::new("BTCUSDT"),
            interval: "1d",
            klines: vec![],
        });

        store.apply(StoreAction::FetchStarted);
        store.apply(StoreAction::FetchFailed {
            message: "Network error: connection refused".to_string(),
        });

        assert!(!store.data().loading());
        assert_eq!(store.data().error(), Some("Network error: connection refused"));
        // 이전에 캐시된 키는 그대로
        assert!(store.data().contains(&Instrument::new("BTCUSDT"), "1d"));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut store = store();

        store.apply(StoreAction::FetchFailed {
            message: "boom".to_string(),
        });
        store.apply(StoreAction::FetchSucceeded {
            instrument: Instrument::new("ETHUSDT"),
            interval: "1w",
            klines: vec![],
        });

        assert!(store.data().error().is_none());
    }

    #[test]
    fn test_current_klines_follows_selection() {
        let mut store = store();
        store.apply(StoreAction::FetchSucceeded {
            instrument: Instrument::new("BTCUSDT"),
            interval: "1d",
            klines: vec![],
        });

        assert!(store.current_klines().is_some());

        store.apply(StoreAction::SelectTimeframe(Timeframe::Month));
        assert!(store.current_klines().is_none());
    }
}
