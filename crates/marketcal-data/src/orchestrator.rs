//! 조회 오케스트레이터.
//!
//! 선택된 (인스트루먼트, 타임프레임)이 실제로 바뀔 때마다 정확히
//! 하나의 조회 태스크를 발행하는 전이-후-디스패치 훅입니다.
//!
//! # 동작 흐름
//!
//! ```text
//! dispatch(SelectTimeframe) ──> store.apply ──┐
//!                                             │ 값이 바뀌었나?
//!                              FetchStarted <─┘ YES
//!                                   │
//!                                   ▼
//!                          tokio::spawn(fetch_klines)
//!                                   │ (비동기 완료)
//!                                   ▼
//!                        mpsc ──> apply_outcome ──> FetchSucceeded/Failed
//! ```
//!
//! 진행 중인 조회는 중단하지 않습니다. 늦게 도착한 완료가 공유
//! loading/error 필드를 덮어쓸 수 있습니다 (last-resolved-wins).
//! 키별 캐시 쓰기는 항상 자신의 키에만 닿으므로 안전합니다.

use crate::store::{MarketStore, StoreAction};
use marketcal_core::{Instrument, Kline};
use marketcal_exchange::MarketDataSource;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// 조회 태스크의 완료 메시지.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 조회 성공
    Succeeded {
        instrument: Instrument,
        interval: &'static str,
        klines: Vec<Kline>,
    },
    /// 조회 실패 (사람이 읽을 수 있는 메시지로 축약)
    Failed {
        instrument: Instrument,
        interval: &'static str,
        message: String,
    },
}

/// 스토어와 데이터 소스를 묶어 조회 생명주기를 관리합니다.
pub struct FetchOrchestrator {
    store: MarketStore,
    source: Arc<dyn MarketDataSource>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    limit: u32,
}

impl FetchOrchestrator {
    /// 새 오케스트레이터와 완료 메시지 수신기를 생성합니다.
    pub fn new(
        store: MarketStore,
        source: Arc<dyn MarketDataSource>,
        limit: u32,
    ) -> (Self, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        (
            Self {
                store,
                source,
                outcome_tx,
                limit,
            },
            outcome_rx,
        )
    }

    /// 현재 스토어 상태 (읽기 전용).
    pub fn store(&self) -> &MarketStore {
        &self.store
    }

    /// 시작 시점의 최초 조회를 발행합니다.
    pub fn bootstrap(&mut self) {
        self.start_fetch();
    }

    /// 액션을 적용하고, 선택이 실제로 바뀌었으면 조회를 발행합니다.
    ///
    /// 반환값은 스토어 상태가 변경되었는지 여부입니다.
    pub fn dispatch(&mut self, action: StoreAction) -> bool {
        let is_selection = matches!(
            action,
            StoreAction::SelectInstrument(_) | StoreAction::SelectTimeframe(_)
        );

        let changed = self.store.apply(action);
        if is_selection && changed {
            self.start_fetch();
        }
        changed
    }

    /// 조회 태스크의 완료 메시지를 상태 전이로 적용합니다.
    ///
    /// 도착 순서대로 적용됩니다. 오래된 조회가 새 조회보다 늦게
    /// 완료되면 공유 loading/error가 덮어써집니다 (의도된 동작).
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Succeeded {
                instrument,
                interval,
                klines,
            } => {
                debug!(
                    instrument = %instrument,
                    interval,
                    count = klines.len(),
                    "Fetch succeeded"
                );
                self.store.apply(StoreAction::FetchSucceeded {
                    instrument,
                    interval,
                    klines,
                });
            }
            FetchOutcome::Failed {
                instrument,
                interval,
                message,
            } => {
                warn!(instrument = %instrument, interval, error = %message, "Fetch failed");
                self.store.apply(StoreAction::FetchFailed { message });
            }
        }
    }

    /// 현재 선택 키에 대한 조회 태스크 하나를 발행합니다.
    fn start_fetch(&mut self) {
        let instrument = self.store.instrument().clone();
        let timeframe = self.store.timeframe();
        let interval = timeframe.to_binance_interval();

        debug!(instrument = %instrument, interval, "Fetch started");
        self.store.apply(StoreAction::FetchStarted);

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        let limit = self.limit;

        tokio::spawn(async move {
            let outcome = match source
                .fetch_klines(&instrument, timeframe, None, None, Some(limit))
                .await
            {
                Ok(klines) => FetchOutcome::Succeeded {
                    instrument,
                    interval,
                    klines,
                },
                Err(e) => FetchOutcome::Failed {
                    instrument,
                    interval,
                    message: e.to_string(),
                },
            };
            // 수신자가 내려간 뒤(종료 중) 도착한 완료는 버려진다
            let _ = tx.send(outcome);
        });
    }
}

