//! TUI 이벤트 루프와 입력 디스패치.
//!
//! 키보드와 마우스 입력 모두 달력 상태 머신의 전이 함수
//! (`CalendarAction`)와 스토어 액션(`StoreAction`)을 통해서만 상태를
//! 변경합니다. 달력이 가로채지 않은 키만 셸 단축키(종료, 인스트루먼트
//! 순환)로 처리됩니다.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use marketcal_core::{CalendarAction, CalendarState, Instrument, KeyPress, Kline, NavKey, Timeframe};
use marketcal_data::{FetchOrchestrator, FetchOutcome, MarketStore, StoreAction};
use marketcal_exchange::MarketDataSource;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::ui;

/// 헤더의 월 이동 버튼.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderAction {
    PrevMonth,
    Today,
    NextMonth,
}

/// TUI 애플리케이션 상태.
pub(crate) struct App {
    pub(crate) calendar: CalendarState,
    pub(crate) orchestrator: FetchOrchestrator,
    outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
    watchlist: Vec<Instrument>,

    // 마지막 렌더의 히트박스 (마우스 디스패치용)
    pub(crate) grid_hits: Vec<(Rect, NaiveDate)>,
    pub(crate) selector_hits: Vec<(Rect, Timeframe)>,
    pub(crate) button_hits: Vec<(Rect, HeaderAction)>,

    should_quit: bool,
    dirty: bool,
}

impl App {
    /// 애플리케이션을 구성합니다.
    pub(crate) fn new(
        store: MarketStore,
        source: Arc<dyn MarketDataSource>,
        watchlist: Vec<Instrument>,
        limit: u32,
    ) -> Self {
        let (orchestrator, outcomes) = FetchOrchestrator::new(store, source, limit);
        Self {
            calendar: CalendarState::new(Local::now().date_naive()),
            orchestrator,
            outcomes,
            watchlist,
            grid_hits: Vec::new(),
            selector_hits: Vec::new(),
            button_hits: Vec::new(),
            should_quit: false,
            dirty: true,
        }
    }

    /// 터미널을 준비하고 이벤트 루프를 실행합니다.
    pub(crate) async fn run(mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || input_thread(input_tx));

        // 최초 조회 (마운트 시점 효과)
        self.orchestrator.bootstrap();

        while !self.should_quit {
            if self.dirty {
                terminal.draw(|frame| ui::draw(frame, self))?;
                self.dirty = false;
            }

            tokio::select! {
                Some(event) = input_rx.recv() => self.on_event(event),
                Some(outcome) = self.outcomes.recv() => {
                    self.orchestrator.apply_outcome(outcome);
                    self.dirty = true;
                }
                else => break,
            }
        }

        Ok(())
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            Event::Resize(_, _) => self.dirty = true,
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let today = Local::now().date_naive();
        let ctrl = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);

        if let Some(nav) = nav_key(key.code) {
            let press = KeyPress { key: nav, ctrl };
            let transition = self.calendar.apply(CalendarAction::Key(press), today);
            if transition.is_changed() {
                self.dirty = true;
            }
            if transition.is_consumed() {
                return;
            }
        }

        // 달력이 가로채지 않은 키는 셸 단축키
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('i') | KeyCode::Char('I') => self.cycle_instrument(),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }

        let position = Position::new(mouse.column, mouse.row);
        let today = Local::now().date_naive();

        if let Some(date) = hit(&self.grid_hits, position) {
            if self
                .calendar
                .apply(CalendarAction::Click(date), today)
                .is_changed()
            {
                self.dirty = true;
            }
            return;
        }

        if let Some(timeframe) = hit(&self.selector_hits, position) {
            if self
                .orchestrator
                .dispatch(StoreAction::SelectTimeframe(timeframe))
            {
                debug!(%timeframe, "Timeframe selected");
                self.dirty = true;
            }
            return;
        }

        if let Some(button) = hit(&self.button_hits, position) {
            let action = match button {
                HeaderAction::PrevMonth => CalendarAction::PrevMonth,
                HeaderAction::Today => CalendarAction::Today,
                HeaderAction::NextMonth => CalendarAction::NextMonth,
            };
            if self.calendar.apply(action, today).is_changed() {
                self.dirty = true;
            }
        }
    }

    /// 워치리스트에서 다음 인스트루먼트를 선택합니다.
    fn cycle_instrument(&mut self) {
        if self.watchlist.is_empty() {
            return;
        }
        let current = self.orchestrator.store().instrument().clone();
        let next = match self.watchlist.iter().position(|i| *i == current) {
            Some(pos) => self.watchlist[(pos + 1) % self.watchlist.len()].clone(),
            None => self.watchlist[0].clone(),
        };
        if self
            .orchestrator
            .dispatch(StoreAction::SelectInstrument(next))
        {
            self.dirty = true;
        }
    }

    /// 해당 달력 날짜를 덮는 캔들을 찾습니다.
    ///
    /// UTC 버킷 경계를 달력 날짜로 투영해서 비교합니다.
    pub(crate) fn candle_covering(&self, date: NaiveDate) -> Option<&Kline> {
        self.orchestrator.store().current_klines()?.iter().find(|k| {
            let start = k.open_time.date_naive();
            let end = k.close_time.date_naive();
            start <= date && date <= end
        })
    }
}

/// 키 코드를 달력 내비게이션 키로 변환합니다.
fn nav_key(code: KeyCode) -> Option<NavKey> {
    match code {
        KeyCode::Left => Some(NavKey::Left),
        KeyCode::Right => Some(NavKey::Right),
        KeyCode::Up => Some(NavKey::Up),
        KeyCode::Down => Some(NavKey::Down),
        KeyCode::Home => Some(NavKey::Home),
        KeyCode::End => Some(NavKey::End),
        KeyCode::PageUp => Some(NavKey::PageUp),
        KeyCode::PageDown => Some(NavKey::PageDown),
        KeyCode::Enter => Some(NavKey::Enter),
        KeyCode::Char(' ') => Some(NavKey::Space),
        KeyCode::Esc => Some(NavKey::Escape),
        KeyCode::Char(c) => Some(NavKey::Char(c)),
        _ => None,
    }
}

/// 히트박스 목록에서 좌표에 해당하는 값을 찾습니다.
fn hit<T: Copy>(hits: &[(Rect, T)], position: Position) -> Option<T> {
    hits.iter()
        .find(|(rect, _)| rect.contains(position))
        .map(|(_, value)| *value)
}

/// crossterm 이벤트를 읽어 비동기 루프로 전달하는 스레드.
fn input_thread(tx: mpsc::UnboundedSender<Event>) {
    loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_key_mapping() {
        assert_eq!(nav_key(KeyCode::Left), Some(NavKey::Left));
        assert_eq!(nav_key(KeyCode::Char(' ')), Some(NavKey::Space));
        assert_eq!(nav_key(KeyCode::Esc), Some(NavKey::Escape));
        assert_eq!(nav_key(KeyCode::Char('t')), Some(NavKey::Char('t')));
        assert_eq!(nav_key(KeyCode::Tab), None);
    }

    #[test]
    fn test_hit_testing() {
        let hits = vec![
            (Rect::new(0, 0, 5, 1), 1u8),
            (Rect::new(5, 0, 5, 1), 2u8),
        ];
        assert_eq!(hit(&hits, Position::new(2, 0)), Some(1));
        assert_eq!(hit(&hits, Position::new(7, 0)), Some(2));
        assert_eq!(hit(&hits, Position::new(7, 3)), None);
    }
}
