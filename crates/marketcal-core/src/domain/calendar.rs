//! 달력 내비게이션 상태 머신.
//!
//! `(current_month, selected, focused)` 세 날짜를 소유하며, 키보드와
//! 포인터 입력을 동일한 전이 함수 집합으로 처리합니다. 모든 전이는
//! 현재 상태와 입력의 전역 함수이며 실패하지 않습니다.
//!
//! 상태 머신은 시계를 읽지 않습니다. "오늘"이 필요한 전이는 호출자가
//! 넘겨준 `today`를 사용합니다.

use crate::domain::dates::{
    add_days, add_months, end_of_week, generate_calendar_days, is_same_day, is_same_month,
    start_of_month, start_of_week,
};
use chrono::NaiveDate;

/// 달력이 해석하는 내비게이션 키.
///
/// 터미널/브라우저 등 입력 소스와 무관한 표현입니다. 셸 레이어가
/// 실제 키 이벤트를 이 타입으로 변환합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Space,
    Escape,
    /// 그 외 문자 키 ('t'/'T'는 오늘로 이동)
    Char(char),
}

/// 수정자 플래그를 포함한 키 입력.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: NavKey,
    /// Ctrl 또는 Cmd가 눌린 상태 (브라우저 단축키 예약)
    pub ctrl: bool,
}

impl KeyPress {
    /// 수정자 없는 키 입력을 생성합니다.
    pub fn plain(key: NavKey) -> Self {
        Self { key, ctrl: false }
    }
}

/// 달력 상태 전이 액션.
///
/// 포인터 경로와 키보드 경로 모두 이 액션 집합을 통해서만 상태를
/// 변경합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarAction {
    /// 이전 달로 이동 (선택/포커스 유지)
    PrevMonth,
    /// 다음 달로 이동 (선택/포커스 유지)
    NextMonth,
    /// 오늘로 이동 (세 날짜 모두 재설정)
    Today,
    /// 날짜 클릭 (선택 + 포커스, 필요시 월 전환)
    Click(NaiveDate),
    /// 키보드 입력
    Key(KeyPress),
}

/// 전이 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 상태가 변경됨 - 그리드를 다시 계산해야 함
    Changed,
    /// 입력은 소비했지만 상태는 그대로 (재렌더 불필요)
    Unchanged,
    /// 달력이 처리하지 않는 입력 - 이벤트를 가로채지 않음
    Ignored,
}

impl Transition {
    /// 입력이 소비되었는지 여부 (preventDefault에 해당).
    pub fn is_consumed(&self) -> bool {
        !matches!(self, Transition::Ignored)
    }

    /// 상태가 실제로 변경되었는지 여부.
    pub fn is_changed(&self) -> bool {
        matches!(self, Transition::Changed)
    }
}

/// 그리드 셀 하나의 시각적 상태.
///
/// 셀 날짜와 {오늘, 선택, 포커스, 현재 월} 비교만으로 결정되는 순수
/// 함수 값이며 저장되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCellState {
    /// 보이는 월에 속하는 날짜인지
    pub in_month: bool,
    /// 오늘인지
    pub is_today: bool,
    /// 선택된 날짜인지
    pub is_selected: bool,
    /// 포커스를 가진 날짜인지
    pub is_focused: bool,
}

/// 달력 뷰 상태.
///
/// 불변 조건:
/// - `current_month`는 항상 해당 월의 1일로 정규화됩니다.
/// - 정확히 하나의 그리드 셀(`focused`)이 입력 포커스를 가집니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    current_month: NaiveDate,
    selected: NaiveDate,
    focused: NaiveDate,
}

impl CalendarState {
    /// 오늘 날짜로 초기화된 상태를 생성합니다.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_month: start_of_month(today),
            selected: today,
            focused: today,
        }
    }

    /// 보이는 월 (해당 월의 1일).
    pub fn current_month(&self) -> NaiveDate {
        self.current_month
    }

    /// 선택된 날짜.
    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// 포커스를 가진 날짜.
    pub fn focused(&self) -> NaiveDate {
        self.focused
    }

    /// 보이는 월의 그리드 날짜 전체를 반환합니다.
    pub fn grid_days(&self) -> Vec<NaiveDate> {
        generate_calendar_days(self.current_month)
    }

    /// 그리드 셀 하나의 시각적 상태를 계산합니다.
    pub fn day_cell(&self, date: NaiveDate, today: NaiveDate) -> DayCellState {
        DayCellState {
            in_month: is_same_month(date, self.current_month),
            is_today: is_same_day(date, today),
            is_selected: is_same_day(date, self.selected),
            is_focused: is_same_day(date, self.focused),
        }
    }

    /// 액션을 적용하고 전이 결과를 반환합니다.
    ///
    /// 값이 같은 갱신은 상태 쓰기로 치지 않습니다. `Unchanged`가
    /// 반환되면 호출자는 그리드 재계산을 건너뛸 수 있습니다.
    pub fn apply(&mut self, action: CalendarAction, today: NaiveDate) -> Transition {
        match action {
            CalendarAction::PrevMonth => {
                self.current_month = add_months(self.current_month, -1);
                Transition::Changed
            }
            CalendarAction::NextMonth => {
                self.current_month = add_months(self.current_month, 1);
                Transition::Changed
            }
            CalendarAction::Today => self.go_to_today(today),
            CalendarAction::Click(date) => self.select_date(date),
            CalendarAction::Key(press) => self.handle_key(press, today),
        }
    }

    /// 키 입력 하나를 처리합니다.
    ///
    /// 포커스 이동 키가 보이는 월 밖에 도달하면 `current_month`가 그
    /// 달로 따라갑니다. 달력이 해석하지 않는 키는 `Ignored`로 흘려
    /// 보내 이벤트를 가로채지 않습니다.
    fn handle_key(&mut self, press: KeyPress, today: NaiveDate) -> Transition {
        match press.key {
            NavKey::Left => self.move_focus(add_days(self.focused, -1)),
            NavKey::Right => self.move_focus(add_days(self.focused, 1)),
            NavKey::Up => self.move_focus(add_days(self.focused, -7)),
            NavKey::Down => self.move_focus(add_days(self.focused, 7)),
            NavKey::Home => self.move_focus(start_of_week(self.focused)),
            NavKey::End => self.move_focus(end_of_week(self.focused)),
            NavKey::PageUp => self.move_focus(add_months(self.focused, -1)),
            NavKey::PageDown => self.move_focus(add_months(self.focused, 1)),
            NavKey::Enter | NavKey::Space => {
                // 선택만 복사, 월 전환 없음
                if self.selected == self.focused {
                    Transition::Unchanged
                } else {
                    self.selected = self.focused;
                    Transition::Changed
                }
            }
            NavKey::Escape => self.go_to_today(today),
            NavKey::Char('t') | NavKey::Char('T') => {
                if press.ctrl {
                    // Ctrl+T는 상위(브라우저/터미널) 단축키로 예약
                    Transition::Ignored
                } else {
                    self.go_to_today(today)
                }
            }
            NavKey::Char(_) => Transition::Ignored,
        }
    }

    /// 포커스를 옮기고, 월 경계를 넘으면 보이는 월을 따라가게 합니다.
    fn move_focus(&mut self, new_focus: NaiveDate) -> Transition {
        if new_focus == self.focused {
            return Transition::Unchanged;
        }
        self.focused = new_focus;
        if !is_same_month(new_focus, self.current_month) {
            self.current_month = start_of_month(new_focus);
        }
        Transition::Changed
    }

    /// 날짜를 선택하고 포커스를 맞춥니다. 다른 달의 날짜면 월도
    /// 전환합니다.
    fn select_date(&mut self, date: NaiveDate) -> Transition {
        let month = start_of_month(date);
        if self.selected == date && self.focused == date && self.current_month == month {
            return Transition::Unchanged;
        }
        self.selected = date;
        self.focused = date;
        if !is_same_month(date, self.current_month) {
            self.current_month = month;
        }
        Transition::Changed
    }

    /// 세 날짜를 모두 오늘로 재설정합니다.
    fn go_to_today(&mut self, today: NaiveDate) -> Transition {
        let month = start_of_month(today);
        if self.current_month == month && self.selected == today && self.focused == today {
            return Transition::Unchanged;
        }
        self.current_month = month;
        self.selected = today;
        self.focused = today;
        Transition::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(k: NavKey) -> CalendarAction {
        CalendarAction::Key(KeyPress::plain(k))
    }

    #[test]
    fn test_new_normalizes_current_month() {
        let state = CalendarState::new(date(2026, 8, 6));
        assert_eq!(state.current_month(), date(2026, 8, 1));
        assert_eq!(state.selected(), date(2026, 8, 6));
        assert_eq!(state.focused(), date(2026, 8, 6));
    }

    #[test]
    fn test_prev_next_month_keep_selection() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);

        assert_eq!(state.apply(CalendarAction::NextMonth, today), Transition::Changed);
        assert_eq!(state.current_month(), date(2026, 9, 1));
        assert_eq!(state.selected(), today);
        assert_eq!(state.focused(), today);

        assert_eq!(state.apply(CalendarAction::PrevMonth, today), Transition::Changed);
        assert_eq!(state.current_month(), date(2026, 8, 1));
    }

    #[test]
    fn test_arrow_focus_moves() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);

        assert_eq!(state.apply(key(NavKey::Right), today), Transition::Changed);
        assert_eq!(state.focused(), date(2026, 8, 7));

        assert_eq!(state.apply(key(NavKey::Down), today), Transition::Changed);
        assert_eq!(state.focused(), date(2026, 8, 14));

        assert_eq!(state.apply(key(NavKey::Up), today), Transition::Changed);
        assert_eq!(state.apply(key(NavKey::Left), today), Transition::Changed);
        assert_eq!(state.focused(), today);

        // 선택은 포커스 이동의 영향을 받지 않음
        assert_eq!(state.selected(), today);
    }

    #[test]
    fn test_focus_across_month_boundary_moves_current_month() {
        let today = date(2026, 8, 1);
        let mut state = CalendarState::new(today);

        // 8월 1일에서 하루 왼쪽 → 7월 31일, 보이는 월도 7월로
        assert_eq!(state.apply(key(NavKey::Left), today), Transition::Changed);
        assert_eq!(state.focused(), date(2026, 7, 31));
        assert_eq!(state.current_month(), date(2026, 7, 1));
    }

    #[test]
    fn test_home_end_week_boundaries() {
        // 2026-08-06은 목요일
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);

        assert_eq!(state.apply(key(NavKey::Home), today), Transition::Changed);
        assert_eq!(state.focused(), date(2026, 8, 2));

        assert_eq!(state.apply(key(NavKey::End), today), Transition::Changed);
        assert_eq!(state.focused(), date(2026, 8, 8));

        // 이미 주 끝이면 상태 쓰기 없음
        assert_eq!(state.apply(key(NavKey::End), today), Transition::Unchanged);
    }

    #[test]
    fn test_page_down_page_up_round_trip() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);

        state.apply(key(NavKey::PageDown), today);
        assert_eq!(state.focused(), date(2026, 9, 6));
        assert_eq!(state.current_month(), date(2026, 9, 1));

        state.apply(key(NavKey::PageUp), today);
        assert_eq!(state.focused(), today);
        assert_eq!(state.current_month(), date(2026, 8, 1));
    }

    #[test]
    fn test_page_navigation_rollover_is_not_inverse() {
        // 1월 31일 → PageDown → 3월 3일 (2월 길이 초과분 이월)
        // → PageUp → 2월 3일. 알려진 비가역 경계 케이스.
        let today = date(2025, 1, 31);
        let mut state = CalendarState::new(today);

        state.apply(key(NavKey::PageDown), today);
        assert_eq!(state.focused(), date(2025, 3, 3));
        assert_eq!(state.current_month(), date(2025, 3, 1));

        state.apply(key(NavKey::PageUp), today);
        assert_eq!(state.focused(), date(2025, 2, 3));
    }

    #[test]
    fn test_enter_copies_focus_to_selection_without_month_change() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);

        state.apply(key(NavKey::Right), today);
        assert_eq!(state.apply(key(NavKey::Enter), today), Transition::Changed);
        assert_eq!(state.selected(), date(2026, 8, 7));

        // 같은 값 재선택은 상태 쓰기 없음
        assert_eq!(state.apply(key(NavKey::Space), today), Transition::Unchanged);
    }

    #[test]
    fn test_escape_and_t_reset_to_today() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);

        state.apply(CalendarAction::NextMonth, today);
        state.apply(key(NavKey::Down), today);
        assert_eq!(state.apply(key(NavKey::Escape), today), Transition::Changed);
        assert_eq!(state.current_month(), date(2026, 8, 1));
        assert_eq!(state.selected(), today);
        assert_eq!(state.focused(), today);

        state.apply(CalendarAction::PrevMonth, today);
        assert_eq!(state.apply(key(NavKey::Char('t')), today), Transition::Changed);
        assert_eq!(state.current_month(), date(2026, 8, 1));

        // 이미 오늘이면 쓰기 없음
        assert_eq!(state.apply(key(NavKey::Char('T')), today), Transition::Unchanged);
    }

    #[test]
    fn test_ctrl_t_is_not_intercepted() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);
        state.apply(CalendarAction::NextMonth, today);

        let press = KeyPress { key: NavKey::Char('T'), ctrl: true };
        let result = state.apply(CalendarAction::Key(press), today);
        assert_eq!(result, Transition::Ignored);
        assert!(!result.is_consumed());
        assert_eq!(state.current_month(), date(2026, 9, 1));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);
        let before = state.clone();

        assert_eq!(state.apply(key(NavKey::Char('x')), today), Transition::Ignored);
        assert_eq!(state, before);
    }

    #[test]
    fn test_click_adjacent_month_cell() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);

        // 8월 그리드에 보이는 7월 날짜 클릭
        let grayed = date(2026, 7, 28);
        assert_eq!(state.apply(CalendarAction::Click(grayed), today), Transition::Changed);
        assert_eq!(state.selected(), grayed);
        assert_eq!(state.focused(), grayed);
        assert_eq!(state.current_month(), date(2026, 7, 1));

        // 같은 날짜 재클릭은 상태 쓰기 없음
        assert_eq!(state.apply(CalendarAction::Click(grayed), today), Transition::Unchanged);
    }

    #[test]
    fn test_day_cell_classification() {
        let today = date(2026, 8, 6);
        let mut state = CalendarState::new(today);
        state.apply(CalendarAction::Click(date(2026, 8, 10)), today);

        let cell = state.day_cell(date(2026, 8, 10), today);
        assert!(cell.in_month && cell.is_selected && cell.is_focused);
        assert!(!cell.is_today);

        let cell = state.day_cell(today, today);
        assert!(cell.is_today && !cell.is_selected);

        let cell = state.day_cell(date(2026, 7, 28), today);
        assert!(!cell.in_month);
    }
}
