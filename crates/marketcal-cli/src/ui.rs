//! 달력 화면 렌더링.
//!
//! 셀 하나의 시각적 상태는 그 셀의 날짜와 {오늘, 선택, 포커스, 보이는
//! 월} 비교의 순수 함수(`DayCellState`)에서 나옵니다. 렌더 중에 기록한
//! 히트박스는 다음 마우스 이벤트의 디스패치에 사용됩니다.

use chrono::{Datelike, Local, NaiveDate};
use marketcal_core::{format_full_date, format_month, is_same_day, DayCellState, Timeframe};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, HeaderAction};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// 전체 화면을 그립니다.
pub(crate) fn draw(frame: &mut Frame, app: &mut App) {
    let today = Local::now().date_naive();

    let chunks = Layout::vertical([
        Constraint::Length(1), // 헤더 (월 타이틀, 이동 버튼, 타임프레임 셀렉터)
        Constraint::Length(1), // 상태 줄
        Constraint::Length(1), // 요일 헤더
        Constraint::Min(8),    // 그리드
        Constraint::Length(3), // 푸터
    ])
    .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_status(frame, app, chunks[1]);
    draw_weekdays(frame, chunks[2]);
    draw_grid(frame, app, chunks[3], today);
    draw_footer(frame, app, chunks[4], today);
}

fn draw_header(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Length(16), // 월 타이틀
        Constraint::Min(1),
        Constraint::Length(13), // ◀ Today ▶
        Constraint::Length(2),
        Constraint::Length(20), // [Day] [Week] [Month]
    ])
    .split(area);

    let title = Paragraph::new(Span::styled(
        format_month(app.calendar.current_month()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, chunks[0]);

    draw_nav_buttons(frame, app, chunks[2]);
    draw_timeframe_selector(frame, app, chunks[4]);
}

fn draw_nav_buttons(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Length(3), // ◀
        Constraint::Length(1),
        Constraint::Length(5), // Today
        Constraint::Length(1),
        Constraint::Length(3), // ▶
    ])
    .split(area);

    let button_style = Style::default().fg(Color::White).bg(Color::DarkGray);

    app.button_hits.clear();
    for (rect, label, action) in [
        (chunks[0], " ◀ ", HeaderAction::PrevMonth),
        (chunks[2], "Today", HeaderAction::Today),
        (chunks[4], " ▶ ", HeaderAction::NextMonth),
    ] {
        frame.render_widget(Paragraph::new(Span::styled(label, button_style)), rect);
        app.button_hits.push((rect, action));
    }
}

fn draw_timeframe_selector(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Length(5), // [Day]
        Constraint::Length(1),
        Constraint::Length(6), // [Week]
        Constraint::Length(1),
        Constraint::Length(7), // [Month]
    ])
    .split(area);

    let selected = app.orchestrator.store().timeframe();

    app.selector_hits.clear();
    for (rect, timeframe) in [
        (chunks[0], Timeframe::Day),
        (chunks[2], Timeframe::Week),
        (chunks[4], Timeframe::Month),
    ] {
        let style = if timeframe == selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label = format!("[{}]", timeframe.label());
        frame.render_widget(Paragraph::new(Span::styled(label, style)), rect);
        app.selector_hits.push((rect, timeframe));
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let store = app.orchestrator.store();
    let data = store.data();

    let mut spans = vec![
        Span::styled("Instrument: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            store.instrument().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Timeframe: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            store.timeframe().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    if data.loading() {
        spans.push(Span::styled(
            "Loading Binance data...",
            Style::default().fg(Color::Blue),
        ));
    } else if let Some(error) = data.error() {
        spans.push(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(klines) = store.current_klines() {
        spans.push(Span::styled(
            format!("{} candles cached", klines.len()),
            Style::default().fg(Color::Green),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_weekdays(frame: &mut Frame, area: Rect) {
    let chunks = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(area);

    for (rect, label) in chunks.iter().zip(WEEKDAY_LABELS) {
        let header = Paragraph::new(Span::styled(
            label,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(header, *rect);
    }
}

fn draw_grid(frame: &mut Frame, app: &mut App, area: Rect, today: NaiveDate) {
    let days = app.calendar.grid_days();
    let weeks = days.len() / 7;

    let row_rects =
        Layout::vertical(vec![Constraint::Ratio(1, weeks as u32); weeks]).split(area);

    app.grid_hits.clear();
    for (week, row) in row_rects.iter().enumerate() {
        let col_rects = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(*row);
        for (col, cell_rect) in col_rects.iter().enumerate() {
            let date = days[week * 7 + col];
            let state = app.calendar.day_cell(date, today);
            let direction = app.candle_covering(date).map(|k| k.is_bullish());

            let cell = Paragraph::new(Span::styled(
                format!("{:>2}", date.day()),
                cell_style(state, direction),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(cell, *cell_rect);
            app.grid_hits.push((*cell_rect, date));
        }
    }
}

/// 셀 하나의 스타일을 계산합니다.
///
/// 우선순위는 원 디자인과 같습니다: 다른 달 < 선택 < 오늘 < 일반.
/// 포커스 링은 반전으로 표현합니다.
fn cell_style(state: DayCellState, direction: Option<bool>) -> Style {
    let mut style = Style::default();

    if !state.in_month {
        style = style.fg(Color::DarkGray);
    } else if state.is_selected {
        style = style
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD);
    } else if state.is_today {
        style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    } else {
        // 캔들 방향에 따라 색을 입힌다 (데이터 없으면 기본색)
        style = match direction {
            Some(true) => style.fg(Color::Green),
            Some(false) => style.fg(Color::Red),
            None => style.fg(Color::Gray),
        };
    }

    if state.is_focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect, today: NaiveDate) {
    let selected = app.calendar.selected();

    let mut selected_spans = vec![
        Span::styled("Selected: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format_full_date(selected),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if is_same_day(selected, today) {
        selected_spans.push(Span::styled(
            " (today)",
            Style::default().fg(Color::Blue),
        ));
    }

    let candle_line = match app.candle_covering(selected) {
        Some(k) => {
            let change = k.change_percent().round_dp(2);
            let direction_style = if k.is_bullish() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            Line::from(vec![
                Span::raw(format!(
                    "O {}  H {}  L {}  C {}  Vol {}  ",
                    k.open, k.high, k.low, k.close, k.volume
                )),
                Span::styled(format!("{}%", change), direction_style),
            ])
        }
        None => Line::from(Span::styled(
            "No candle data for this date",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let shortcuts = Line::from(Span::styled(
        "arrows move | Enter/Space select | PgUp/PgDn month | Home/End week | T/Esc today | I instrument | Q quit",
        Style::default().fg(Color::DarkGray),
    ));

    let footer = Paragraph::new(vec![Line::from(selected_spans), candle_line, shortcuts]);
    frame.render_widget(footer, area);
}
