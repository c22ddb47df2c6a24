//! 달력 날짜 연산 유틸리티.
//!
//! 모든 함수는 로컬 달력 날짜(`NaiveDate`) 위에서 동작하는 순수 함수입니다.
//! 타임존 변환 없음, IO 없음, 실패 없음 (유효한 날짜에 대해 전역 함수).
//!
//! 주는 일요일 시작입니다 (요일 인덱스 0=일요일..6=토요일).

use chrono::{Datelike, Duration, NaiveDate};

/// 해당 월의 첫째 날을 반환합니다.
pub fn start_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// 해당 월의 마지막 날을 반환합니다.
pub fn end_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(days_in_month(d.year(), d.month())).unwrap_or(d)
}

/// 해당 날짜가 속한 주의 일요일을 반환합니다.
pub fn start_of_week(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.weekday().num_days_from_sunday()))
}

/// 해당 날짜가 속한 주의 토요일을 반환합니다.
///
/// 항상 `start_of_week(d) + 6일`입니다.
pub fn end_of_week(d: NaiveDate) -> NaiveDate {
    start_of_week(d) + Duration::days(6)
}

/// 날짜에 `n`일을 더합니다 (음수 허용).
pub fn add_days(d: NaiveDate, n: i64) -> NaiveDate {
    d + Duration::days(n)
}

/// 날짜에 `n`개월을 더합니다 (음수 허용).
///
/// 원래 일자가 대상 월의 길이를 초과하면 초과분만큼 다음 달로
/// 넘어갑니다 (예: 1월 31일 + 1개월 = 3월 3일). 말일로 클램프하지
/// 않습니다.
pub fn add_months(d: NaiveDate, months: i32) -> NaiveDate {
    let total = d.year() * 12 + d.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = d.day();
    let last = days_in_month(year, month);
    match NaiveDate::from_ymd_opt(year, month, day.min(last)) {
        Some(nd) if day <= last => nd,
        Some(nd) => nd + Duration::days(i64::from(day - last)),
        None => d,
    }
}

/// 두 날짜가 같은 연·월인지 확인합니다.
pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// 두 날짜가 같은 연·월·일인지 확인합니다.
pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// 해당 월의 일수를 반환합니다.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// `"<월 이름> <연도>"` 형식으로 포맷합니다 (예: "August 2026").
pub fn format_month(d: NaiveDate) -> String {
    d.format("%B %Y").to_string()
}

/// `"<요일>, <월> <일><서수 접미사>, <연도>"` 형식으로 포맷합니다
/// (예: "Thursday, August 6th, 2026").
pub fn format_full_date(d: NaiveDate) -> String {
    format!(
        "{}, {} {}{}, {}",
        d.format("%A"),
        d.format("%B"),
        d.day(),
        ordinal_suffix(d.day()),
        d.year()
    )
}

/// 일자의 서수 접미사를 반환합니다.
///
/// 11일/12일/13일은 항상 "th", 그 외에는 일자%10 기준으로
/// 1→"st", 2→"nd", 3→"rd", 나머지 "th".
pub fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11 | 12 | 13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// 보이는 월의 전체 그리드를 생성합니다.
///
/// 월의 첫째 날이 속한 주의 일요일부터 마지막 날이 속한 주의
/// 토요일까지, 하루 단위로 순회한 연속 범위입니다. 길이는 항상
/// 7의 배수(4~6주)입니다.
pub fn generate_calendar_days(current: NaiveDate) -> Vec<NaiveDate> {
    let grid_start = start_of_week(start_of_month(current));
    let grid_end = end_of_week(end_of_month(current));

    let mut days = Vec::with_capacity(42);
    let mut day = grid_start;
    while day <= grid_end {
        days.push(day);
        day = add_days(day, 1);
    }
    days
}
