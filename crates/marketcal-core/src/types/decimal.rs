//! 정밀한 가격 계산을 위한 Decimal 타입 별칭.
//!
//! 거래소가 내려주는 가격은 부동소수점 오차를 피하기 위해 문자열로
//! 전달되며, 파싱 후에는 `rust_decimal::Decimal`로 다룹니다.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래량을 위한 타입.
pub type Quantity = Decimal;
