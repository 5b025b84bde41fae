//! Brazilian currency and percentage formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol prefixed to every formatted amount.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Format an amount as Brazilian reais: `R$ 1.234,50`.
///
/// Absent amounts render as zero. Rounding is half away from zero at two places.
///
/// ```
/// use nfse_audit::core::format_brl;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_brl(Some(dec!(1234.5))), "R$ 1.234,50");
/// assert_eq!(format_brl(None), "R$ 0,00");
/// ```
pub fn format_brl(amount: Option<Decimal>) -> String {
    let amount = amount.unwrap_or(Decimal::ZERO);
    let formatted = format_decimal_ptbr(amount.abs(), 2);
    if amount.is_sign_negative() && !amount.is_zero() && formatted != "0,00" {
        format!("-{CURRENCY_SYMBOL} {formatted}")
    } else {
        format!("{CURRENCY_SYMBOL} {formatted}")
    }
}

/// Format a rate in percent with two decimals: `5,00%`.
pub fn format_percent(rate: Decimal) -> String {
    let formatted = format_decimal_ptbr(rate.abs(), 2);
    if rate.is_sign_negative() && formatted != "0,00" {
        format!("-{formatted}%")
    } else {
        format!("{formatted}%")
    }
}

/// Format a non-negative decimal with `.` thousands grouping and `,` decimal separator.
fn format_decimal_ptbr(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{rounded:.prec$}", prec = places as usize);
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped},{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_brl(Some(dec!(1234.5))), "R$ 1.234,50");
        assert_eq!(format_brl(Some(dec!(1234567.891))), "R$ 1.234.567,89");
        assert_eq!(format_brl(Some(dec!(999))), "R$ 999,00");
        assert_eq!(format_brl(Some(dec!(100000))), "R$ 100.000,00");
    }

    #[test]
    fn absent_is_zero() {
        assert_eq!(format_brl(None), "R$ 0,00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_brl(Some(dec!(0.005))), "R$ 0,01");
        assert_eq!(format_brl(Some(dec!(2.344))), "R$ 2,34");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_brl(Some(dec!(-1500))), "-R$ 1.500,00");
        assert_eq!(format_brl(Some(dec!(-0.001))), "R$ 0,00");
    }

    #[test]
    fn percent() {
        assert_eq!(format_percent(dec!(5)), "5,00%");
        assert_eq!(format_percent(dec!(2.015)), "2,02%");
    }
}
