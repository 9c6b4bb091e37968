use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary values, quantities, hours and rates are exact decimals.
/// Floating point never touches a stored total.
pub type Amount = Decimal;

/// Total for a priced line: quantity × unit cost, unrounded. `None` when
/// the product does not fit in an `Amount`.
pub fn line_total(quantity: Amount, unit_cost: Amount) -> Option<Amount> {
    quantity.checked_mul(unit_cost)
}

/// Format an amount for display with two decimal places, halves rounded
/// away from zero.
/// Example: 550 -> "550.00", 12.345 -> "12.35"
pub fn format_amount(amount: Amount) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Parse a decimal string such as "12.50" or "-3".
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    Decimal::from_str(input).map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid decimal format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Decimal::from(2), Decimal::from(25)), Some(Decimal::from(50)));
        assert_eq!(
            line_total(parse_amount("2.5").unwrap(), parse_amount("0.1").unwrap()),
            Some(parse_amount("0.25").unwrap())
        );
        assert_eq!(line_total(Decimal::ZERO, Decimal::from(99)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_line_total_overflow() {
        let huge = parse_amount("100000000000000000000").unwrap();
        assert_eq!(line_total(huge, huge), None);
        assert_eq!(line_total(Decimal::MAX, Decimal::ZERO), Some(Decimal::ZERO));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(550)), "550.00");
        assert_eq!(format_amount(parse_amount("12.345").unwrap()), "12.35");
        assert_eq!(format_amount(parse_amount("0.1").unwrap()), "0.10");
        assert_eq!(format_amount(parse_amount("-4").unwrap()), "-4.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50"), Ok(Decimal::from(50)));
        assert_eq!(parse_amount(" 12.50 "), Ok(Decimal::new(1250, 2)));
        assert_eq!(parse_amount("-3"), Ok(Decimal::from(-3)));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.34.56").is_err());
        assert!(parse_amount("").is_err());
    }
}
