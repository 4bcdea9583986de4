use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Digits with optional thousands separators and optional cents.
const AMOUNT_BODY: &str = r"\d+(?:,\d{3})*(?:\.\d+)?";

/// A single dollar amount, e.g. "$12,345.67".
pub static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\$\s?({AMOUNT_BODY})")).unwrap());

/// Two adjacent dollar amounts separated only by whitespace, e.g. "$1,000.00 $500.00".
pub static AMOUNT_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\$\s?({AMOUNT_BODY})\s+\$\s?({AMOUNT_BODY})")).unwrap()
});

/// A monetary string that could not be turned into a non-negative decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedAmount {
    pub text: String,
    pub reason: String,
}

impl fmt::Display for MalformedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed amount '{}': {}", self.text, self.reason)
    }
}

/// Parse a dollar amount such as "$12,345.67", "12,345" or "500.00".
///
/// The dollar sign and thousands separators are stripped. Negative values and
/// anything that does not parse as a decimal are rejected.
pub fn parse_amount(s: &str) -> Result<Decimal, MalformedAmount> {
    let trimmed = s.trim();
    let body = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let digits = body.replace(',', "");

    if digits.is_empty() {
        return Err(MalformedAmount {
            text: s.to_string(),
            reason: "empty".into(),
        });
    }

    let value = Decimal::from_str(&digits).map_err(|e| MalformedAmount {
        text: s.to_string(),
        reason: e.to_string(),
    })?;

    if value.is_sign_negative() {
        return Err(MalformedAmount {
            text: s.to_string(),
            reason: "negative amount".into(),
        });
    }

    Ok(value)
}

/// Two amounts that appeared side by side on a cost line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostPair {
    /// Requested (full) cost of the line.
    pub first: Decimal,
    /// Allocated share of the line.
    pub second: Decimal,
}

/// Find every adjacent amount pair in `text`, in order.
///
/// Pairs where either side fails to parse are returned as errors in place so
/// callers can exclude them from sums and report them.
pub fn find_cost_pairs(text: &str) -> Vec<Result<CostPair, MalformedAmount>> {
    AMOUNT_PAIR
        .captures_iter(text)
        .map(|caps| {
            let first = parse_amount(&caps[1])?;
            let second = parse_amount(&caps[2])?;
            Ok(CostPair { first, second })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dollar_amount_with_separators() {
        assert_eq!(parse_amount("$12,345.67").unwrap(), dec!(12345.67));
    }

    #[test]
    fn test_amount_without_cents() {
        assert_eq!(parse_amount("$1,000").unwrap(), dec!(1000));
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(parse_amount("250.00").unwrap(), dec!(250.00));
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(parse_amount("  $ 42.50 ").unwrap(), dec!(42.50));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(parse_amount("$").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_text_rejected() {
        assert!(parse_amount("TBD").is_err());
    }

    #[test]
    fn test_negative_rejected() {
        assert!(parse_amount("-5.00").is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(parse_amount("$999,999,999,999,999,999,999,999,999,999,999").is_err());
    }

    #[test]
    fn test_pair_found() {
        let pairs = find_cost_pairs("Network upgrade $1,000.00 $500.00 more");
        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs[0].as_ref().unwrap(),
            &CostPair {
                first: dec!(1000.00),
                second: dec!(500.00)
            }
        );
    }

    #[test]
    fn test_pair_across_line_break() {
        let pairs = find_cost_pairs("$2,000.00\n$750.25");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].as_ref().unwrap().second, dec!(750.25));
    }

    #[test]
    fn test_lone_amount_is_not_a_pair() {
        assert!(find_cost_pairs("Total $1,000.00 only").is_empty());
    }

    #[test]
    fn test_single_amount_pattern() {
        let caps = AMOUNT.captures("Interconnection Cost $3,250,000.00").unwrap();
        assert_eq!(&caps[1], "3,250,000.00");
    }
}
