//! Discount arithmetic and PKR display formatting.
//!
//! All amounts are [`Decimal`] in whole rupees. Discounts are percentages and
//! are always clamped to `[0, MAX_DISCOUNT_PERCENT]` before use.

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest discount the storefront will ever apply.
pub const MAX_DISCOUNT_PERCENT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// Clamp a discount percentage to `[0, 90]`.
#[must_use]
pub fn clamp_discount(percent: Decimal) -> Decimal {
    percent.clamp(Decimal::ZERO, MAX_DISCOUNT_PERCENT)
}

/// Price after applying a (clamped) discount, rounded to two decimal places
/// and never negative.
///
/// The discount is scaled to a fraction before multiplying, so the reduction
/// never exceeds the price and the result cannot overflow.
///
/// ```
/// use arluxe_core::discounted_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(discounted_price(Decimal::from(3500), Decimal::from(10)), Decimal::from(3150));
/// assert_eq!(discounted_price(Decimal::from(1000), Decimal::from(150)), Decimal::from(100));
/// ```
#[must_use]
pub fn discounted_price(price: Decimal, discount_percent: Decimal) -> Decimal {
    let fraction = clamp_discount(discount_percent) / Decimal::ONE_HUNDRED;
    let discounted = price - price * fraction;
    discounted
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
}

/// Whether a discount percentage results in any reduction at all.
#[must_use]
pub fn has_discount(discount_percent: Decimal) -> bool {
    clamp_discount(discount_percent) > Decimal::ZERO
}

/// Format an amount as Pakistani rupees with no fractional digits.
///
/// Follows the `en-PK` convention: `Rs` prefix and lakh-style digit
/// grouping (last three digits, then pairs).
///
/// ```
/// use arluxe_core::format_pkr;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_pkr(Decimal::from(3500)), "Rs 3,500");
/// assert_eq!(format_pkr(Decimal::from(1_250_000)), "Rs 12,50,000");
/// ```
#[must_use]
pub fn format_pkr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().trunc().to_string();
    format!("{sign}Rs {}", group_lakh(&digits))
}

/// Insert separators using Indian/Pakistani grouping.
fn group_lakh(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap_or_default()
    }

    #[test]
    fn test_clamp_discount_bounds() {
        assert_eq!(clamp_discount(dec("-5")), Decimal::ZERO);
        assert_eq!(clamp_discount(dec("0")), Decimal::ZERO);
        assert_eq!(clamp_discount(dec("45.5")), dec("45.5"));
        assert_eq!(clamp_discount(dec("90")), dec("90"));
        assert_eq!(clamp_discount(dec("150")), dec("90"));
    }

    #[test]
    fn test_discounted_price_matches_formula() {
        for (price, discount) in [
            ("3500", "0"),
            ("3500", "10"),
            ("1999.99", "33"),
            ("4000", "90"),
            ("4000", "120"),
            ("1500", "-20"),
            ("0", "50"),
            ("10.005", "0"),
        ] {
            let p = dec(price);
            let c = clamp_discount(dec(discount));
            let expected = (p - p * c / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .max(Decimal::ZERO);
            assert_eq!(discounted_price(p, dec(discount)), expected, "{price} @ {discount}");
        }
    }

    #[test]
    fn test_discounted_price_rounds_to_cents() {
        // 1999.99 * 0.67 = 1339.9933
        assert_eq!(discounted_price(dec("1999.99"), dec("33")), dec("1339.99"));
        assert_eq!(discounted_price(dec("10.005"), dec("0")), dec("10.01"));
    }

    #[test]
    fn test_discounted_price_never_negative() {
        assert_eq!(discounted_price(dec("-100"), dec("0")), Decimal::ZERO);
    }

    #[test]
    fn test_discounted_price_at_decimal_max() {
        assert_eq!(discounted_price(Decimal::MAX, Decimal::ZERO), Decimal::MAX);
        assert!(discounted_price(Decimal::MAX, dec("10")) < Decimal::MAX);
        assert!(discounted_price(Decimal::MAX, dec("90")) > Decimal::ZERO);
    }

    #[test]
    fn test_has_discount() {
        assert!(!has_discount(dec("-1")));
        assert!(!has_discount(Decimal::ZERO));
        assert!(has_discount(dec("0.5")));
        assert!(has_discount(dec("90")));
        assert!(has_discount(dec("200")));
    }

    #[test]
    fn test_format_pkr() {
        assert_eq!(format_pkr(dec("0")), "Rs 0");
        assert_eq!(format_pkr(dec("999")), "Rs 999");
        assert_eq!(format_pkr(dec("1500")), "Rs 1,500");
        assert_eq!(format_pkr(dec("3149.5")), "Rs 3,150");
        assert_eq!(format_pkr(dec("150000")), "Rs 1,50,000");
        assert_eq!(format_pkr(dec("12345678")), "Rs 1,23,45,678");
        assert_eq!(format_pkr(dec("-2500")), "-Rs 2,500");
    }
}
