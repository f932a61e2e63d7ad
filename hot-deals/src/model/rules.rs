//! Consistency checks that flag, but never reject, a deal package.
//!
//! Prices, savings and offer choices come from model judgement rather than
//! arithmetic, so violations are reported alongside the data.

use std::fmt;

use chrono::NaiveDate;

use super::package::DealPackage;

/// How far a stored savings percentage may drift from the one implied by the prices.
pub const SAVINGS_TOLERANCE: f64 = 0.5;

/// A broken consistency rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleViolation {
    /// The discounted price is higher than the original price.
    DiscountAboveOriginal {
        /// `original_display_price`
        original: f64,
        /// `discounted_display_price`
        discounted: f64,
    },
    /// `savings_percentage` disagrees with the two prices.
    SavingsMismatch {
        /// The stored percentage.
        stored: f64,
        /// The percentage implied by the prices.
        expected: f64,
    },
    /// `minimum_nights` exceeds `maximum_nights`.
    NightsOutOfOrder {
        /// `minimum_nights`
        minimum: u32,
        /// `maximum_nights`
        maximum: u32,
    },
    /// A date range ends before it starts.
    DatesOutOfOrder {
        /// Path of the start field.
        from_field: String,
        /// Path of the end field.
        until_field: String,
    },
    /// Both special offers and wedding packages are populated.
    OffersWithWeddings {
        /// Number of special offers.
        offers: usize,
        /// Number of wedding packages.
        weddings: usize,
    },
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscountAboveOriginal { original, discounted } => write!(
                f,
                "discounted price {discounted} is above original price {original}"
            ),
            Self::SavingsMismatch { stored, expected } => write!(
                f,
                "savings_percentage {stored} does not match the prices (expected {expected:.2})"
            ),
            Self::NightsOutOfOrder { minimum, maximum } => write!(
                f,
                "minimum_nights {minimum} is greater than maximum_nights {maximum}"
            ),
            Self::DatesOutOfOrder { from_field, until_field } => {
                write!(f, "{until_field} is before {from_field}")
            }
            Self::OffersWithWeddings { offers, weddings } => write!(
                f,
                "special offers ({offers}) and wedding packages ({weddings}) cannot share a deal"
            ),
        }
    }
}

/// Savings implied by an original and a discounted price, in percent.
///
/// Returns `None` when the original price is not positive.
#[must_use]
pub fn implied_savings(original: f64, discounted: f64) -> Option<f64> {
    (original > 0.0).then(|| (original - discounted) / original * 100.0)
}

/// Runs every rule against `package`.
#[must_use]
pub fn check(package: &DealPackage) -> Vec<RuleViolation> {
    let deal = &package.deal;
    let mut violations = Vec::new();

    if let (Some(original), Some(discounted)) =
        (deal.original_display_price, deal.discounted_display_price)
    {
        if discounted > original {
            violations.push(RuleViolation::DiscountAboveOriginal { original, discounted });
        }
        if let (Some(stored), Some(expected)) =
            (deal.savings_percentage, implied_savings(original, discounted))
        {
            if (stored - expected).abs() > SAVINGS_TOLERANCE {
                violations.push(RuleViolation::SavingsMismatch { stored, expected });
            }
        }
    }

    if let Some(maximum) = deal.maximum_nights {
        if deal.minimum_nights > maximum {
            violations.push(RuleViolation::NightsOutOfOrder {
                minimum: deal.minimum_nights,
                maximum,
            });
        }
    }

    let mut ranges = vec![
        ("valid_from".to_string(), deal.valid_from, "valid_until".to_string(), deal.valid_until),
        (
            "travel_dates_from".to_string(),
            deal.travel_dates_from,
            "travel_dates_until".to_string(),
            deal.travel_dates_until,
        ),
    ];
    for (index, offer) in package.special_offers.iter().enumerate() {
        ranges.push((
            format!("special_offers[{index}].valid_from"),
            offer.valid_from,
            format!("special_offers[{index}].valid_until"),
            offer.valid_until,
        ));
    }
    violations.extend(ranges.into_iter().filter_map(out_of_order));

    if !package.special_offers.is_empty() && !package.wedding_packages.is_empty() {
        violations.push(RuleViolation::OffersWithWeddings {
            offers: package.special_offers.len(),
            weddings: package.wedding_packages.len(),
        });
    }

    violations
}

fn out_of_order(
    (from_field, from, until_field, until): (String, Option<NaiveDate>, String, Option<NaiveDate>),
) -> Option<RuleViolation> {
    match (from, until) {
        (Some(from), Some(until)) if until < from => Some(RuleViolation::DatesOutOfOrder {
            from_field,
            until_field,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn package(extra: Value) -> DealPackage {
        let mut value = json!({"name": "Deal", "hotel": {"name": "Hotel"}});
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        DealPackage::from_json(&value).unwrap()
    }

    #[test]
    fn test_savings_within_tolerance_passes() {
        let p = package(json!({
            "original_display_price": 200.0,
            "discounted_display_price": 150.0,
            "savings_percentage": 25.4
        }));
        assert!(check(&p).is_empty());
    }

    #[test]
    fn test_savings_mismatch_is_flagged() {
        let p = package(json!({
            "original_display_price": 200.0,
            "discounted_display_price": 150.0,
            "savings_percentage": 30.0
        }));
        let violations = check(&p);
        assert_eq!(violations.len(), 1);
        match &violations[0] {
            RuleViolation::SavingsMismatch { stored, expected } => {
                assert!((stored - 30.0).abs() < f64::EPSILON);
                assert!((expected - 25.0).abs() < 1e-9);
            }
            other => panic!("unexpected violation {other:?}"),
        }
    }

    #[test]
    fn test_discount_above_original_is_flagged() {
        let p = package(json!({
            "original_display_price": 100.0,
            "discounted_display_price": 120.0
        }));
        assert!(matches!(check(&p)[0], RuleViolation::DiscountAboveOriginal { .. }));
    }

    #[test]
    fn test_offers_and_weddings_are_exclusive() {
        let p = package(json!({
            "special_offers": [{"title": "Stay 7 Pay 5"}],
            "wedding_packages": [{"name": "Beach Ceremony"}]
        }));
        assert_eq!(
            check(&p),
            vec![RuleViolation::OffersWithWeddings { offers: 1, weddings: 1 }]
        );
    }

    #[test]
    fn test_night_and_date_order() {
        let p = package(json!({
            "minimum_nights": 5,
            "maximum_nights": 3,
            "travel_dates_from": "2025-06-10",
            "travel_dates_until": "2025-06-01"
        }));
        let violations = check(&p);
        assert!(violations.contains(&RuleViolation::NightsOutOfOrder { minimum: 5, maximum: 3 }));
        assert!(violations.iter().any(|v| matches!(
            v,
            RuleViolation::DatesOutOfOrder { until_field, .. } if until_field == "travel_dates_until"
        )));
    }

    #[test]
    fn test_implied_savings() {
        assert_eq!(implied_savings(200.0, 150.0), Some(25.0));
        assert_eq!(implied_savings(0.0, 0.0), None);
    }
}
