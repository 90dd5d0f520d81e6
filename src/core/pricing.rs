//! 報價引擎：依載入的目錄將 (服務、大小、頻率、加購) 計算成報價。
//! Pure and synchronous; callers may invoke it from any number of places
//! at once.

use crate::domain::model::{PriceCatalog, PriceQuote, PriceQuoteRequest, QuoteWarning};
use crate::domain::money::Money;
use crate::utils::error::{CheckoutError, Result};

/// 依目錄計算一筆報價
///
/// An unknown service type is the only failure. Unknown property sizes and
/// frequencies fall back to multiplier 1 and unknown add-ons contribute
/// nothing; each fallback is recorded in the quote's warning list and
/// logged, never swallowed.
///
/// Catalog values are taken as given; supplying a well-formed catalog is
/// the loader's job, not this function's.
pub fn compute_price(request: &PriceQuoteRequest, catalog: &PriceCatalog) -> Result<PriceQuote> {
    let base_price = *catalog.base_prices.get(&request.service_type).ok_or_else(|| {
        CheckoutError::InvalidServiceType {
            service_type: request.service_type.clone(),
        }
    })?;

    let mut warnings = Vec::new();

    // 查詢大小倍率，查無則以 1 計價
    let size_multiplier = match catalog.size_multipliers.get(&request.property_size) {
        Some(multiplier) => *multiplier,
        None => {
            tracing::warn!(
                "unknown property size '{}', pricing with multiplier 1",
                request.property_size
            );
            warnings.push(QuoteWarning::UnknownPropertySize {
                key: request.property_size.clone(),
            });
            1.0
        }
    };

    let frequency_multiplier = match catalog.frequency_discounts.get(&request.frequency) {
        Some(multiplier) => *multiplier,
        None => {
            tracing::warn!(
                "unknown frequency '{}', pricing without discount",
                request.frequency
            );
            warnings.push(QuoteWarning::UnknownFrequency {
                key: request.frequency.clone(),
            });
            1.0
        }
    };

    // 加總已知的加購項目
    let mut add_on_total = Money::ZERO;
    for add_on in &request.add_ons {
        match catalog.add_on_prices.get(add_on) {
            Some(price) => add_on_total += *price,
            None => {
                tracing::warn!("unknown add-on '{}' ignored", add_on);
                warnings.push(QuoteWarning::UnknownAddOn {
                    key: add_on.clone(),
                });
            }
        }
    }

    let size_adjusted_price = base_price.scale(size_multiplier);
    let discounted = size_adjusted_price.scale(frequency_multiplier);

    Ok(PriceQuote {
        base_price,
        size_adjusted_price,
        add_on_total,
        frequency_discount_amount: size_adjusted_price.saturating_sub(discounted),
        total: discounted + add_on_total,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample_catalog() -> PriceCatalog {
        let mut catalog = PriceCatalog::default();
        catalog
            .base_prices
            .insert("home-regular".to_string(), Money::new(15_000));
        catalog
            .base_prices
            .insert("home-deep".to_string(), Money::new(25_000));
        catalog.size_multipliers.insert("small".to_string(), 1.0);
        catalog.size_multipliers.insert("medium".to_string(), 1.5);
        catalog.size_multipliers.insert("large".to_string(), 2.0);
        catalog
            .frequency_discounts
            .insert("one-time".to_string(), 1.0);
        catalog
            .frequency_discounts
            .insert("weekly".to_string(), 0.85);
        catalog
            .add_on_prices
            .insert("window-cleaning".to_string(), Money::new(5_000));
        catalog
            .add_on_prices
            .insert("laundry".to_string(), Money::new(3_000));
        catalog
    }

    fn request(service: &str, size: &str, frequency: &str, add_ons: &[&str]) -> PriceQuoteRequest {
        PriceQuoteRequest {
            service_type: service.to_string(),
            property_size: size.to_string(),
            frequency: frequency.to_string(),
            add_ons: add_ons.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_weekly_medium_home_regular_with_window_cleaning() {
        let catalog = sample_catalog();
        let quote = compute_price(
            &request("home-regular", "medium", "weekly", &["window-cleaning"]),
            &catalog,
        )
        .unwrap();

        assert_eq!(quote.base_price, Money::new(15_000));
        assert_eq!(quote.size_adjusted_price, Money::new(22_500));
        assert_eq!(quote.add_on_total, Money::new(5_000));
        assert_eq!(quote.frequency_discount_amount, Money::new(3_375));
        assert_eq!(quote.total, Money::new(24_125));
        assert!(quote.warnings.is_empty());
    }

    #[test]
    fn test_unknown_service_type_fails() {
        let catalog = sample_catalog();
        let err = compute_price(&request("car-wash", "medium", "weekly", &[]), &catalog)
            .unwrap_err();
        match err {
            CheckoutError::InvalidServiceType { service_type } => {
                assert_eq!(service_type, "car-wash");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_property_size_defaults_to_standard_with_warning() {
        let catalog = sample_catalog();
        let quote = compute_price(&request("home-regular", "penthouse", "one-time", &[]), &catalog)
            .unwrap();

        // multiplier 1: size-adjusted price equals the base price
        assert_eq!(quote.size_adjusted_price, Money::new(15_000));
        assert_eq!(quote.total, Money::new(15_000));
        assert_eq!(
            quote.warnings,
            vec![QuoteWarning::UnknownPropertySize {
                key: "penthouse".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_frequency_prices_without_discount() {
        let catalog = sample_catalog();
        let quote = compute_price(&request("home-regular", "small", "daily", &[]), &catalog)
            .unwrap();

        assert_eq!(quote.total, Money::new(15_000));
        assert_eq!(quote.frequency_discount_amount, Money::ZERO);
        assert_eq!(
            quote.warnings,
            vec![QuoteWarning::UnknownFrequency {
                key: "daily".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_add_on_is_ignored_but_flagged() {
        let catalog = sample_catalog();
        let quote = compute_price(
            &request(
                "home-regular",
                "small",
                "one-time",
                &["laundry", "gold-plating"],
            ),
            &catalog,
        )
        .unwrap();

        // only the known add-on counts
        assert_eq!(quote.add_on_total, Money::new(3_000));
        assert_eq!(quote.total, Money::new(18_000));
        assert_eq!(
            quote.warnings,
            vec![QuoteWarning::UnknownAddOn {
                key: "gold-plating".to_string()
            }]
        );
    }

    #[test]
    fn test_quote_is_deterministic() {
        let catalog = sample_catalog();
        let req = request("home-deep", "large", "weekly", &["laundry", "window-cleaning"]);
        let first = compute_price(&req, &catalog).unwrap();
        let second = compute_price(&req, &catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_never_below_add_on_total() {
        let catalog = sample_catalog();
        for service in ["home-regular", "home-deep"] {
            for size in ["small", "medium", "large", "unknown-size"] {
                for frequency in ["one-time", "weekly", "unknown-frequency"] {
                    let quote = compute_price(
                        &request(service, size, frequency, &["window-cleaning", "laundry"]),
                        &catalog,
                    )
                    .unwrap();
                    assert!(
                        quote.total >= quote.add_on_total,
                        "total {} fell below add-ons {} for {}/{}/{}",
                        quote.total,
                        quote.add_on_total,
                        service,
                        size,
                        frequency
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_add_ons_yields_zero_add_on_total() {
        let catalog = sample_catalog();
        let quote =
            compute_price(&request("home-regular", "small", "one-time", &[]), &catalog).unwrap();
        assert_eq!(quote.add_on_total, Money::ZERO);
        assert_eq!(quote.total, quote.size_adjusted_price);
    }
}
