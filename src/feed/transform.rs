//! Raw oracle value to price transforms
//!
//! The decoding formula of a concrete oracle is not baked into the feed;
//! it is injected as a [`PriceTransform`] strategy so the same polling core
//! serves different oracle encodings.

use alloy_primitives::U256;

/// A raw oracle value the transform could not turn into a price.
#[derive(Debug, thiserror::Error)]
#[error("Cannot transform oracle value into a price: {details}")]
pub struct PriceTransformError {
    /// What made the value unusable
    pub details: String,
}

impl PriceTransformError {
    /// Create a transform error with details.
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
        }
    }
}

/// Pure strategy turning a raw sampled oracle value into a price
///
/// Implementations must be side-effect free: the feed applies the transform
/// both on scheduled refreshes and on historical queries, and expects the
/// same raw value to always produce the same price.
pub trait PriceTransform: Send + Sync {
    /// Transforms `raw` into a price in the feed's decimal precision
    fn to_price(&self, raw: U256) -> Result<f64, PriceTransformError>;
}

/// Transform for ray-encoded redemption rates (27 decimals)
///
/// A redemption rate hovers around `1e27` (neutral). The deviation is
/// rebased around 1000 so that negative and positive rates both map onto a
/// positive price:
///
/// ```text
/// price = (raw / 1e27 - 1) * 1e9 + 1000
/// ```
///
/// For example, raw `999999983117203764734439013` yields roughly
/// `983.117`. The arithmetic is done in f64, matching the precision the
/// price is quoted in downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedemptionRateTransform;

/// One ray: the neutral redemption rate.
const RAY: f64 = 1e27;

/// Scale from rate deviation to price points.
const RATE_SCALE: f64 = 1e9;

/// Price at a neutral (zero-deviation) redemption rate.
const NEUTRAL_PRICE: f64 = 1000.0;

impl PriceTransform for RedemptionRateTransform {
    fn to_price(&self, raw: U256) -> Result<f64, PriceTransformError> {
        // Nearest-f64 of the full integer, then IEEE double arithmetic.
        let rate: f64 = raw
            .to_string()
            .parse()
            .map_err(|_| PriceTransformError::new(format!("unparseable rate {raw}")))?;

        let price = (rate - RAY) / RAY * RATE_SCALE + NEUTRAL_PRICE;

        if !price.is_finite() {
            return Err(PriceTransformError::new(format!(
                "rate {raw} maps to non-finite price"
            )));
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(s: &str) -> U256 {
        s.parse().unwrap()
    }

    #[test]
    fn test_neutral_rate_is_base_price() {
        let price = RedemptionRateTransform
            .to_price(U256::from(10).pow(U256::from(27)))
            .unwrap();
        assert_eq!(price, 1000.0);
    }

    #[test]
    fn test_negative_rate_maps_below_base() {
        let price = RedemptionRateTransform
            .to_price(rate("999999983117203764734439013"))
            .unwrap();
        assert!((price - 983.1172037395402).abs() < 1e-9);
    }

    #[test]
    fn test_positive_rate_maps_above_base() {
        let price = RedemptionRateTransform
            .to_price(rate("1000000267417929490714933462"))
            .unwrap();
        assert!((price - 1267.417929456749).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate() {
        // A zero rate is a full negative deviation: 1000 - 1e9
        let price = RedemptionRateTransform.to_price(U256::ZERO).unwrap();
        assert_eq!(price, -1e9 + 1000.0);
    }
}
