use tracing::warn;

use super::pricing::{PriceResolution, resolve_nightly_price};
use crate::model::{DateRange, LeadWarning};
use crate::normalizer::dates::total_nights;
use crate::tables::PricingTable;

/// Derived revenue figure for one lead.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Estimate {
    /// `None` when no stay length is known.
    pub revenue: Option<f64>,
    pub warnings: Vec<LeadWarning>,
}

/// Trait defining the interface for a revenue estimator.
pub trait Estimator {
    fn resolve_price(&self, lodging: &[String]) -> PriceResolution;
    fn estimate(&self, ranges: &[DateRange], lodging: &[String], group_size: u32) -> Estimate;
}

/// Estimator backed by the static pricing table.
pub struct EstimatorImpl<'a> {
    pricing: &'a PricingTable,
}

impl<'a> EstimatorImpl<'a> {
    pub fn new(pricing: &'a PricingTable) -> Self {
        Self { pricing }
    }
}

impl Estimator for EstimatorImpl<'_> {
    fn resolve_price(&self, lodging: &[String]) -> PriceResolution {
        resolve_nightly_price(lodging, self.pricing)
    }

    /// nights × nightly price × group size, using the longest stay.
    fn estimate(&self, ranges: &[DateRange], lodging: &[String], group_size: u32) -> Estimate {
        let Some(nights) = total_nights(ranges).filter(|&n| n > 0) else {
            return Estimate::default();
        };

        let price = self.resolve_price(lodging);
        let mut warnings = Vec::new();
        if !price.is_resolved() {
            warn!(
                unresolved = ?price.unresolved,
                nights,
                group_size,
                "No nightly price for selected lodging, revenue estimated with 0"
            );
            warnings.push(LeadWarning::UnresolvedPricing {
                lodging: price.unresolved.clone(),
            });
        }

        Estimate {
            revenue: Some(revenue(nights, price.nightly_price, group_size)),
            warnings,
        }
    }
}

pub fn revenue(nights: i64, nightly_price: f64, group_size: u32) -> f64 {
    nights as f64 * nightly_price * f64::from(group_size)
}
