use crate::model::ANY_LODGING;
use crate::tables::PricingTable;

/// Representative nightly price for a lead, plus the lodging types that had no price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceResolution {
    pub nightly_price: f64,
    pub unresolved: Vec<String>,
}

impl PriceResolution {
    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Cheapest selected option. `["Any"]` means cheapest in the whole table.
/// A type missing from the table counts as 0, and is reported.
pub fn resolve_nightly_price(lodging: &[String], table: &PricingTable) -> PriceResolution {
    if is_any(lodging) {
        return match table.cheapest() {
            Some(price) => PriceResolution {
                nightly_price: price,
                unresolved: Vec::new(),
            },
            None => PriceResolution {
                nightly_price: 0.0,
                unresolved: vec![ANY_LODGING.to_string()],
            },
        };
    }

    let mut unresolved = Vec::new();
    let mut nightly_price = f64::INFINITY;
    for lodging_type in lodging {
        let price = table.price(lodging_type).unwrap_or_else(|| {
            unresolved.push(lodging_type.clone());
            0.0
        });
        nightly_price = nightly_price.min(price);
    }

    if !nightly_price.is_finite() {
        nightly_price = 0.0;
    }
    PriceResolution {
        nightly_price,
        unresolved,
    }
}

fn is_any(lodging: &[String]) -> bool {
    lodging.is_empty() || (lodging.len() == 1 && lodging[0] == ANY_LODGING)
}
