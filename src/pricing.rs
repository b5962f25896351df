//! Price and status derivation. Every function here is total: undefined
//! inputs produce `None` or [`PriceStatus::Unavailable`], never a panic.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::{PriceCategory, PriceStatus, ProductComparison, RetailerId, RetailerPrice};
use crate::retailers::RetailerRegistry;

/// Fixed tolerance band used by both the per-cell category and the overall status.
pub const SAME_PRICE_TOLERANCE: f64 = 0.02;

pub fn valid(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

fn min_of(prices: &[f64]) -> Option<f64> {
    prices.iter().copied().reduce(f64::min)
}

fn max_of(prices: &[f64]) -> Option<f64> {
    prices.iter().copied().reduce(f64::max)
}

/// Classifies one cell of a row against the row minimum.
///
/// Equal to the minimum is cheapest, within 2% above it is same, anything
/// else is higher.
pub fn price_comparison_category(
    price: Option<f64>,
    all_valid_prices: &[f64],
) -> Option<PriceCategory> {
    let price = valid(price)?;
    let valid_prices: Vec<f64> = all_valid_prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    let min = min_of(&valid_prices)?;

    if price == min {
        Some(PriceCategory::Cheapest)
    } else if price <= min * (1.0 + SAME_PRICE_TOLERANCE) {
        Some(PriceCategory::Same)
    } else {
        Some(PriceCategory::Higher)
    }
}

/// Overall status of the primary price against competitor prices.
///
/// The cheapest band is anchored on the competitor minimum while the higher
/// band is anchored on the competitor maximum.
pub fn overall_status(primary_price: Option<f64>, competitor_prices: &[Option<f64>]) -> PriceStatus {
    let valid_prices: Vec<f64> = competitor_prices.iter().filter_map(|p| valid(*p)).collect();
    let (Some(primary), Some(min), Some(max)) =
        (valid(primary_price), min_of(&valid_prices), max_of(&valid_prices))
    else {
        return PriceStatus::Unavailable;
    };

    if primary <= min * (1.0 + SAME_PRICE_TOLERANCE) {
        PriceStatus::Cheapest
    } else if primary >= max * (1.0 - SAME_PRICE_TOLERANCE) {
        PriceStatus::Higher
    } else {
        PriceStatus::Same
    }
}

pub fn valid_prices<'a>(prices: impl IntoIterator<Item = &'a RetailerPrice>) -> Vec<f64> {
    prices.into_iter().filter_map(RetailerPrice::valid_price).collect()
}

pub fn lowest_price<'a>(prices: impl IntoIterator<Item = &'a RetailerPrice>) -> Option<f64> {
    min_of(&valid_prices(prices))
}

pub fn highest_price<'a>(prices: impl IntoIterator<Item = &'a RetailerPrice>) -> Option<f64> {
    max_of(&valid_prices(prices))
}

/// `(primary - lowest) / lowest * 100`, or `None` when either side is
/// missing or the primary already is the lowest.
pub fn price_difference_percent(primary: Option<f64>, lowest: Option<f64>) -> Option<f64> {
    let (primary, lowest) = (valid(primary)?, valid(lowest)?);
    if primary == lowest {
        return None;
    }
    Some((primary - lowest) / lowest * 100.0)
}

/// Derived fields of a product, computed from its price map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub status: PriceStatus,
    pub lowest_price: Option<f64>,
    pub highest_price: Option<f64>,
    pub price_difference_percent: Option<f64>,
}

pub fn derive(prices: &BTreeMap<RetailerId, RetailerPrice>, primary: &RetailerId) -> Derived {
    let primary_price = prices.get(primary).and_then(RetailerPrice::valid_price);
    let competitor_prices: Vec<Option<f64>> = prices
        .iter()
        .filter(|(id, _)| *id != primary)
        .map(|(_, p)| p.valid_price())
        .collect();
    let lowest = lowest_price(prices.values());

    Derived {
        status: overall_status(primary_price, &competitor_prices),
        lowest_price: lowest,
        highest_price: highest_price(prices.values()),
        price_difference_percent: price_difference_percent(primary_price, lowest),
    }
}

impl ProductComparison {
    /// Keeps exactly one price entry per registered retailer and recomputes
    /// the derived fields. Called at every point a product enters the system.
    pub fn refresh_derived(&mut self, registry: &RetailerRegistry) {
        let now = Utc::now();
        self.prices.retain(|id, _| registry.get(id).is_some());
        for id in registry.ids() {
            if !self.prices.contains_key(id) {
                self.prices
                    .insert(id.clone(), RetailerPrice::unavailable(id.clone(), now));
            }
        }
        for (id, price) in self.prices.iter_mut() {
            if price.retailer != *id {
                price.retailer = id.clone();
            }
        }

        let derived = derive(&self.prices, &registry.primary().id);
        self.status = derived.status;
        self.lowest_price = derived.lowest_price;
        self.highest_price = derived.highest_price;
        self.price_difference_percent = derived.price_difference_percent;
    }

    /// Per-retailer category of this product's prices within its own row.
    pub fn price_categories(&self) -> BTreeMap<RetailerId, Option<PriceCategory>> {
        let row = valid_prices(self.prices.values());
        self.prices
            .iter()
            .map(|(id, p)| (id.clone(), price_comparison_category(p.price, &row)))
            .collect()
    }
}
