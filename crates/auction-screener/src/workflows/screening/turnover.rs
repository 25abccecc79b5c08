use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{DealRecord, Liquidity, ListingRecord, PropertyKey};
use super::metrics::{round_half_up, round_tenth};

/// Most recent transactions considered per property.
pub const DEAL_WINDOW: usize = 100;
/// Months the capped deal count is assumed to cover.
pub const TRAILING_MONTHS: f64 = 12.0;

/// Liquidity aggregate for one property identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverSnapshot {
    pub turnover_rate: f64,
    pub avg_deal_price: i64,
    pub deal_count: u32,
}

impl TurnoverSnapshot {
    pub fn liquidity(&self) -> Liquidity {
        Liquidity {
            turnover_rate: Some(self.turnover_rate),
            avg_deal_price: Some(self.avg_deal_price),
            deal_count: Some(self.deal_count),
        }
    }
}

/// Aggregate the deals of a single property.
///
/// Deals are ordered newest first by `(deal_year, deal_month)` and capped at
/// [`DEAL_WINDOW`] before averaging. The rate is `deal_count / 12 * 100` and
/// is not normalized by the number of units in the complex.
pub fn aggregate<'a, I>(deals: I) -> TurnoverSnapshot
where
    I: IntoIterator<Item = &'a DealRecord>,
{
    let mut window: Vec<&DealRecord> = deals.into_iter().collect();
    if window.is_empty() {
        return TurnoverSnapshot::default();
    }

    window.sort_by(|a, b| (b.deal_year, b.deal_month).cmp(&(a.deal_year, a.deal_month)));
    window.truncate(DEAL_WINDOW);

    let deal_count = window.len();
    let total: f64 = window.iter().map(|deal| deal.deal_price as f64).sum();
    let avg_deal_price = round_half_up(total / deal_count as f64) as i64;
    let turnover_rate = round_tenth(deal_count as f64 / TRAILING_MONTHS * 100.0);

    TurnoverSnapshot {
        turnover_rate,
        avg_deal_price,
        deal_count: deal_count as u32,
    }
}

/// Deal history partitioned by property identity.
#[derive(Debug, Default, Clone)]
pub struct TurnoverIndex {
    deals: HashMap<PropertyKey, Vec<DealRecord>>,
}

impl TurnoverIndex {
    pub fn build<I>(deals: I) -> Self
    where
        I: IntoIterator<Item = DealRecord>,
    {
        let mut index = Self::default();
        for deal in deals {
            index.deals.entry(deal.key()).or_default().push(deal);
        }
        index
    }

    pub fn property_count(&self) -> usize {
        self.deals.len()
    }

    pub fn snapshot(&self, key: &PropertyKey) -> TurnoverSnapshot {
        self.deals
            .get(key)
            .map(|deals| aggregate(deals.iter()))
            .unwrap_or_default()
    }

    /// Attach the aggregate for each listing's property; zero-deal properties
    /// receive a zero aggregate, exactly as the refresh job stores them.
    pub fn enrich(&self, listings: &mut [ListingRecord]) {
        for listing in listings.iter_mut() {
            let snapshot = self.snapshot(&listing.property_key());
            listing.liquidity = snapshot.liquidity();
        }
    }
}
