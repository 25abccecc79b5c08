use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::ListingRecord;
use super::super::filter::stages::effective_investment;
use super::super::metrics::{discount_rate, m2_to_pyeong, CostPolicy};

/// Metrics derived from a listing at query time; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingMetrics {
    pub discount_rate: f64,
    pub required_investment: i64,
    pub area_pyeong: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<u32>,
}

impl ListingMetrics {
    pub fn for_listing(listing: &ListingRecord, policy: &CostPolicy) -> Self {
        Self {
            discount_rate: discount_rate(listing.appraisal_price, listing.minimum_price),
            required_investment: effective_investment(listing, policy),
            area_pyeong: m2_to_pyeong(listing.area_m2),
            floor: listing.unit_floor(),
        }
    }
}

/// Listing snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredResult {
    pub listing: ListingRecord,
    pub metrics: ListingMetrics,
}

impl FilteredResult {
    pub fn new(listing: ListingRecord, policy: &CostPolicy) -> Self {
        let metrics = ListingMetrics::for_listing(&listing, policy);
        Self { listing, metrics }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub count: usize,
    pub avg_discount_rate: f64,
    pub avg_investment: i64,
    pub avg_turnover_rate: f64,
    pub region_breakdown: BTreeMap<String, usize>,
}
