use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{DealRecord, Liquidity, ListingRecord, PropertyKey};

/// Area above which a listing counts as a large unit.
pub const LARGE_UNIT_THRESHOLD_M2: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Large,
    SmallMedium,
}

impl SizeClass {
    pub fn contains(self, area_m2: f64) -> bool {
        match self {
            Self::Large => area_m2 > LARGE_UNIT_THRESHOLD_M2,
            Self::SmallMedium => area_m2 <= LARGE_UNIT_THRESHOLD_M2,
        }
    }
}

/// Store-side selection applied before screening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_class: Option<SizeClass>,
}

impl ListingQuery {
    pub fn matches(&self, listing: &ListingRecord) -> bool {
        if let Some(region) = &self.region {
            if &listing.location.region != region {
                return false;
            }
        }
        self.size_class
            .map(|class| class.contains(listing.area_m2))
            .unwrap_or(true)
    }

    /// Filter and order listings the way stores return them: by auction date
    /// ascending with undated cases last, ties broken by case id.
    pub fn select<'a, I>(&self, listings: I) -> Vec<ListingRecord>
    where
        I: IntoIterator<Item = &'a ListingRecord>,
    {
        let mut selected: Vec<ListingRecord> = listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            let a_key = (a.auction_date.is_none(), a.auction_date);
            let b_key = (b.auction_date.is_none(), b.auction_date);
            a_key.cmp(&b_key).then_with(|| a.case_id.cmp(&b.case_id))
        });
        selected
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Upsert into a map keyed by case id, merging re-ingested cases with
/// [`ListingRecord::merge_reingested`].
pub fn upsert_into(
    records: &mut BTreeMap<String, ListingRecord>,
    listings: Vec<ListingRecord>,
) -> UpsertSummary {
    let mut summary = UpsertSummary::default();
    for listing in listings {
        let merged = match records.get(&listing.case_id) {
            Some(previous) => {
                summary.updated += 1;
                listing.merge_reingested(previous)
            }
            None => {
                summary.inserted += 1;
                listing
            }
        };
        records.insert(merged.case_id.clone(), merged);
    }
    summary
}

/// Durable listing storage keyed by case id.
pub trait ListingStore: Send + Sync {
    fn listings(&self, query: &ListingQuery) -> Result<Vec<ListingRecord>, RepositoryError>;
    /// Insert or replace by case id, merging with the stored copy via
    /// [`ListingRecord::merge_reingested`].
    fn upsert(&self, listings: Vec<ListingRecord>) -> Result<UpsertSummary, RepositoryError>;
    fn record_liquidity(&self, case_id: &str, liquidity: Liquidity)
        -> Result<(), RepositoryError>;
}

/// Append-only transaction history.
pub trait DealHistory: Send + Sync {
    /// Newest first by `(deal_year, deal_month)`, at most `limit` records.
    fn recent_deals(
        &self,
        key: &PropertyKey,
        limit: usize,
    ) -> Result<Vec<DealRecord>, RepositoryError>;
    fn append(&self, deals: Vec<DealRecord>) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("listing {0} not found")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
