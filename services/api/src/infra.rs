use auction_screener::error::AppError;
use auction_screener::workflows::screening::{
    upsert_into, DealHistory, DealRecord, FilterConfig, Liquidity, ListingQuery, ListingRecord,
    ListingStore, PropertyKey, RepositoryError, UpsertSummary,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryListingStore {
    records: Arc<Mutex<BTreeMap<String, ListingRecord>>>,
}

impl ListingStore for InMemoryListingStore {
    fn listings(&self, query: &ListingQuery) -> Result<Vec<ListingRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(query.select(guard.values()))
    }

    fn upsert(&self, listings: Vec<ListingRecord>) -> Result<UpsertSummary, RepositoryError> {
        let mut guard = lock(&self.records)?;
        Ok(upsert_into(&mut guard, listings))
    }

    fn record_liquidity(
        &self,
        case_id: &str,
        liquidity: Liquidity,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(case_id) {
            Some(record) => {
                record.liquidity = liquidity;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(case_id.to_string())),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDealHistory {
    deals: Arc<Mutex<HashMap<PropertyKey, Vec<DealRecord>>>>,
}

impl DealHistory for InMemoryDealHistory {
    fn recent_deals(
        &self,
        key: &PropertyKey,
        limit: usize,
    ) -> Result<Vec<DealRecord>, RepositoryError> {
        let guard = lock(&self.deals)?;
        let mut deals = guard.get(key).cloned().unwrap_or_default();
        deals.sort_by(|a, b| (b.deal_year, b.deal_month).cmp(&(a.deal_year, a.deal_month)));
        deals.truncate(limit);
        Ok(deals)
    }

    fn append(&self, deals: Vec<DealRecord>) -> Result<usize, RepositoryError> {
        let mut guard = lock(&self.deals)?;
        let count = deals.len();
        for deal in deals {
            guard.entry(deal.key()).or_default().push(deal);
        }
        Ok(count)
    }
}

/// Listing exports come either as a bare array or wrapped in `{"items": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingExport {
    Bare(Vec<ListingRecord>),
    Wrapped { items: Vec<ListingRecord> },
}

pub(crate) fn parse_listings(raw: &str) -> Result<Vec<ListingRecord>, AppError> {
    let export: ListingExport = serde_json::from_str(raw)?;
    Ok(match export {
        ListingExport::Bare(items) | ListingExport::Wrapped { items } => items,
    })
}

pub(crate) fn load_listings(path: &Path) -> Result<Vec<ListingRecord>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_listings(&raw)
}

pub(crate) fn load_filter_config(path: Option<&Path>) -> Result<FilterConfig, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(FilterConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_screener::workflows::screening::{Location, PropertyKind};

    #[test]
    fn listing_exports_accept_both_shapes() {
        let bare = parse_listings(r#"[{"caseId": "2024타경1"}]"#).expect("bare array");
        let wrapped =
            parse_listings(r#"{"items": [{"caseId": "2024타경1"}, {"caseId": "2024타경2"}]}"#)
                .expect("wrapped");
        assert_eq!(bare.len(), 1);
        assert_eq!(wrapped.len(), 2);
        assert!(parse_listings("{}").is_err());
    }

    #[test]
    fn store_orders_by_auction_date_with_undated_last() {
        let store = InMemoryListingStore::default();
        let mut later = ListingRecord::new("B", PropertyKind::Apt, Location::new("충북", "청주시"));
        later.auction_date = chrono::NaiveDate::from_ymd_opt(2025, 3, 2);
        let mut sooner = ListingRecord::new("C", PropertyKind::Apt, Location::new("충북", "청주시"));
        sooner.auction_date = chrono::NaiveDate::from_ymd_opt(2025, 2, 1);
        let undated = ListingRecord::new("A", PropertyKind::Apt, Location::new("충북", "청주시"));

        store.upsert(vec![later, undated, sooner]).expect("upsert");
        let ordered: Vec<String> = store
            .listings(&ListingQuery::default())
            .expect("listings")
            .into_iter()
            .map(|listing| listing.case_id)
            .collect();
        assert_eq!(ordered, vec!["C", "B", "A"]);
    }

    #[test]
    fn recording_liquidity_for_unknown_case_is_not_found() {
        let store = InMemoryListingStore::default();
        let error = store
            .record_liquidity("missing", Liquidity::default())
            .expect_err("unknown case");
        assert!(matches!(error, RepositoryError::NotFound(case) if case == "missing"));
    }
}
