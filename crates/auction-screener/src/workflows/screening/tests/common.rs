use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::screening::domain::{
    DealRecord, Liquidity, ListingRecord, Location, PropertyKey, PropertyKind,
};
use crate::workflows::screening::repository::{
    upsert_into, DealHistory, ListingQuery, ListingStore, RepositoryError, UpsertSummary,
};
use crate::workflows::screening::{screening_router, ScreeningService};

pub(super) const COMPLEX: &str = "청주 푸르지오";

/// A listing that clears every stage under the default configuration.
pub(super) fn listing(case_id: &str) -> ListingRecord {
    let mut record = ListingRecord::new(
        case_id,
        PropertyKind::Apt,
        Location::new("충북", "청주시"),
    );
    record.court = Some("청주지방법원".to_string());
    record.address = Some("충청북도 청주시 흥덕구 복대동 3379".to_string());
    record.property_name = Some(COMPLEX.to_string());
    record.unit_label = Some("103동 1204호".to_string());
    record.area_m2 = 84.9;
    record.appraisal_price = 200_000_000;
    record.minimum_price = 150_000_000;
    record.fail_count = 1;
    record.rights_analysis_text = Some("말소기준권리 이후 권리 모두 소멸".to_string());
    record.liquidity = Liquidity {
        turnover_rate: Some(5.0),
        avg_deal_price: Some(210_000_000),
        deal_count: Some(6),
    };
    record
}

/// Ten listings; each of 1002..=1009 is removed by exactly one stage.
///
/// Remaining after stages 1..=6 in canonical order: 7, 6, 5, 4, 3, 2.
/// Survivors: 2024타경1001 and 2024타경1010.
pub(super) fn screening_batch() -> Vec<ListingRecord> {
    let passing = listing("2024타경1001");

    let mut house = listing("2024타경1002");
    house.property_kind = PropertyKind::House;

    let mut metro = listing("2024타경1003");
    metro.location = Location::new("서울", "강남구");

    let mut small = listing("2024타경1004");
    small.area_m2 = 49.5;

    let mut stale = listing("2024타경1005");
    stale.fail_count = 4;

    let mut illiquid = listing("2024타경1006");
    illiquid.liquidity.turnover_rate = Some(1.5);

    let mut expensive = listing("2024타경1007");
    expensive.liquidity = Liquidity::default();
    expensive.appraisal_price = 400_000_000;
    expensive.minimum_price = 300_000_000;

    let mut risky = listing("2024타경1008");
    risky.rights_analysis_text = Some("선순위 임차인 대항력 있음".to_string());

    let mut share = listing("2024타경1009");
    share.address = Some("충청북도 청주시 상당구 용암동 지분 1/2".to_string());

    let mut unknown_liquidity = listing("2024타경1010");
    unknown_liquidity.location = Location::new("경북", "포항시");
    unknown_liquidity.property_name = Some("포항 자이".to_string());
    unknown_liquidity.liquidity = Liquidity::default();
    unknown_liquidity.fail_count = 0;
    unknown_liquidity.appraisal_price = 250_000_000;
    unknown_liquidity.minimum_price = 200_000_000;

    vec![
        passing,
        house,
        metro,
        small,
        stale,
        illiquid,
        expensive,
        risky,
        share,
        unknown_liquidity,
    ]
}

pub(super) fn case_ids(listings: &[ListingRecord]) -> Vec<String> {
    listings.iter().map(|listing| listing.case_id.clone()).collect()
}

/// `count` deals for [`COMPLEX`], one per month walking back from 2024-12.
pub(super) fn deals(count: usize, price: i64) -> Vec<DealRecord> {
    (0..count)
        .map(|offset| {
            let months_back = offset as i32;
            DealRecord {
                property_name: COMPLEX.to_string(),
                location: Location::new("충북", "청주시"),
                deal_year: 2024 - months_back / 12,
                deal_month: 12 - (months_back % 12) as u32,
                deal_price: price,
                area_m2: 84.9,
                floor: Some(12),
            }
        })
        .collect()
}

pub(super) fn build_service() -> (
    ScreeningService<MemoryStore, MemoryDeals>,
    Arc<MemoryStore>,
    Arc<MemoryDeals>,
) {
    let store = Arc::new(MemoryStore::default());
    let deals = Arc::new(MemoryDeals::default());
    let service = ScreeningService::new(store.clone(), deals.clone());
    (service, store, deals)
}

pub(super) fn router_with_service(
    service: ScreeningService<MemoryStore, MemoryDeals>,
) -> axum::Router {
    screening_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<BTreeMap<String, ListingRecord>>>,
}

impl MemoryStore {
    pub(super) fn get(&self, case_id: &str) -> Option<ListingRecord> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .get(case_id)
            .cloned()
    }
}

impl ListingStore for MemoryStore {
    fn listings(&self, query: &ListingQuery) -> Result<Vec<ListingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(query.select(guard.values()))
    }

    fn upsert(&self, listings: Vec<ListingRecord>) -> Result<UpsertSummary, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        Ok(upsert_into(&mut guard, listings))
    }

    fn record_liquidity(
        &self,
        case_id: &str,
        liquidity: Liquidity,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard
            .get_mut(case_id)
            .ok_or_else(|| RepositoryError::NotFound(case_id.to_string()))?;
        record.liquidity = liquidity;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDeals {
    deals: Arc<Mutex<Vec<DealRecord>>>,
}

impl DealHistory for MemoryDeals {
    fn recent_deals(
        &self,
        key: &PropertyKey,
        limit: usize,
    ) -> Result<Vec<DealRecord>, RepositoryError> {
        let guard = self.deals.lock().expect("deal mutex poisoned");
        let mut matching: Vec<DealRecord> =
            guard.iter().filter(|deal| deal.matches(key)).cloned().collect();
        matching.sort_by(|a, b| (b.deal_year, b.deal_month).cmp(&(a.deal_year, a.deal_month)));
        matching.truncate(limit);
        Ok(matching)
    }

    fn append(&self, deals: Vec<DealRecord>) -> Result<usize, RepositoryError> {
        let count = deals.len();
        self.deals.lock().expect("deal mutex poisoned").extend(deals);
        Ok(count)
    }
}

pub(super) struct UnavailableStore;

impl ListingStore for UnavailableStore {
    fn listings(&self, _query: &ListingQuery) -> Result<Vec<ListingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _listings: Vec<ListingRecord>) -> Result<UpsertSummary, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_liquidity(
        &self,
        _case_id: &str,
        _liquidity: Liquidity,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
