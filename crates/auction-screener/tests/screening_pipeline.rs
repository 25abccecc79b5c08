use auction_screener::workflows::screening::{
    summarize, FilterConfig, FilterPipeline, FilterStage, FilteredResult, ListingRecord,
    Location, PropertyKind, TurnoverIndex,
};
use auction_screener::workflows::transactions::{DealHistoryImporter, ImportOptions};

const SAMPLE: &[u8] = include_bytes!("../fixtures/deal_history_sample.csv");

fn listing(case_id: &str, name: &str, region: &str, subregion: &str) -> ListingRecord {
    let mut record = ListingRecord::new(case_id, PropertyKind::Apt, Location::new(region, subregion));
    record.property_name = Some(name.to_string());
    record.address = Some(format!("{region} {subregion} {name}"));
    record.unit_label = Some("101동 803호".to_string());
    record.area_m2 = 84.9;
    record.appraisal_price = 320_000_000;
    record.minimum_price = 160_000_000;
    record.fail_count = 2;
    record
}

#[test]
fn imported_history_drives_liquidity_stage() {
    let deals = DealHistoryImporter::from_reader(
        SAMPLE,
        ImportOptions {
            min_area_m2: Some(59.0),
        },
    )
    .expect("sample imports");
    let index = TurnoverIndex::build(deals);
    assert_eq!(index.property_count(), 3);

    let mut listings = vec![
        listing("2024타경5001", "청주 푸르지오", "충북", "청주시"),
        listing("2024타경5002", "포항 자이", "경북", "포항시"),
        listing("2024타경5003", "목포 한국아델리움", "전남", "목포시"),
    ];
    index.enrich(&mut listings);

    // 6 deals -> 50.0, 1 deal -> 8.3, no deals -> stored zero aggregate.
    assert_eq!(listings[0].liquidity.turnover_rate, Some(50.0));
    assert_eq!(listings[0].liquidity.avg_deal_price, Some(305_000_000));
    assert_eq!(listings[1].liquidity.turnover_rate, Some(8.3));
    assert_eq!(listings[2].liquidity.turnover_rate, Some(0.0));

    let pipeline = FilterPipeline::new(FilterConfig {
        min_turnover_rate: 10.0,
        ..FilterConfig::default()
    });
    let outcome = pipeline.run(listings);

    assert_eq!(outcome.remaining_after(FilterStage::BidRound), Some(3));
    assert_eq!(outcome.remaining_after(FilterStage::Liquidity), Some(1));
    assert_eq!(outcome.survivors.len(), 1);
    assert_eq!(outcome.survivors[0].case_id, "2024타경5001");

    let results: Vec<FilteredResult> = outcome
        .survivors
        .into_iter()
        .map(|listing| FilteredResult::new(listing, pipeline.policy()))
        .collect();
    let summary = summarize(&results);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.avg_discount_rate, 50.0);
    assert_eq!(summary.avg_investment, 37_080_000);
    assert_eq!(summary.avg_turnover_rate, 50.0);
    assert_eq!(results[0].metrics.floor, Some(8));
}

#[test]
fn listings_without_aggregates_pass_liquidity_untouched() {
    let listings = vec![
        listing("2024타경6001", "청주 푸르지오", "충북", "청주시"),
        listing("2024타경6002", "포항 자이", "경북", "포항시"),
    ];
    let pipeline = FilterPipeline::new(FilterConfig {
        min_turnover_rate: 99.0,
        ..FilterConfig::default()
    });
    let outcome = pipeline.run(listings);

    assert_eq!(outcome.survivors.len(), 2);
}

#[test]
fn lenient_json_listing_is_screened() {
    let payload = r#"{
        "caseId": "2024타경7001",
        "propertyKind": "APT",
        "location": { "region": "충북", "subregion": "청주시" },
        "areaM2": "84.9",
        "appraisalPrice": "320,000,000",
        "minimumPrice": 160000000,
        "failCount": "2",
        "auctionDate": "2024-12-03",
        "rightsAnalysisText": "말소기준권리 이후 권리 모두 소멸"
    }"#;
    let listing: ListingRecord = serde_json::from_str(payload).expect("lenient listing parses");
    assert!(listing.is_safe);
    assert_eq!(listing.appraisal_price, 320_000_000);

    let outcome = FilterPipeline::new(FilterConfig::default()).run(vec![listing]);
    assert_eq!(outcome.survivors.len(), 1);
}
