use auction_screener::workflows::screening::PropertyKey;
use auction_screener::workflows::transactions::{
    DealHistoryImporter, DealImportError, ImportOptions,
};

const SAMPLE: &[u8] = include_bytes!("../fixtures/deal_history_sample.csv");

#[test]
fn importer_converts_units_and_normalizes_regions() {
    let deals = DealHistoryImporter::from_reader(SAMPLE, ImportOptions::default())
        .expect("sample imports");

    // One row carries month 0 and is skipped.
    assert_eq!(deals.len(), 9);

    let first = &deals[0];
    assert_eq!(first.property_name, "청주 푸르지오");
    assert_eq!(first.location.region, "충북");
    assert_eq!(first.location.subregion, "청주시");
    assert_eq!(first.deal_year, 2024);
    assert_eq!(first.deal_month, 11);
    assert_eq!(first.deal_price, 315_000_000);
    assert_eq!(first.floor, Some(12));

    let regions: Vec<&str> = deals
        .iter()
        .map(|deal| deal.location.region.as_str())
        .collect();
    assert!(regions.contains(&"경북"));
    assert!(regions.contains(&"전남"));
}

#[test]
fn minimum_area_drops_small_units() {
    let options = ImportOptions {
        min_area_m2: Some(59.0),
    };
    let deals = DealHistoryImporter::from_reader(SAMPLE, options).expect("sample imports");

    assert_eq!(deals.len(), 8);
    assert!(deals.iter().all(|deal| deal.area_m2 >= 59.0));

    let key = PropertyKey {
        property_name: "청주 푸르지오".to_string(),
        region: "충북".to_string(),
        subregion: "청주시".to_string(),
    };
    assert_eq!(deals.iter().filter(|deal| deal.matches(&key)).count(), 6);
}

#[test]
fn malformed_csv_surfaces_csv_error() {
    let data = "region,subregion\n충북,청주시,extra\n";
    let error = DealHistoryImporter::from_reader(data.as_bytes(), ImportOptions::default())
        .expect_err("ragged rows are rejected");

    assert!(matches!(error, DealImportError::Csv(_)));
}
