use serde::Deserialize;
use std::io::Read;

use super::normalizer::{normalize_region, normalize_text};

/// Won per unit of the published deal amount (10,000 won).
pub(crate) const AMOUNT_UNIT_WON: i64 = 10_000;

/// A transaction row after unit conversion and normalization. Months are not
/// validated here.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DealRow {
    pub(crate) region: String,
    pub(crate) subregion: String,
    pub(crate) neighborhood: Option<String>,
    pub(crate) property_name: String,
    pub(crate) deal_year: i32,
    pub(crate) deal_month: u32,
    pub(crate) deal_price: i64,
    pub(crate) area_m2: f64,
    pub(crate) floor: Option<i32>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<DealRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RawDealRow>() {
        let raw = record?;
        rows.push(raw.into_row());
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawDealRow {
    #[serde(default)]
    region: String,
    #[serde(default)]
    subregion: String,
    #[serde(default)]
    neighborhood: String,
    #[serde(default)]
    property_name: String,
    #[serde(default)]
    deal_year: String,
    #[serde(default)]
    deal_month: String,
    #[serde(default)]
    deal_amount: String,
    #[serde(default)]
    area_m2: String,
    #[serde(default)]
    floor: String,
}

impl RawDealRow {
    fn into_row(self) -> DealRow {
        let neighborhood = normalize_text(&self.neighborhood);
        DealRow {
            region: normalize_region(&self.region),
            subregion: normalize_text(&self.subregion),
            neighborhood: (!neighborhood.is_empty()).then_some(neighborhood),
            property_name: normalize_text(&self.property_name),
            deal_year: parse_number(&self.deal_year).unwrap_or(0.0) as i32,
            deal_month: parse_number(&self.deal_month)
                .filter(|month| *month >= 0.0)
                .unwrap_or(0.0) as u32,
            deal_price: parse_amount(&self.deal_amount),
            area_m2: parse_number(&self.area_m2).unwrap_or(0.0),
            floor: parse_number(&self.floor).map(|floor| floor as i32),
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Published amounts such as "85,000" are in 10,000 won units.
pub(crate) fn parse_amount(value: &str) -> i64 {
    parse_number(value)
        .map(|amount| (amount * AMOUNT_UNIT_WON as f64).round() as i64)
        .unwrap_or(0)
}
