use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Property categories published by the auction sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    #[default]
    Apt,
    House,
    Officetel,
    Land,
    Commercial,
    #[serde(other)]
    Unknown,
}

impl PropertyKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Apt => "APT",
            Self::House => "HOUSE",
            Self::Officetel => "OFFICETEL",
            Self::Land => "LAND",
            Self::Commercial => "COMMERCIAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Lenient lookup used by query strings and the CLI; never fails.
    pub fn from_code(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "APT" | "APARTMENT" => Self::Apt,
            "HOUSE" => Self::House,
            "OFFICETEL" => Self::Officetel,
            "LAND" => Self::Land,
            "COMMERCIAL" => Self::Commercial,
            _ => Self::Unknown,
        }
    }
}

/// Administrative hierarchy: province-level region, city/district, neighborhood.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
}

impl Location {
    pub fn new(region: impl Into<String>, subregion: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            subregion: subregion.into(),
            neighborhood: None,
        }
    }
}

/// Cached liquidity aggregate. `None` fields mean "unknown", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liquidity {
    #[serde(default)]
    pub turnover_rate: Option<f64>,
    #[serde(default)]
    pub avg_deal_price: Option<i64>,
    #[serde(default)]
    pub deal_count: Option<u32>,
}

impl Liquidity {
    pub fn is_unknown(&self) -> bool {
        self.turnover_rate.is_none() && self.avg_deal_price.is_none() && self.deal_count.is_none()
    }
}

/// Identity used to match transaction history to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyKey {
    pub property_name: String,
    pub region: String,
    pub subregion: String,
}

/// A single foreclosure-auction listing as delivered by a listing source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub case_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    #[serde(default)]
    pub property_kind: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_label: Option<String>,
    #[serde(default, deserialize_with = "lenient_area")]
    pub area_m2: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub appraisal_price: i64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub minimum_price: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub fail_count: u32,
    #[serde(default, deserialize_with = "lenient_date")]
    pub auction_date: Option<NaiveDate>,
    #[serde(default = "default_is_safe")]
    pub is_safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rights_analysis_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_investment: Option<i64>,
    #[serde(default)]
    pub liquidity: Liquidity,
}

fn default_is_safe() -> bool {
    true
}

impl ListingRecord {
    pub fn new(case_id: impl Into<String>, property_kind: PropertyKind, location: Location) -> Self {
        Self {
            case_id: case_id.into(),
            court: None,
            property_kind,
            address: None,
            location,
            property_name: None,
            unit_label: None,
            area_m2: 0.0,
            appraisal_price: 0,
            minimum_price: 0,
            fail_count: 0,
            auction_date: None,
            is_safe: true,
            rights_analysis_text: None,
            required_investment: None,
            liquidity: Liquidity::default(),
        }
    }

    pub fn property_key(&self) -> PropertyKey {
        PropertyKey {
            property_name: self.property_name.clone().unwrap_or_default(),
            region: self.location.region.clone(),
            subregion: self.location.subregion.clone(),
        }
    }

    /// Floor number derived from a unit label such as "101동 1501호" (-> 15).
    pub fn unit_floor(&self) -> Option<u32> {
        let label = self.unit_label.as_deref()?;
        for (index, _) in label.match_indices('호') {
            let digits: String = label[..index]
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            if let Ok(unit) = digits.parse::<u32>() {
                return Some(unit / 100);
            }
        }
        None
    }

    /// Merge a re-ingested copy of this case with the stored `previous` one.
    ///
    /// Fail counts never move backwards, and a cached liquidity aggregate is
    /// kept when the incoming record does not carry one.
    pub fn merge_reingested(mut self, previous: &ListingRecord) -> ListingRecord {
        if self.fail_count < previous.fail_count {
            tracing::warn!(
                case_id = %self.case_id,
                incoming = self.fail_count,
                stored = previous.fail_count,
                "ignoring fail count regression on re-ingestion"
            );
            self.fail_count = previous.fail_count;
        }
        if self.liquidity.is_unknown() {
            self.liquidity = previous.liquidity;
        }
        self
    }
}

/// One observed real transaction for a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRecord {
    #[serde(default)]
    pub property_name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default, deserialize_with = "lenient_year")]
    pub deal_year: i32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub deal_month: u32,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub deal_price: i64,
    #[serde(default, deserialize_with = "lenient_area")]
    pub area_m2: f64,
    #[serde(
        default,
        deserialize_with = "lenient_floor",
        skip_serializing_if = "Option::is_none"
    )]
    pub floor: Option<i32>,
}

/// Reason a transaction is kept out of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DealRejection {
    #[error("deal month {0} outside 1..=12")]
    InvalidMonth(u32),
    #[error("deal has no property name")]
    MissingPropertyName,
}

impl DealRecord {
    pub fn key(&self) -> PropertyKey {
        PropertyKey {
            property_name: self.property_name.clone(),
            region: self.location.region.clone(),
            subregion: self.location.subregion.clone(),
        }
    }

    pub fn matches(&self, key: &PropertyKey) -> bool {
        self.property_name == key.property_name
            && self.location.region == key.region
            && self.location.subregion == key.subregion
    }

    /// Checks shared by every deal source before a record enters the history.
    pub fn validate(&self) -> Result<(), DealRejection> {
        if !(1..=12).contains(&self.deal_month) {
            return Err(DealRejection::InvalidMonth(self.deal_month));
        }
        if self.property_name.trim().is_empty() {
            return Err(DealRejection::MissingPropertyName);
        }
        Ok(())
    }
}

fn numeric_value(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|value| value.is_finite())
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    if let Some(Value::Number(number)) = &raw {
        if let Some(exact) = number.as_i64() {
            return Ok(exact);
        }
    }
    Ok(numeric_value(raw)
        .map(|value| (value + 0.5).floor() as i64)
        .unwrap_or(0))
}

fn lenient_area<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(numeric_value(raw).unwrap_or(0.0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(numeric_value(raw)
        .filter(|value| *value >= 0.0)
        .map(|value| value.min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

fn lenient_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(numeric_value(raw)
        .map(|value| value.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        .unwrap_or(0))
}

fn lenient_floor<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(numeric_value(raw).map(|value| value.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let Value::String(text) = value else {
            return None;
        };
        let trimmed = text.trim();
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| NaiveDate::parse_from_str(trimmed, "%Y.%m.%d").ok())
    }))
}
