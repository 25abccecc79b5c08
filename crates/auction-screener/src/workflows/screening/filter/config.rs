use serde::{Deserialize, Serialize};

use super::super::domain::PropertyKind;
use super::super::metrics::DEFAULT_BUDGET;

/// Inclusive range of prior failed bidding rounds, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct FailCountRange {
    pub min: u32,
    pub max: u32,
}

impl FailCountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, fail_count: u32) -> bool {
        fail_count >= self.min && fail_count <= self.max
    }
}

impl From<[u32; 2]> for FailCountRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<FailCountRange> for [u32; 2] {
    fn from(range: FailCountRange) -> Self {
        [range.min, range.max]
    }
}

/// Per-request screening parameters supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    pub property_kind: PropertyKind,
    pub min_area_m2: f64,
    pub exclude_metro_regions: bool,
    pub fail_count_range: FailCountRange,
    pub min_turnover_rate: f64,
    pub max_investment: i64,
    pub safe_only: bool,
    pub exclude_special_properties: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            property_kind: PropertyKind::Apt,
            min_area_m2: 59.0,
            exclude_metro_regions: true,
            fail_count_range: FailCountRange::new(0, 3),
            min_turnover_rate: 3.0,
            max_investment: DEFAULT_BUDGET,
            safe_only: true,
            exclude_special_properties: true,
        }
    }
}

/// Flat, all-optional form of [`FilterConfig`] used by query strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOverrides {
    pub property_kind: Option<String>,
    pub min_area_m2: Option<f64>,
    pub exclude_metro_regions: Option<bool>,
    pub fail_count_min: Option<u32>,
    pub fail_count_max: Option<u32>,
    pub min_turnover_rate: Option<f64>,
    pub max_investment: Option<i64>,
    pub safe_only: Option<bool>,
    pub exclude_special_properties: Option<bool>,
}

impl FilterOverrides {
    pub fn apply(self, mut config: FilterConfig) -> FilterConfig {
        if let Some(kind) = self.property_kind.as_deref() {
            config.property_kind = PropertyKind::from_code(kind);
        }
        if let Some(value) = self.min_area_m2 {
            config.min_area_m2 = value;
        }
        if let Some(value) = self.exclude_metro_regions {
            config.exclude_metro_regions = value;
        }
        if let Some(value) = self.fail_count_min {
            config.fail_count_range.min = value;
        }
        if let Some(value) = self.fail_count_max {
            config.fail_count_range.max = value;
        }
        if let Some(value) = self.min_turnover_rate {
            config.min_turnover_rate = value;
        }
        if let Some(value) = self.max_investment {
            config.max_investment = value;
        }
        if let Some(value) = self.safe_only {
            config.safe_only = value;
        }
        if let Some(value) = self.exclude_special_properties {
            config.exclude_special_properties = value;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_fields_fall_back_to_defaults() {
        let config: FilterConfig = serde_json::from_value(json!({
            "minTurnoverRate": 4.5,
            "failCountRange": [1, 2]
        }))
        .expect("config parses");

        assert_eq!(config.min_turnover_rate, 4.5);
        assert_eq!(config.fail_count_range, FailCountRange::new(1, 2));
        assert_eq!(config.max_investment, 50_000_000);
        assert_eq!(config.min_area_m2, 59.0);
        assert!(config.safe_only);
        assert!(config.exclude_metro_regions);
        assert_eq!(config.property_kind, PropertyKind::Apt);
    }

    #[test]
    fn fail_count_range_serializes_as_pair() {
        let value = serde_json::to_value(FilterConfig::default()).expect("serializes");
        assert_eq!(value["failCountRange"], json!([0, 3]));
        assert_eq!(value["propertyKind"], json!("APT"));
    }

    #[test]
    fn overrides_only_touch_supplied_fields() {
        let overrides = FilterOverrides {
            property_kind: Some("officetel".to_string()),
            fail_count_max: Some(5),
            safe_only: Some(false),
            ..FilterOverrides::default()
        };

        let config = overrides.apply(FilterConfig::default());

        assert_eq!(config.property_kind, PropertyKind::Officetel);
        assert_eq!(config.fail_count_range, FailCountRange::new(0, 5));
        assert!(!config.safe_only);
        assert!(config.exclude_special_properties);
    }
}
