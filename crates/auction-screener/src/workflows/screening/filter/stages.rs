use tracing::debug;

use super::super::domain::{ListingRecord, PropertyKind};
use super::super::metrics::CostPolicy;
use super::config::FilterConfig;
use super::keywords::{is_metro_region, KeywordSet};

/// Stage 1: property kind, minimum area and metro-region exclusion.
pub fn basic_targeting(listing: &ListingRecord, config: &FilterConfig) -> bool {
    if listing.property_kind == PropertyKind::Unknown
        || listing.property_kind != config.property_kind
    {
        return false;
    }
    if listing.area_m2 < config.min_area_m2 {
        return false;
    }
    !(config.exclude_metro_regions && is_metro_region(&listing.location.region))
}

/// Stage 2: prior failed rounds inside the configured inclusive range.
pub fn bid_round(listing: &ListingRecord, config: &FilterConfig) -> bool {
    config.fail_count_range.contains(listing.fail_count)
}

/// Stage 3: turnover at or above the floor. Listings without turnover data
/// are kept, not excluded.
pub fn liquidity(listing: &ListingRecord, config: &FilterConfig) -> bool {
    match listing.liquidity.turnover_rate {
        None => true,
        Some(rate) => rate >= config.min_turnover_rate,
    }
}

/// Required investment for a listing: the precomputed figure when the source
/// supplied a positive one, otherwise recomputed from the minimum price.
pub fn effective_investment(listing: &ListingRecord, policy: &CostPolicy) -> i64 {
    match listing.required_investment {
        Some(value) if value > 0 => value,
        _ => policy.required_investment(listing.minimum_price),
    }
}

/// Stage 4: required investment within the ceiling.
pub fn investment_ceiling(
    listing: &ListingRecord,
    config: &FilterConfig,
    policy: &CostPolicy,
) -> bool {
    effective_investment(listing, policy) <= config.max_investment
}

/// Stage 5: upstream safety flag plus a scan of the rights analysis text.
pub fn rights_safety(listing: &ListingRecord, config: &FilterConfig, risk: &KeywordSet) -> bool {
    if !config.safe_only {
        return true;
    }
    if !listing.is_safe {
        return false;
    }

    let text = listing.rights_analysis_text.as_deref().unwrap_or_default();
    match risk.first_match(text) {
        Some(keyword) => {
            debug!(case_id = %listing.case_id, keyword, "risk keyword in rights analysis");
            false
        }
        None => true,
    }
}

/// Stage 6: special-property terms in the address or rights analysis.
pub fn special_property(
    listing: &ListingRecord,
    config: &FilterConfig,
    special: &KeywordSet,
) -> bool {
    if !config.exclude_special_properties {
        return true;
    }

    let text = format!(
        "{} {}",
        listing.address.as_deref().unwrap_or_default(),
        listing.rights_analysis_text.as_deref().unwrap_or_default()
    );
    match special.first_match(&text) {
        Some(keyword) => {
            debug!(case_id = %listing.case_id, keyword, "special property keyword");
            false
        }
        None => true,
    }
}
