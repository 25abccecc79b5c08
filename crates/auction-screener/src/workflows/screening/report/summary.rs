use std::collections::BTreeMap;

use super::super::metrics::{round_half_up, round_tenth};
use super::views::{FilteredResult, ResultSummary};

/// Aggregate statistics over a filtered batch.
///
/// Turnover is averaged over results with known liquidity only; an empty
/// batch yields zeros and an empty breakdown.
pub fn summarize(results: &[FilteredResult]) -> ResultSummary {
    if results.is_empty() {
        return ResultSummary::default();
    }

    let count = results.len();
    let discount_total: f64 = results.iter().map(|r| r.metrics.discount_rate).sum();
    let investment_total: f64 = results
        .iter()
        .map(|r| r.metrics.required_investment as f64)
        .sum();

    let turnover: Vec<f64> = results
        .iter()
        .filter_map(|r| r.listing.liquidity.turnover_rate)
        .collect();
    let avg_turnover_rate = if turnover.is_empty() {
        0.0
    } else {
        round_tenth(turnover.iter().sum::<f64>() / turnover.len() as f64)
    };

    let mut region_breakdown = BTreeMap::new();
    for result in results {
        *region_breakdown
            .entry(result.listing.location.region.clone())
            .or_insert(0) += 1;
    }

    ResultSummary {
        count,
        avg_discount_rate: round_tenth(discount_total / count as f64),
        avg_investment: round_half_up(investment_total / count as f64) as i64,
        avg_turnover_rate,
        region_breakdown,
    }
}
