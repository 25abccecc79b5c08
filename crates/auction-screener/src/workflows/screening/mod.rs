//! Foreclosure-auction listing screening.
//!
//! Listings flow through a six-stage [`FilterPipeline`] that narrows a batch
//! to the cases worth bidding on, using liquidity figures aggregated from
//! real transaction history and cost projections from [`CostPolicy`].

pub mod domain;
pub mod filter;
pub mod metrics;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod turnover;

#[cfg(test)]
mod tests;

pub use domain::{
    DealRecord, DealRejection, Liquidity, ListingRecord, Location, PropertyKey, PropertyKind,
};
pub use filter::{
    FailCountRange, FilterConfig, FilterOverrides, FilterPipeline, FilterStage, KeywordCatalog,
    KeywordSet, PipelineOutcome, StageCount,
};
pub use metrics::{
    can_enter_with_budget, discount_rate, m2_to_pyeong, projected_profit, required_investment,
    CostPolicy, ProfitProjection, ProfitRequest,
};
pub use report::{summarize, FilteredResult, ListingMetrics, ResultSummary};
pub use repository::{
    upsert_into, DealHistory, ListingQuery, ListingStore, RepositoryError, SizeClass,
    UpsertSummary,
};
pub use router::screening_router;
pub use service::{LiquidityRefresh, ScreeningReport, ScreeningService, ScreeningServiceError};
pub use turnover::{aggregate, TurnoverIndex, TurnoverSnapshot};
