use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{DealRecord, ListingRecord};
use super::filter::{FilterConfig, FilterPipeline, KeywordCatalog, StageCount};
use super::metrics::{CostPolicy, ProfitProjection, ProfitRequest};
use super::report::{summarize, FilteredResult, ResultSummary};
use super::repository::{
    DealHistory, ListingQuery, ListingStore, RepositoryError, UpsertSummary,
};
use super::turnover::{aggregate, DEAL_WINDOW};

/// Full answer to a screening request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningReport {
    pub config: FilterConfig,
    pub input_count: usize,
    pub stages: Vec<StageCount>,
    pub results: Vec<FilteredResult>,
    pub summary: ResultSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRefresh {
    pub listings: usize,
    pub with_deals: usize,
}

/// Service composing the listing store, deal history and filter pipeline.
pub struct ScreeningService<S, D> {
    store: Arc<S>,
    deals: Arc<D>,
    keywords: KeywordCatalog,
    policy: CostPolicy,
}

impl<S, D> ScreeningService<S, D>
where
    S: ListingStore + 'static,
    D: DealHistory + 'static,
{
    pub fn new(store: Arc<S>, deals: Arc<D>) -> Self {
        Self {
            store,
            deals,
            keywords: KeywordCatalog::standard(),
            policy: CostPolicy::standard(),
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordCatalog) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_policy(mut self, policy: CostPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &CostPolicy {
        &self.policy
    }

    pub fn pipeline(&self, config: FilterConfig) -> FilterPipeline {
        FilterPipeline::new(config)
            .with_policy(self.policy)
            .with_keywords(self.keywords.clone())
    }

    /// Upsert listings keyed by case id.
    pub fn ingest_listings(
        &self,
        listings: Vec<ListingRecord>,
    ) -> Result<UpsertSummary, ScreeningServiceError> {
        if let Some(position) = listings
            .iter()
            .position(|listing| listing.case_id.trim().is_empty())
        {
            return Err(ScreeningServiceError::MissingCaseId(position));
        }

        let summary = self.store.upsert(listings)?;
        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            "listings ingested"
        );
        Ok(summary)
    }

    /// Append valid deals to the history; invalid ones are skipped and the
    /// accepted count is returned.
    pub fn ingest_deals(&self, deals: Vec<DealRecord>) -> Result<usize, ScreeningServiceError> {
        let received = deals.len();
        let accepted: Vec<DealRecord> = deals
            .into_iter()
            .enumerate()
            .filter_map(|(position, deal)| match deal.validate() {
                Ok(()) => Some(deal),
                Err(reason) => {
                    warn!(position, %reason, "skipping deal");
                    None
                }
            })
            .collect();

        let appended = self.deals.append(accepted)?;
        info!(received, appended, "deal history appended");
        Ok(appended)
    }

    /// Recompute and store the liquidity aggregate of every stored listing.
    pub fn refresh_liquidity(&self) -> Result<LiquidityRefresh, ScreeningServiceError> {
        let listings = self.store.listings(&ListingQuery::default())?;
        let mut refresh = LiquidityRefresh::default();

        for listing in &listings {
            let deals = self.deals.recent_deals(&listing.property_key(), DEAL_WINDOW)?;
            let snapshot = aggregate(&deals);
            self.store
                .record_liquidity(&listing.case_id, snapshot.liquidity())?;

            refresh.listings += 1;
            if snapshot.deal_count > 0 {
                refresh.with_deals += 1;
            }
        }

        info!(
            listings = refresh.listings,
            with_deals = refresh.with_deals,
            "turnover rates refreshed"
        );
        Ok(refresh)
    }

    /// Screen stored listings selected by `query`.
    pub fn screen(
        &self,
        query: &ListingQuery,
        config: FilterConfig,
    ) -> Result<ScreeningReport, ScreeningServiceError> {
        let listings = self.store.listings(query)?;
        Ok(self.screen_batch(listings, config))
    }

    /// Screen an in-memory batch without touching the store.
    pub fn screen_batch(&self, listings: Vec<ListingRecord>, config: FilterConfig) -> ScreeningReport {
        let pipeline = self.pipeline(config);
        let outcome = pipeline.run(listings);

        let results: Vec<FilteredResult> = outcome
            .survivors
            .into_iter()
            .map(|listing| FilteredResult::new(listing, &self.policy))
            .collect();
        let summary = summarize(&results);

        ScreeningReport {
            config: pipeline.config().clone(),
            input_count: outcome.input_count,
            stages: outcome.stages,
            results,
            summary,
        }
    }

    pub fn project_profit(&self, request: &ProfitRequest) -> ProfitProjection {
        self.policy.project(request)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error("listing at position {0} has no case id")]
    MissingCaseId(usize),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
