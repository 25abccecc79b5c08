mod config;
mod keywords;
pub mod stages;

pub use config::{FailCountRange, FilterConfig, FilterOverrides};
pub use keywords::{
    is_metro_region, KeywordCatalog, KeywordSet, METRO_REGIONS, RISK_KEYWORDS,
    SPECIAL_PROPERTY_KEYWORDS,
};

use super::domain::ListingRecord;
use super::metrics::CostPolicy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The six reductions, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    BasicTargeting,
    BidRound,
    Liquidity,
    InvestmentCeiling,
    RightsSafety,
    SpecialProperty,
}

impl FilterStage {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::BasicTargeting,
            Self::BidRound,
            Self::Liquidity,
            Self::InvestmentCeiling,
            Self::RightsSafety,
            Self::SpecialProperty,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::BasicTargeting => "Basic targeting",
            Self::BidRound => "Bid round",
            Self::Liquidity => "Liquidity",
            Self::InvestmentCeiling => "Investment ceiling",
            Self::RightsSafety => "Rights safety",
            Self::SpecialProperty => "Special property exclusion",
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::BasicTargeting => 1,
            Self::BidRound => 2,
            Self::Liquidity => 3,
            Self::InvestmentCeiling => 4,
            Self::RightsSafety => 5,
            Self::SpecialProperty => 6,
        }
    }
}

/// Listings left after a stage, kept for audit trails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: FilterStage,
    pub label: String,
    pub remaining: usize,
    pub excluded: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub input_count: usize,
    pub stages: Vec<StageCount>,
    pub survivors: Vec<ListingRecord>,
}

impl PipelineOutcome {
    pub fn remaining_after(&self, stage: FilterStage) -> Option<usize> {
        self.stages
            .iter()
            .find(|count| count.stage == stage)
            .map(|count| count.remaining)
    }
}

/// Stateless sequential filter over a listing batch.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    config: FilterConfig,
    policy: CostPolicy,
    keywords: KeywordCatalog,
}

impl FilterPipeline {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            policy: CostPolicy::standard(),
            keywords: KeywordCatalog::standard(),
        }
    }

    pub fn with_policy(mut self, policy: CostPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordCatalog) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn policy(&self) -> &CostPolicy {
        &self.policy
    }

    pub fn admits(&self, stage: FilterStage, listing: &ListingRecord) -> bool {
        match stage {
            FilterStage::BasicTargeting => stages::basic_targeting(listing, &self.config),
            FilterStage::BidRound => stages::bid_round(listing, &self.config),
            FilterStage::Liquidity => stages::liquidity(listing, &self.config),
            FilterStage::InvestmentCeiling => {
                stages::investment_ceiling(listing, &self.config, &self.policy)
            }
            FilterStage::RightsSafety => {
                stages::rights_safety(listing, &self.config, &self.keywords.risk)
            }
            FilterStage::SpecialProperty => {
                stages::special_property(listing, &self.config, &self.keywords.special)
            }
        }
    }

    /// Apply every stage in order. Survivors keep their original relative order.
    pub fn run(&self, batch: Vec<ListingRecord>) -> PipelineOutcome {
        self.run_stages(batch, FilterStage::ordered())
    }

    pub(crate) fn run_stages<I>(&self, mut batch: Vec<ListingRecord>, order: I) -> PipelineOutcome
    where
        I: IntoIterator<Item = FilterStage>,
    {
        let input_count = batch.len();
        let mut counts = Vec::with_capacity(6);

        for stage in order {
            let before = batch.len();
            batch.retain(|listing| self.admits(stage, listing));
            debug!(
                stage = stage.number(),
                label = stage.label(),
                remaining = batch.len(),
                "filter stage applied"
            );
            counts.push(StageCount {
                stage,
                label: stage.label().to_string(),
                remaining: batch.len(),
                excluded: before - batch.len(),
            });
        }

        info!(input_count, survivors = batch.len(), "listing batch screened");

        PipelineOutcome {
            input_count,
            stages: counts,
            survivors: batch,
        }
    }
}
