mod summary;
pub mod views;

pub use summary::summarize;
pub use views::{FilteredResult, ListingMetrics, ResultSummary};
