//! Statistical summaries of benchmark samples.

pub mod summary;

pub use summary::{StatsError, SummaryStatistics};
