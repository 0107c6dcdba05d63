//! Core acquisition, caching and normalisation logic

pub mod align;
pub mod cache;
pub mod config;
pub mod fetcher;
pub mod inflation;
pub mod log;
pub mod normalize;
pub mod pipeline;
pub mod quote;
pub mod series;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for cleaner imports
pub use cache::{IncrementalCache, SeriesStore};
pub use pipeline::{Pipeline, PipelineReport, SeriesSummary};
pub use quote::{QuoteProvider, QuoteQuery, QuoteTable};
pub use series::{SeriesCache, SeriesKind, YearRange};
