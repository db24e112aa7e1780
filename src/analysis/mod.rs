//! Summary aggregation.

pub mod aggregator;

pub use aggregator::{generate_summary, SummaryOptions};
