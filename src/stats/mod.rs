//! Summary statistics over exported transmission networks.

pub mod offspring;

pub use offspring::{OffspringSummary, offspring_counts, summarize};
