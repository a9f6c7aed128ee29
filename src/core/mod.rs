//! Core datatypes and the chronological consolidation of transmission
//! events.

pub mod cohort;
pub mod event;
pub mod reorder;

pub use cohort::Cohort;
pub use event::{Individual, Infector, PersonId, RiskGroup, Sex, TransmissionEvent};
pub use reorder::reorder;
