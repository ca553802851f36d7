//! The live encounter and its saved snapshots

mod service;
mod store;

pub use service::{DiceReport, EncounterService, Rules, ServiceError};
pub use store::{EncounterStore, SavedEncounter};
