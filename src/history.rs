//! Play history: a bounded, persisted list of recently played files.

mod model;
mod store;

pub use model::{HistoryEntry, display_name};
pub use store::HistoryStore;

#[cfg(test)]
mod tests;
