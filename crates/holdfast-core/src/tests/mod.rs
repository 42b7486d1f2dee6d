//! Engine test suite.
//!
//! - `helpers.rs`: compact board builders shared by unit and integration
//!   tests
//! - `determinism.rs`: same seed, same game — across moves, economy, and
//!   whole AI rounds
//! - `integration.rs`: end-to-end scenarios exercising the full
//!   move/draft/turn loop

mod helpers;

// Re-export for convenience
pub use helpers::*;
