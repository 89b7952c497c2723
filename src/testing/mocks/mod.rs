//! Mock implementations for testing
//!
//! Every collaborator trait in [`crate::abstractions`] has an in-memory
//! double here. Doubles are `Clone` and share their recordings.

pub mod catalog;
pub mod delivery;
pub mod describe;

pub use catalog::MockCatalog;
pub use delivery::{RecordingPoster, RecordingSink};
pub use describe::MockDescriber;
