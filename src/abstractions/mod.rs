//! Abstraction layers for external collaborators
//!
//! The ordering core talks to the catalog backend, the order and summary
//! sinks, the chat transport and the image description helper only through
//! the traits in this module. HTTP implementations live in [`http`]; test
//! doubles live in [`crate::testing::mocks`].

pub mod catalog;
pub mod delivery;
pub mod describe;
pub mod http;
pub mod retry;

pub use catalog::{within, Catalog, ItemProfile, MenuSnapshot, NewMenuItem, ProfileLookup};
pub use delivery::{ConsolePoster, MessagePoster, OrderSink, OrderSubmission, SummarySubmission};
pub use describe::{HttpImageDescriber, ImageDescriber};
pub use http::HttpBackend;
pub use retry::RetryingSink;
