//! # grill-orders
//!
//! Group ordering for a shared grill. A session opens with a deadline,
//! collects orders, and on close reports how long each item takes to cook
//! when everything is grilled back to back.
//!
//! ## Usage
//!
//! ```bash
//! grill-orders serve
//! grill-orders cook-time 10 4 30
//! ```
//!
//! ## Modules
//!
//! - `kitchen` - Batch and cook-time arithmetic
//! - `session` - Order queue, session state machine and close aggregation
//! - `commands` - Slash command parsing and dispatch
//! - `abstractions` - Catalog, sink, poster and describer traits with HTTP implementations
//! - `config` - Bot configuration from TOML and environment
//! - `error` - Error type and error code registry
//! - `app` - Logging, fatal error handling and runtime wiring
//! - `testing` - In-memory collaborators for tests
pub mod abstractions;
pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod kitchen;
pub mod session;

pub mod testing;

#[cfg(test)]
mod property_tests;
