//! Application module
//!
//! Process-level concerns: command line settings, logging setup, fatal
//! error reporting and wiring the production collaborators together.

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod runtime;

pub use config::AppConfig;
pub use error_handling::handle_fatal_error;
pub use logging::init_logging;
pub use runtime::{build_router, load_bot_config, Services};
