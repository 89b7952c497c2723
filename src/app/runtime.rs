//! Runtime wiring
//!
//! Builds the production collaborators from a validated [`BotConfig`] and
//! connects them to a session and command router.

use crate::abstractions::{
    Catalog, ConsolePoster, HttpBackend, HttpImageDescriber, ImageDescriber, MessagePoster,
    OrderSink, RetryingSink,
};
use crate::app::config::AppConfig;
use crate::commands::{CommandRouter, OrderDesk};
use crate::config::{BotConfig, ConfigLoader};
use crate::error::Result;
use crate::session::{Collaborators, OrderSession};
use std::sync::Arc;
use tracing::debug;

/// Load and validate the bot configuration for this process
pub async fn load_bot_config(app: &AppConfig) -> Result<BotConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &app.config_path {
        loader = loader.with_path(path);
    }
    let config = loader.load().await?;
    config.validate()?;
    Ok(config)
}

/// Shared collaborators behind the trait objects the core uses
pub struct Services {
    pub catalog: Arc<dyn Catalog>,
    pub sink: Arc<dyn OrderSink>,
    pub poster: Arc<dyn MessagePoster>,
    pub describer: Arc<dyn ImageDescriber>,
}

impl Services {
    /// HTTP backend with retrying delivery and console output
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let backend = Arc::new(HttpBackend::new(config.backend.clone())?);
        let sink = RetryingSink::new(
            backend.as_ref().clone(),
            config.delivery.max_retries,
            config.delivery.retry_delay,
        );
        let describer =
            HttpImageDescriber::new(config.describe.url.clone(), config.backend.request_timeout)?;
        debug!("Backend services configured");

        Ok(Self {
            catalog: backend,
            sink: Arc::new(sink),
            poster: Arc::new(ConsolePoster),
            describer: Arc::new(describer),
        })
    }
}

/// Wire a fresh session and its command router
pub fn build_router(config: &BotConfig, services: Services) -> CommandRouter {
    let lookup_timeout = config.backend.lookup_timeout;
    let session = OrderSession::new(Collaborators {
        catalog: services.catalog.clone(),
        sink: services.sink.clone(),
        poster: services.poster,
        lookup_timeout,
    });
    let desk = OrderDesk::new(
        session.clone(),
        services.catalog.clone(),
        services.sink,
        config.session.clone(),
        lookup_timeout,
    );
    CommandRouter::new(
        session,
        desk,
        services.catalog,
        services.describer,
        lookup_timeout,
    )
}
