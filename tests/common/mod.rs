//! Shared helpers for integration tests

use grill_orders::commands::{parse_line, CommandRouter, OrderDesk};
use grill_orders::config::SessionSettings;
use grill_orders::testing::TestContext;
use std::sync::Arc;

/// Router wired to the context's in-memory collaborators
pub fn router(ctx: &TestContext) -> CommandRouter {
    router_with_settings(ctx, SessionSettings::default())
}

pub fn router_with_settings(ctx: &TestContext, settings: SessionSettings) -> CommandRouter {
    let session = ctx.session();
    let desk = OrderDesk::new(
        session.clone(),
        Arc::new(ctx.catalog.clone()),
        Arc::new(ctx.sink.clone()),
        settings,
        ctx.lookup_timeout,
    );
    CommandRouter::new(
        session,
        desk,
        Arc::new(ctx.catalog.clone()),
        Arc::new(ctx.describer.clone()),
        ctx.lookup_timeout,
    )
}

/// Parse and dispatch one input line
pub async fn send(router: &CommandRouter, line: &str) -> String {
    let request = parse_line(line)
        .expect("line should parse")
        .expect("line should hold a command");
    router.dispatch(&request).await
}
