//! Integration tests for slash command handling

mod common;

use common::{router, router_with_settings, send};
use grill_orders::abstractions::ItemProfile;
use grill_orders::config::SessionSettings;
use grill_orders::testing::mocks::{MockCatalog, MockDescriber};
use grill_orders::testing::{next_finalized, TestContext};

#[tokio::test]
async fn test_greeting_and_help() {
    let ctx = TestContext::new();
    let router = router(&ctx);

    assert!(send(&router, "/hi").await.starts_with("Hi, I'm"));
    let help = send(&router, "/help").await;
    assert!(help.contains("/start {time}"));
    assert!(help.contains("/order {item_from_the_menu} {quantity}"));
    assert!(help.contains("/menu add"));
}

#[tokio::test]
async fn test_unknown_command() {
    let ctx = TestContext::new();
    let router = router(&ctx);

    assert_eq!(
        send(&router, "/dance").await,
        "Unknown command: /dance. Type /help to see what I can do."
    );
}

#[tokio::test]
async fn test_start_validation() {
    let ctx = TestContext::new();
    let router = router(&ctx);

    assert_eq!(
        send(&router, "/start").await,
        "Please specify the deadline time (in format HH:MM)."
    );
    assert_eq!(
        send(&router, "/start 7pm").await,
        "Invalid time format. Please use HH:MM format."
    );
    assert!(!router.session().is_open().await);
}

#[tokio::test]
async fn test_order_before_start() {
    let ctx = TestContext::new();
    let router = router(&ctx);

    // Session check comes before argument checks
    assert_eq!(
        send(&router, "#lunch alice /order").await,
        "Orders are not enabled. Start a new session with /start {time}."
    );
}

#[tokio::test]
async fn test_order_replies() {
    let ctx = TestContext::new();
    let router = router(&ctx);
    let reply = send(&router, "#lunch alice /start 23:59").await;
    assert_eq!(
        reply,
        "Order session started. You can place orders until 23:59."
    );

    assert_eq!(
        send(&router, "#lunch alice /order bread").await,
        "Please specify the item and quantity."
    );
    assert_eq!(
        send(&router, "#lunch alice /order bread lots").await,
        "Invalid quantity. Please enter a positive number."
    );
    assert_eq!(
        send(&router, "#lunch bob /order bread 2").await,
        "User ID not found."
    );
    assert_eq!(
        send(&router, "#lunch alice /order cake 2").await,
        "Item not found."
    );
    assert_eq!(
        send(&router, "#lunch alice /order bread 2").await,
        "Order placed: bread 2"
    );

    let orders = ctx.sink.wait_for_orders(1).await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].owner_id, "user-alice");
}

#[tokio::test]
async fn test_full_session_through_commands() {
    let ctx = TestContext::new();
    let settings = SessionSettings {
        default_owner: Some("alice".to_string()),
        ..SessionSettings::default()
    };
    let router = router_with_settings(&ctx, settings);
    let mut events = router.session().subscribe();

    send(&router, "#lunch /start 23:59").await;
    send(&router, "#lunch /order bread 3").await;
    send(&router, "#lunch /order bread 2").await;
    send(&router, "#lunch /order soup 5").await;

    let status = send(&router, "/status").await;
    assert!(status.contains("3 order(s), 10 item(s) pending"));

    assert_eq!(
        send(&router, "#lunch /close").await,
        "Order session closed with 2 item line(s)."
    );
    let outcome = next_finalized(&mut events).await;
    assert_eq!(outcome.lines()[1].cumulative_secs, 390);

    let (channel, report) = ctx.poster.messages().pop().unwrap();
    assert_eq!(channel, "#lunch");
    assert_eq!(
        report,
        "You have collectively ordered:\n\
         1. bread x5 -> 120 seconds to cook\n\
         2. soup x5 -> 390 seconds to cook\n\
         The order won't be received now - start a new order session with /start {time}."
    );
    assert_eq!(ctx.sink.summaries().len(), 2);

    assert_eq!(
        send(&router, "/close").await,
        "Orders are not enabled. Start a new session with /start {time}."
    );
}

#[tokio::test]
async fn test_restart_reports_discarded_orders() {
    let ctx = TestContext::new();
    let router = router(&ctx);

    send(&router, "#lunch alice /start 23:58").await;
    send(&router, "#lunch alice /order soup 1").await;
    let reply = send(&router, "#lunch alice /start 23:59").await;
    assert!(reply.ends_with("1 pending order(s) from the previous session were discarded."));
}

#[tokio::test]
async fn test_menu_listing() {
    let ctx = TestContext::new();
    let router = router(&ctx);
    assert_eq!(send(&router, "/menu").await, "Here is the menu:\nbread\nsoup");

    let empty = TestContext::with_catalog(MockCatalog::new());
    assert_eq!(
        send(&common::router(&empty), "/menu").await,
        "No items found in the menu."
    );

    let broken = TestContext::with_catalog(MockCatalog::new().failing());
    assert_eq!(
        send(&common::router(&broken), "/menu").await,
        "Failed to fetch the menu."
    );
}

#[tokio::test]
async fn test_menu_add() {
    let ctx = TestContext::new();
    let router = router(&ctx);

    assert_eq!(
        send(&router, r#"/menu add "hot dog" 6 2.5 240"#).await,
        "Successfully added item: hot dog"
    );
    let added = ctx.catalog.added_items();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].capacity_on_grill, 6);
    assert!(send(&router, "/menu").await.contains("hot dog"));

    assert!(send(&router, "/menu add kebab").await.starts_with("Usage:"));
    assert!(send(&router, "/menu remove bread").await.starts_with("Usage:"));

    let broken = TestContext::with_catalog(MockCatalog::new().failing());
    assert_eq!(
        send(&common::router(&broken), "/menu add corn 6 1 45").await,
        "Failed to add the item."
    );
}

#[tokio::test]
async fn test_added_item_can_be_ordered() {
    let ctx = TestContext::with_catalog(
        MockCatalog::new()
            .with_item(ItemProfile::new("bread", 60, 4))
            .with_user("alice", "user-alice"),
    );
    let router = router(&ctx);

    send(&router, "/menu add corn 6 1 45").await;
    send(&router, "#lunch alice /start 23:59").await;
    assert_eq!(
        send(&router, "#lunch alice /order corn 7").await,
        "Order placed: corn 7"
    );
    assert_eq!(ctx.sink.wait_for_orders(1).await[0].item_id, "added-corn");
}

#[tokio::test]
async fn test_receipt_description() {
    let mut ctx = TestContext::new();
    ctx.describer = MockDescriber::new().with_description("images/r1.png", "A grocery receipt.");
    let router = router(&ctx);

    assert_eq!(
        send(&router, "/receipt images/r1.png").await,
        "Image Description: A grocery receipt."
    );
    assert_eq!(
        send(&router, "/receipt images/missing.png").await,
        "Error getting image description from API."
    );
    assert_eq!(
        send(&router, "/receipt").await,
        "Please specify the receipt image path."
    );
    assert_eq!(
        ctx.describer.requests(),
        vec!["images/r1.png", "images/missing.png"]
    );
}
