//! Command dispatch

use super::desk::OrderDesk;
use super::CommandRequest;
use crate::abstractions::{within, Catalog, ImageDescriber, NewMenuItem};
use crate::error::{OrderError, Result};
use crate::session::OrderSession;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const GREETING: &str = "Hi, I'm the grill order bot. I got your command.";

const HELP: &str = "This bot collects group orders for the grill. Here's how it works:\n\
1. Type `/start {time}` to open an order session. `{time}` is an HH:MM deadline for today; \
after it no new orders are accepted and the collected orders are summarized.\n\
2. Type `/order {item_from_the_menu} {quantity}` to place an order.\n\
3. Type `/status` to see the open session and `/close` to summarize it before the deadline.\n\
NOTE: `/menu` shows the full menu. To add a product type \
`/menu add {item} {capacity_on_grill} {price} {seconds_to_cook}`, where {capacity_on_grill} is \
how many of the item fit on the grill at the same time and {seconds_to_cook} is how long one batch cooks.\n\
`/receipt {image_path}` describes a receipt image.";

const MENU_ADD_USAGE: &str =
    "Usage: /menu add {item} {capacity_on_grill} {price} {seconds_to_cook}";

pub struct CommandRouter {
    session: OrderSession,
    desk: OrderDesk,
    catalog: Arc<dyn Catalog>,
    describer: Arc<dyn ImageDescriber>,
    lookup_timeout: Duration,
}

impl CommandRouter {
    pub fn new(
        session: OrderSession,
        desk: OrderDesk,
        catalog: Arc<dyn Catalog>,
        describer: Arc<dyn ImageDescriber>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            session,
            desk,
            catalog,
            describer,
            lookup_timeout,
        }
    }

    pub fn session(&self) -> &OrderSession {
        &self.session
    }

    /// Run one command and return the reply for its channel
    pub async fn dispatch(&self, request: &CommandRequest) -> String {
        info!(
            "{} {} from {}",
            request.name,
            request.args.join(" "),
            request.origin.channel
        );
        let result = match request.name.as_str() {
            "/hi" => Ok(GREETING.to_string()),
            "/help" => Ok(HELP.to_string()),
            "/start" => self.start(request).await,
            "/order" => self.order(request).await,
            "/menu" => self.menu(request).await,
            "/receipt" => self.receipt(request).await,
            "/status" => Ok(self.session.status().await.describe()),
            "/close" => self.close().await,
            unknown => {
                debug!("Unknown command: {}", unknown);
                Ok(format!(
                    "Unknown command: {unknown}. Type /help to see what I can do."
                ))
            }
        };

        result.unwrap_or_else(|e| {
            debug!("{} rejected: {}", request.name, e);
            e.user_message()
        })
    }

    async fn start(&self, request: &CommandRequest) -> Result<String> {
        let Some(raw) = request.args.first() else {
            return Err(OrderError::Usage(
                "Please specify the deadline time (in format HH:MM).".to_string(),
            ));
        };
        let receipt = self
            .session
            .start_at(raw, request.origin.channel.as_str())
            .await?;

        let mut reply = format!(
            "Order session started. You can place orders until {}.",
            receipt.deadline.format("%H:%M")
        );
        if receipt.discarded > 0 {
            reply.push_str(&format!(
                " {} pending order(s) from the previous session were discarded.",
                receipt.discarded
            ));
        }
        Ok(reply)
    }

    async fn order(&self, request: &CommandRequest) -> Result<String> {
        if !self.session.is_open().await {
            return Err(OrderError::SessionNotOpen {
                state: self.session.status().await.state.name().to_string(),
            });
        }
        let [item, quantity, ..] = request.args.as_slice() else {
            return Err(OrderError::Usage(
                "Please specify the item and quantity.".to_string(),
            ));
        };

        let entry = self.desk.place_order(&request.origin, item, quantity).await?;
        Ok(format!("Order placed: {} {}", entry.item, entry.quantity))
    }

    async fn menu(&self, request: &CommandRequest) -> Result<String> {
        match request.args.first().map(String::as_str) {
            None => self.list_menu().await,
            Some("add") => self.add_to_menu(&request.args[1..]).await,
            Some(_) => Err(OrderError::Usage(MENU_ADD_USAGE.to_string())),
        }
    }

    async fn list_menu(&self) -> Result<String> {
        let items = match within("menu listing", self.lookup_timeout, self.catalog.list_items())
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!("Menu listing failed: {}", e);
                return Ok("Failed to fetch the menu.".to_string());
            }
        };
        if items.is_empty() {
            return Ok("No items found in the menu.".to_string());
        }
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        Ok(format!("Here is the menu:\n{}", names.join("\n")))
    }

    async fn add_to_menu(&self, args: &[String]) -> Result<String> {
        let new_item = parse_new_item(args)?;
        match self.catalog.add_item(&new_item).await {
            Ok(()) => {
                info!("Added '{}' to the menu", new_item.name);
                Ok(format!("Successfully added item: {}", new_item.name))
            }
            Err(e) => {
                warn!("Adding '{}' failed: {}", new_item.name, e);
                Ok("Failed to add the item.".to_string())
            }
        }
    }

    async fn receipt(&self, request: &CommandRequest) -> Result<String> {
        let Some(path) = request.args.first() else {
            return Err(OrderError::Usage(
                "Please specify the receipt image path.".to_string(),
            ));
        };
        match self.describer.describe(path).await {
            Ok(description) => Ok(format!("Image Description: {description}")),
            Err(e) => {
                warn!("Describing {} failed: {}", path, e);
                Ok("Error getting image description from API.".to_string())
            }
        }
    }

    async fn close(&self) -> Result<String> {
        let outcome = self.session.finalize().await?;
        Ok(format!(
            "Order session closed with {} item line(s).",
            outcome.lines().len()
        ))
    }
}

fn parse_new_item(args: &[String]) -> Result<NewMenuItem> {
    let usage = || OrderError::Usage(MENU_ADD_USAGE.to_string());
    let [name, capacity, price, seconds, ..] = args else {
        return Err(usage());
    };
    let capacity_on_grill: u32 = capacity.parse().map_err(|_| usage())?;
    if capacity_on_grill == 0 {
        return Err(OrderError::InvalidCapacity {
            item: name.clone(),
            capacity: 0,
        });
    }
    Ok(NewMenuItem {
        name: name.clone(),
        capacity_on_grill,
        price: price.parse().map_err(|_| usage())?,
        seconds_to_cook: seconds.parse().map_err(|_| usage())?,
    })
}
