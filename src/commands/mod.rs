//! Slash command front end
//!
//! Chat transports hand over one line per command. [`parse_line`] turns it
//! into a [`CommandRequest`]; [`CommandRouter`] runs it against the session
//! and collaborators and returns the reply text.

pub mod desk;
pub mod router;

pub use desk::OrderDesk;
pub use router::CommandRouter;

use crate::error::{OrderError, Result};

/// Channel used when a line does not name one
pub const DEFAULT_CHANNEL: &str = "#general";

/// Where a command came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub channel: String,
    /// Chat user name, when the transport knows it
    pub user: Option<String>,
}

impl Origin {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Command name including the leading slash
    pub name: String,
    pub args: Vec<String>,
    pub origin: Origin,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>, args: Vec<String>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            args,
            origin,
        }
    }
}

/// Parse `#channel user /cmd args...` or `/cmd args...`
///
/// Command arguments are split with shell quoting rules, so `"hot dog"` is
/// one argument. Blank lines and `# ...` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<CommandRequest>> {
    let mut prefix = Vec::new();
    let mut rest = line.trim();
    while !rest.starts_with('/') {
        if rest.is_empty() {
            return Ok(None);
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        prefix.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }

    let mut origin = Origin::default();
    match prefix.as_slice() {
        [] => {}
        ["#", ..] => return Ok(None),
        [channel] if channel.starts_with('#') => origin.channel = channel.to_string(),
        [channel, user] if channel.starts_with('#') => {
            origin.channel = channel.to_string();
            origin.user = Some(user.to_string());
        }
        other => {
            return Err(OrderError::Usage(format!(
                "Expected '#channel user /command', got '{}' before the command",
                other.join(" ")
            )))
        }
    }

    let mut words = shell_words::split(rest)
        .map_err(|e| OrderError::Usage(format!("Could not parse command line: {e}")))?
        .into_iter();
    let name = words.next().unwrap_or_default();
    Ok(Some(CommandRequest::new(name, words.collect(), origin)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_command() {
        let request = parse_line("/order bread 3").unwrap().unwrap();
        assert_eq!(request.name, "/order");
        assert_eq!(request.args, vec!["bread", "3"]);
        assert_eq!(request.origin, Origin::default());
    }

    #[test]
    fn test_channel_and_user_prefix() {
        let request = parse_line("#lunch alice /start 12:30").unwrap().unwrap();
        assert_eq!(request.origin.channel, "#lunch");
        assert_eq!(request.origin.user.as_deref(), Some("alice"));
        assert_eq!(request.args, vec!["12:30"]);

        let request = parse_line("#lunch /menu").unwrap().unwrap();
        assert_eq!(request.origin.channel, "#lunch");
        assert_eq!(request.origin.user, None);
    }

    #[test]
    fn test_quoted_arguments() {
        let request = parse_line(r#"/order "hot dog" 2"#).unwrap().unwrap();
        assert_eq!(request.args, vec!["hot dog", "2"]);
    }

    #[test]
    fn test_lines_without_command() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# just a note").unwrap(), None);
        assert_eq!(parse_line("# see /help").unwrap(), None);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            parse_line("alice /order bread 1"),
            Err(OrderError::Usage(_))
        ));
        assert!(matches!(
            parse_line(r#"/order "bread 1"#),
            Err(OrderError::Usage(_))
        ));
    }
}
