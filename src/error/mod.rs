use std::time::Duration;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for grill-orders
///
/// Every failure the ordering core can report is a variant here so that the
/// command layer can turn it into a reply for the requester. None of these
/// are fatal to the process.
#[derive(Error, Debug)]
pub enum OrderError {
    /// An operation that needs an open session ran while Idle or Closed
    #[error("[E{code:04}] Session is not open (state: {state})", code = ErrorCode::SESSION_NOT_OPEN)]
    SessionNotOpen { state: String },

    /// The calculator was handed a zero grill capacity
    #[error("[E{code:04}] Invalid grill capacity {capacity} for '{item}'", code = ErrorCode::ORDER_INVALID_CAPACITY)]
    InvalidCapacity { item: String, capacity: u32 },

    /// Quantity was non-numeric or not positive
    #[error("[E{code:04}] Malformed quantity '{raw}'", code = ErrorCode::ORDER_MALFORMED_QUANTITY)]
    MalformedQuantity { raw: String },

    /// Deadline was not an HH:MM time of day
    #[error("[E{code:04}] Invalid deadline '{raw}'", code = ErrorCode::SESSION_INVALID_DEADLINE)]
    InvalidDeadline { raw: String },

    /// Catalog could not be reached or answered garbage; callers degrade
    #[error("[E{code:04}] Catalog lookup failed: {message}", code = ErrorCode::CATALOG_LOOKUP_FAILED)]
    CatalogLookupFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Item '{0}' not found in catalog", code = ErrorCode::CATALOG_ITEM_NOT_FOUND)]
    ItemNotFound(String),

    #[error("[E{code:04}] User '{0}' not found in catalog", code = ErrorCode::CATALOG_USER_NOT_FOUND)]
    UserNotFound(String),

    /// A sink, poster or helper service refused or failed a request
    #[error("[E{code:04}] Delivery to {target} failed: {message}", code = ErrorCode::DELIVERY_GENERIC)]
    Delivery {
        target: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Command arguments missing or unusable; the message is the reply
    #[error("[E{code:04}] {0}", code = ErrorCode::ORDER_USAGE)]
    Usage(String),

    #[error("[E{code:04}] Configuration error: {message}")]
    Config { code: u16, message: String },
}

impl OrderError {
    /// Create a soft catalog failure
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::CatalogLookupFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a catalog failure for a lookup that exceeded its time budget
    pub fn catalog_timeout(what: &str, after: Duration) -> Self {
        Self::catalog(format!("{what} timed out after {after:?}"))
    }

    /// Create a delivery failure
    pub fn delivery(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            target: target.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
        }
    }

    /// Attach a source error where the variant carries one
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::CatalogLookupFailed { source: src, .. } | Self::Delivery { source: src, .. } => {
                *src = Some(source.into());
            }
            _ => {}
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::SessionNotOpen { .. } => ErrorCode::SESSION_NOT_OPEN,
            Self::InvalidCapacity { .. } => ErrorCode::ORDER_INVALID_CAPACITY,
            Self::MalformedQuantity { .. } => ErrorCode::ORDER_MALFORMED_QUANTITY,
            Self::InvalidDeadline { .. } => ErrorCode::SESSION_INVALID_DEADLINE,
            Self::CatalogLookupFailed { .. } => ErrorCode::CATALOG_LOOKUP_FAILED,
            Self::ItemNotFound(_) => ErrorCode::CATALOG_ITEM_NOT_FOUND,
            Self::UserNotFound(_) => ErrorCode::CATALOG_USER_NOT_FOUND,
            Self::Delivery { .. } => ErrorCode::DELIVERY_GENERIC,
            Self::Usage(_) => ErrorCode::ORDER_USAGE,
            Self::Config { code, .. } => *code,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::SessionNotOpen { .. } | Self::InvalidDeadline { .. } => 3,
            Self::InvalidCapacity { .. } | Self::MalformedQuantity { .. } | Self::Usage(_) => 4,
            Self::CatalogLookupFailed { .. } | Self::ItemNotFound(_) | Self::UserNotFound(_) => 5,
            Self::Delivery { .. } => 6,
        }
    }

    /// Soft errors degrade the operation instead of aborting it
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::CatalogLookupFailed { .. } | Self::Delivery { .. })
    }

    /// Reply text for the person who issued the command
    pub fn user_message(&self) -> String {
        match self {
            Self::SessionNotOpen { .. } => {
                "Orders are not enabled. Start a new session with /start {time}.".to_string()
            }
            Self::InvalidCapacity { item, .. } => {
                format!("Item '{item}' has no grill capacity configured.")
            }
            Self::MalformedQuantity { .. } => {
                "Invalid quantity. Please enter a positive number.".to_string()
            }
            Self::InvalidDeadline { .. } => {
                "Invalid time format. Please use HH:MM format.".to_string()
            }
            Self::CatalogLookupFailed { .. } => "Failed to fetch item data.".to_string(),
            Self::ItemNotFound(_) => "Item not found.".to_string(),
            Self::UserNotFound(_) => "User ID not found.".to_string(),
            Self::Delivery { target, .. } => format!("Could not reach the {target}."),
            Self::Usage(message) => message.clone(),
            Self::Config { message, .. } => format!("Configuration problem: {message}"),
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        message
    }
}

/// Type alias for Results using OrderError
pub type Result<T> = std::result::Result<T, OrderError>;

impl From<toml::de::Error> for OrderError {
    fn from(err: toml::de::Error) -> Self {
        OrderError::config_with_code(
            ErrorCode::CONFIG_INVALID_TOML,
            format!("Invalid TOML syntax: {err}"),
        )
    }
}

impl From<reqwest::Error> for OrderError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_decode() {
            "response body could not be decoded".to_string()
        } else {
            "request failed".to_string()
        };
        OrderError::catalog(message).with_source(err)
    }
}
