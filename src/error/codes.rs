/// Error code registry for grill-orders
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Session errors
/// - 3000-3999: Order validation errors
/// - 4000-4999: Catalog errors
/// - 5000-5999: Delivery errors (sinks, message posting, helpers)
/// - 9000-9999: Other errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Session errors (2000-2999)
    pub const SESSION_GENERIC: u16 = 2000;
    pub const SESSION_NOT_OPEN: u16 = 2006;
    pub const SESSION_INVALID_DEADLINE: u16 = 2010;

    // Order validation errors (3000-3999)
    pub const ORDER_GENERIC: u16 = 3000;
    pub const ORDER_MALFORMED_QUANTITY: u16 = 3001;
    pub const ORDER_INVALID_CAPACITY: u16 = 3002;
    pub const ORDER_USAGE: u16 = 3003;

    // Catalog errors (4000-4999)
    pub const CATALOG_GENERIC: u16 = 4000;
    pub const CATALOG_LOOKUP_FAILED: u16 = 4001;
    pub const CATALOG_ITEM_NOT_FOUND: u16 = 4002;
    pub const CATALOG_USER_NOT_FOUND: u16 = 4003;

    // Delivery errors (5000-5999)
    pub const DELIVERY_GENERIC: u16 = 5000;
    pub const DELIVERY_REJECTED: u16 = 5001;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid TOML syntax in configuration",
        1004 => "Required configuration field is missing",
        1005 => "Invalid value in configuration",

        2000 => "Generic session error",
        2006 => "Order session is not open",
        2010 => "Deadline could not be parsed",

        3000 => "Generic order error",
        3001 => "Quantity is not a positive whole number",
        3002 => "Grill capacity must be at least one",
        3003 => "Command arguments are missing or malformed",

        4000 => "Generic catalog error",
        4001 => "Catalog lookup failed",
        4002 => "Item not found in catalog",
        4003 => "User not found in catalog",

        5000 => "Generic delivery error",
        5001 => "Collaborator rejected the request",

        9000 => "Generic error",
        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_have_descriptions() {
        for code in [
            ErrorCode::CONFIG_NOT_FOUND,
            ErrorCode::SESSION_NOT_OPEN,
            ErrorCode::ORDER_INVALID_CAPACITY,
            ErrorCode::CATALOG_LOOKUP_FAILED,
            ErrorCode::DELIVERY_REJECTED,
        ] {
            assert_ne!(describe_error_code(code), "Unknown error code");
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(describe_error_code(4242), "Unknown error code");
    }
}
