//! Error handling utilities

use crate::error::{describe_error_code, OrderError};
use tracing::error;

/// Handle fatal errors and exit with appropriate status code
///
/// An `OrderError` prints its user message, plus its code description and
/// the full cause chain when `verbose >= 1`. Anything else prints as-is and
/// exits with 1.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    let (report, exit_code) = fatal_report(&error, verbose);
    eprintln!("{report}");

    std::process::exit(exit_code)
}

/// Text printed for a fatal error and the exit code to leave with
fn fatal_report(error: &anyhow::Error, verbose: u8) -> (String, i32) {
    if let Some(order_err) = error.downcast_ref::<OrderError>() {
        let mut report = order_err.user_message();
        if verbose >= 1 {
            let code = order_err.code();
            report.push_str(&format!(
                "\n\n[E{code:04}] {}\nContext Chain:\n{}",
                describe_error_code(code),
                order_err.developer_message()
            ));
        }
        return (report, order_err.exit_code());
    }

    let mut report = format!("Error: {error}");
    if verbose >= 1 {
        report.push_str("\n\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            report.push_str(&format!("\n  {i}: {cause}"));
        }
    }
    (report, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_order_error_report() {
        let error = anyhow::Error::new(OrderError::InvalidCapacity {
            item: "bread".to_string(),
            capacity: 0,
        });
        let code = ErrorCode::ORDER_INVALID_CAPACITY;

        let (quiet, exit_code) = fatal_report(&error, 0);
        assert!(!quiet.contains(describe_error_code(code)));
        assert_ne!(exit_code, 0);

        let (verbose, _) = fatal_report(&error, 1);
        assert!(verbose.starts_with(&quiet));
        assert!(verbose.contains(&format!("[E{code:04}]")));
        assert!(verbose.contains(describe_error_code(code)));
    }

    #[test]
    fn test_other_error_report() {
        let error = anyhow::anyhow!("disk full").context("Failed to write report");

        let (quiet, exit_code) = fatal_report(&error, 0);
        assert_eq!(quiet, "Error: Failed to write report");
        assert_eq!(exit_code, 1);

        let (verbose, _) = fatal_report(&error, 2);
        assert!(verbose.contains("1: disk full"));
    }
}
