//! Structured error metadata shared by all service errors.

/// Grepable error code and retryable flag for errors crossing the API
/// boundary. The browser uses `retryable` to word the error banner.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
