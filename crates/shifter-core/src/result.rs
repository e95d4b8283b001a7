//! Result type alias for migration operations

use crate::error::ShifterError;

/// Standard Result type for migration operations
pub type Result<T> = std::result::Result<T, ShifterError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                if err.is_recoverable() {
                    tracing::warn!("Continuing after error: {}", err);
                } else {
                    tracing::error!("Fatal error: {}", err);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_and_continue() {
        let ok: Result<u32> = Ok(1);
        assert_eq!(ok.log_and_continue(), Some(1));

        let soft: Result<u32> = Err(ShifterError::invalid_tree("bad root"));
        assert_eq!(soft.log_and_continue(), None);

        let hard: Result<u32> = Err(ShifterError::config_error("bad"));
        assert_eq!(hard.log_and_continue(), None);
    }
}
