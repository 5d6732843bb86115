use thiserror::Error;

/// Centralized error types for the application
///
/// Storage, Telegram and configuration failures are all converted to this enum
/// so handlers can log and report them uniformly.
///
/// # Example
///
/// ```no_run
/// use adboard::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Chat platform failures that don't come from the Bot API itself
    #[error("Platform error: {0}")]
    Platform(String),

    /// JSON (de)serialization errors for stored ad records
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The super administrator cannot be demoted through the bot
    #[error("Super admin {0} cannot be removed")]
    SuperAdminProtected(i64),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_error_message() {
        let err = AppError::Platform("chat not found".to_string());
        assert_eq!(err.to_string(), "Platform error: chat not found");
    }

    #[test]
    fn test_super_admin_message() {
        let err = AppError::SuperAdminProtected(42);
        assert_eq!(err.to_string(), "Super admin 42 cannot be removed");
    }
}
