use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Required configuration is missing or invalid
    ConfigError(String),
    /// Login was rejected or could not complete
    AuthError(String),
    /// Network request failed
    NetworkError(String),
    /// The API answered with an application-level error
    ApiError { endpoint: String, message: String },
    /// Invalid input format
    InvalidInput(String),
    /// CSV serialization failed
    CsvError(String),
    /// IO operation failed
    IoError(String),
    /// Invalid URL format
    UrlError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            AppError::AuthError(msg) => write!(f, "Authentication error: {msg}"),
            AppError::NetworkError(msg) => write!(f, "Network error: {msg}"),
            AppError::ApiError { endpoint, message } => {
                write!(f, "API error from {endpoint}: {message}")
            }
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            AppError::CsvError(msg) => write!(f, "CSV error: {msg}"),
            AppError::IoError(msg) => write!(f, "IO error: {msg}"),
            AppError::UrlError(msg) => write!(f, "Invalid URL: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::CsvError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn test_config_error_display() {
        let err = AppError::ConfigError("Missing required environment variable NSE_KEY_ID".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("NSE_KEY_ID"));
    }

    #[test]
    fn test_auth_error_display() {
        let err = AppError::AuthError("Login rejected: 401".into());
        assert!(err.to_string().contains("Authentication error"));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_api_error_display_includes_endpoint() {
        let err = AppError::ApiError {
            endpoint: "/api/session.list".into(),
            message: "org not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/api/session.list"));
        assert!(msg.contains("org not found"));
    }

    #[test]
    fn test_network_error_display() {
        let err = AppError::NetworkError("Connection timeout".to_string());
        assert!(err.to_string().contains("Network error"));
        assert!(err.to_string().contains("Connection timeout"));
    }

    #[test]
    fn test_invalid_input_error_display() {
        let err = AppError::InvalidInput("Not a timestamp".to_string());
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        use std::error::Error;
        let err: Box<dyn Error> = Box::new(AppError::CsvError("test".to_string()));
        assert!(!err.to_string().is_empty());
    }
}
