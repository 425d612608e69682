//! Error types module
//!
//! Every failure the service surfaces is an `AppError`. How a variant is
//! rendered over HTTP (status, code, whether details may leak) is looked up in
//! a per-variant `Presentation` and exposed through `ErrorMetadata`.
//!
//! The `Database` variant carries a `sqlx::Error` only when the `sqlx` feature is on.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Level an error is logged at when it reaches the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected client mistakes
    Debug,
    Warn,
    /// Failures on our side
    Error,
}

/// How an error is presented to clients
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Machine-readable code, e.g. `NOT_FOUND`
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to return to the client
    fn client_message(&self) -> String;

    /// Whether internal details must be withheld from the response
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

impl Presentation {
    /// A failure on our side: 500, retryable, details withheld.
    const fn server(code: &'static str) -> Self {
        Self {
            status: 500,
            code,
            recoverable: true,
            action: Some("Retry after a short delay"),
            sensitive: true,
            level: LogLevel::Error,
        }
    }

    /// A problem with the request itself; the message is returned as-is.
    const fn client(status: u16, code: &'static str, action: &'static str) -> Self {
        Self {
            status,
            code,
            recoverable: false,
            action: Some(action),
            sensitive: false,
            level: LogLevel::Debug,
        }
    }

    const fn at(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

static DATABASE: Presentation = Presentation::server("DATABASE_ERROR");
static STORAGE: Presentation = Presentation::server("STORAGE_ERROR");
static INTERNAL: Presentation = Presentation::server("INTERNAL_ERROR");
static INVALID_INPUT: Presentation =
    Presentation::client(400, "INVALID_INPUT", "Check request parameters and try again");
static BAD_REQUEST: Presentation =
    Presentation::client(400, "BAD_REQUEST", "Check request format and parameters");
static NOT_FOUND: Presentation =
    Presentation::client(404, "NOT_FOUND", "Verify the resource ID exists");
static PAYLOAD_TOO_LARGE: Presentation =
    Presentation::client(413, "PAYLOAD_TOO_LARGE", "Reduce file size or number of files");
static UNAUTHORIZED: Presentation =
    Presentation::client(401, "UNAUTHORIZED", "Check API key").at(LogLevel::Warn);

impl AppError {
    fn presentation(&self) -> &'static Presentation {
        match self {
            AppError::Database(_) => &DATABASE,
            AppError::Storage(_) => &STORAGE,
            AppError::InvalidInput(_) => &INVALID_INPUT,
            AppError::BadRequest(_) => &BAD_REQUEST,
            AppError::NotFound(_) => &NOT_FOUND,
            AppError::PayloadTooLarge(_) => &PAYLOAD_TOO_LARGE,
            AppError::Unauthorized(_) => &UNAUTHORIZED,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => &INTERNAL,
        }
    }

    /// Variant name, shown in non-production error bodies
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Display text followed by up to five levels of `source()` causes.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        const MAX_DEPTH: usize = 5;

        let causes: Vec<String> = std::iter::successors(self.source(), |&err| err.source())
            .take(MAX_DEPTH + 1)
            .map(|err| err.to_string())
            .collect();

        let mut details = self.to_string();
        for (depth, cause) in causes.iter().enumerate() {
            if depth == MAX_DEPTH {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str("\n  Caused by: ");
            details.push_str(cause);
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::InvalidInput(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
        }
    }
}
