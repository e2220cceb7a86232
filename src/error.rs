use thiserror::Error;

/// Message shown on the error panel when a failure carries no text of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "出错了，请检查网络或稍后重试。";

/// Failure of the itinerary generation step. Fatal to the current cycle.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Generation service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to generate itinerary: the service returned an empty response")]
    EmptyResponse,

    #[error("Request was blocked by the generation service: {0}")]
    Blocked(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GenerationError>;

impl GenerationError {
    /// Whether resubmitting the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Api { status, .. } => *status >= 500,
            GenerationError::Http(_) => true,
            GenerationError::RateLimit { .. } => true,
            GenerationError::Timeout(_) => true,
            GenerationError::EmptyResponse => true,
            GenerationError::Validation(_) => true,
            _ => false,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            GenerationError::Config(_) => "CONFIG_ERROR",
            GenerationError::Http(_) => "HTTP_ERROR",
            GenerationError::Api { .. } => "API_ERROR",
            GenerationError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            GenerationError::Timeout(_) => "TIMEOUT_ERROR",
            GenerationError::EmptyResponse => "EMPTY_RESPONSE",
            GenerationError::Blocked(_) => "BLOCKED",
            GenerationError::Validation(_) => "VALIDATION_ERROR",
            GenerationError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }

    /// Text for the error panel, falling back to the generic localized message.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// The hero image could not be produced. Never crosses the controller boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("hero image unavailable: {reason}")]
pub struct ImageUnavailable {
    pub reason: String,
}

impl ImageUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure while exporting a rendered document. Reported, never retried.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Pagination failed: {0}")]
    Pagination(String),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ExportError::Rasterize(_) => "RASTERIZE_ERROR",
            ExportError::Pagination(_) => "PAGINATION_ERROR",
            ExportError::Pdf(_) => "PDF_ERROR",
            ExportError::Io(_) => "IO_ERROR",
        }
    }

    /// User-facing hint pointing at the print export path.
    pub fn advisory(&self) -> String {
        match self {
            ExportError::Io(err) => format!("文件保存失败（{err}）。请检查输出目录后重试。"),
            _ => "PDF 生成失败（可能是图片跨域限制导致）。请使用“保存 / 打印行程”功能，在打印对话框中选择“另存为 PDF”。".to_string(),
        }
    }
}

/// Rejected form input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferencesError {
    #[error("destination must not be empty")]
    EmptyDestination,

    #[error("duration must be between {min} and {max} days, got {got}")]
    DurationOutOfRange { got: u32, min: u32, max: u32 },

    #[error("at most {max} interests may be selected, got {got}")]
    TooManyInterests { got: usize, max: usize },

    #[error("unknown budget level `{0}`")]
    UnknownBudgetLevel(String),

    #[error("unknown traveler group `{0}`")]
    UnknownTravelerGroup(String),
}

/// A state change the controller does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} while {state}")]
    NotAllowed {
        action: &'static str,
        state: &'static str,
    },

    #[error("invalid preferences: {0}")]
    Preferences(#[from] PreferencesError),
}
