//! Centralized Error Handling Module
//!
//! Every failure of the service layer carries a unique error code so it can
//! be grepped in logs and mapped to an HTTP status.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - UPLOAD_xxx: upload/form errors
//! - EXIF_xxx: metadata decoding errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors
//!
//! GPS extraction itself never produces an `AppError`; see `core::gps`.

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Upload Errors
    // ============================================
    /// Form has no `photo` part
    UploadMissingFile,
    /// `photo` part present but no file was chosen
    UploadEmptyFilename,
    /// File extension not in the allow-list
    UploadUnsupportedType,
    /// Body exceeds the configured limit
    UploadTooLarge,
    /// Multipart body could not be parsed
    UploadMalformed,

    // ============================================
    // EXIF Errors
    // ============================================
    /// Image container or EXIF block could not be read
    ExifDecodeFailed,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UploadMissingFile => "UPLOAD_MISSING_FILE",
            Self::UploadEmptyFilename => "UPLOAD_EMPTY_FILENAME",
            Self::UploadUnsupportedType => "UPLOAD_UNSUPPORTED_TYPE",
            Self::UploadTooLarge => "UPLOAD_TOO_LARGE",
            Self::UploadMalformed => "UPLOAD_MALFORMED",

            Self::ExifDecodeFailed => "EXIF_DECODE_FAILED",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UploadMissingFile
            | Self::UploadEmptyFilename
            | Self::UploadMalformed
            | Self::ApiBadRequest => 400,
            Self::UploadTooLarge => 413,
            Self::UploadUnsupportedType => 415,
            Self::ExifDecodeFailed => 422,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }

    /// Whether the error was caused by what the client sent
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// No `photo` part in the form
    pub fn missing_file() -> Self {
        Self::new(ErrorCode::UploadMissingFile, "No photo part in the form.")
    }

    /// `photo` part with an empty filename
    pub fn empty_filename() -> Self {
        Self::new(ErrorCode::UploadEmptyFilename, "No photo selected.")
    }

    /// Extension not allowed
    pub fn unsupported_type(extension: &str) -> Self {
        Self::new(
            ErrorCode::UploadUnsupportedType,
            format!("Unsupported file type: {}.", extension),
        )
    }

    /// Upload over the body limit
    pub fn too_large() -> Self {
        Self::new(ErrorCode::UploadTooLarge, "The uploaded file is too large.")
    }

    /// Broken multipart body
    pub fn malformed_upload(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UploadMalformed, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, format!("IO error: {}", err), err)
    }
}

impl From<exif::Error> for AppError {
    fn from(err: exif::Error) -> Self {
        Self::with_source(ErrorCode::ExifDecodeFailed, err.to_string(), err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ApiInternalError, "JSON serialization error", err)
    }
}
