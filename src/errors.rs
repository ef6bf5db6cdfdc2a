/*!
 * Error types for the doctrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with backend provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when a request exceeds its per-attempt timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Error when a registry host reports no usable model
    #[error("No model available: {0}")]
    NoModelAvailable(String),

    /// The in-flight request was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Whether another attempt may succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_)
            | Self::Timeout(_)
            | Self::ParseError(_)
            | Self::ApiError { .. }
            | Self::ConnectionError(_)
            | Self::RateLimitExceeded(_) => true,
            Self::AuthenticationError(_) | Self::NoModelAvailable(_) | Self::Cancelled => false,
        }
    }

    /// Whether the retry delay should grow exponentially instead of staying fixed
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimitExceeded(_))
    }

    /// Whether this is a credential problem rather than a service problem
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationError(_))
    }
}

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Provider tag not known to this build
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Provider requires a credential that was not supplied
    #[error("Missing API key for provider: {0}")]
    MissingCredential(String),

    /// A configuration value is out of range or malformed
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Errors that can occur while translating one document
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The document text was empty or whitespace-only
    #[error("Document is empty")]
    EmptyInput,

    /// One segment exhausted its retries or hit a non-retryable error
    #[error("Segment {index} of {total} failed: {source}")]
    SegmentFailed {
        /// Zero-based index of the failing segment
        index: usize,
        /// Total number of segments in the document
        total: usize,
        /// The provider error that ended the segment
        source: ProviderError,
    },

    /// The document was cancelled before it completed
    #[error("Translation cancelled")]
    Cancelled,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration loading or validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
