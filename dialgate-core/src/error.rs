//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use dialgate_provider::{CredentialValidationError, ProviderError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Tenant opted into own-credential mode but no active credential exists
    #[error("No telephony credential configured for tenant: {0}")]
    NoCredentialConfigured(String),

    /// Platform shared credential is missing or incomplete
    #[error("Platform telephony configuration error: {0}")]
    PlatformMisconfigured(String),

    /// Number was reserved or purchased by another tenant first
    #[error("Number already reserved: {0}")]
    AlreadyReserved(String),

    /// Lifecycle action not allowed from the current state
    #[error("Invalid transition: cannot {action} from state {from}")]
    InvalidTransition { from: String, action: String },

    /// Extension length outside the allowed range
    #[error("Invalid extension length: {0} months (must be 1-12)")]
    InvalidExtension(u32),

    /// Inventory number not found
    #[error("Number not found: {0}")]
    NumberNotFound(String),

    /// Number selection not found
    #[error("Selection not found: {0}")]
    SelectionNotFound(String),

    /// Rental not found
    #[error("Rental not found: {0}")]
    RentalNotFound(String),

    /// No recording exists for the call
    #[error("Recording not found for call: {0}")]
    RecordingNotFound(String),

    /// Recording exists but is not ready to serve yet
    #[error("Recording not ready: status={status}, download={download_status}")]
    NotReady {
        status: String,
        download_status: String,
    },

    /// Credential validation errors (structured, supports field level errors)
    #[error("{0}")]
    CredentialValidation(CredentialValidationError),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NoCredentialConfigured(_)
            | Self::AlreadyReserved(_)
            | Self::InvalidTransition { .. }
            | Self::InvalidExtension(_)
            | Self::NumberNotFound(_)
            | Self::SelectionNotFound(_)
            | Self::RentalNotFound(_)
            | Self::RecordingNotFound(_)
            | Self::NotReady { .. }
            | Self::CredentialValidation(_)
            | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
