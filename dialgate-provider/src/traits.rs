use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    AvailableNumber, NumberSearchParams, ProviderMetadata, PurchaseNumberRequest, PurchasedNumber,
};

/// Raw API error as reported by a vendor (internal use).
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Vendor error code (format differs per provider).
    pub code: Option<String>,
    /// Raw error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra context carried into error mapping (internal use).
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Phone number involved in the failed operation.
    pub phone_number: Option<String>,
    /// Provisioned number SID involved in the failed operation.
    pub number_sid: Option<String>,
}

/// Error-mapping trait implemented by each provider (internal use).
///
/// Translates raw vendor API errors into the unified [`ProviderError`],
/// passing the vendor's own code through for diagnostics.
pub(crate) trait ProviderErrorMapper {
    /// Returns the provider identifier.
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type.
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error.
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unmapped vendor error (fallback).
    fn api_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::ApiError {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Telephony provider trait.
///
/// Covers the number lifecycle surface this system consumes: live
/// availability search, purchase, and release. Call control is *not* a
/// method here — the provider executes the [`CallControl`](crate::CallControl)
/// document returned from the webhook handler, so there is no request/response
/// API call to make.
///
/// # Idempotency
///
/// `search_numbers` and `validate_credentials` are idempotent reads and may
/// be retried. `purchase_number` and `release_number` must be called at most
/// once per intent: the vendor offers no exactly-once semantics and a
/// repeated purchase double-bills the tenant.
#[async_trait]
pub trait TelephonyProvider: Send + Sync {
    /// Provider identifier.
    fn id(&self) -> &'static str;

    /// Provider metadata (type level).
    ///
    /// Returns the provider's name, description, and credential field
    /// descriptors. Callable without an instance.
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Verify that the credentials are valid against the remote API.
    async fn validate_credentials(&self) -> Result<bool>;

    /// Search the public numbering space for purchasable numbers.
    ///
    /// Read-only; never mutates account state.
    async fn search_numbers(&self, params: &NumberSearchParams) -> Result<Vec<AvailableNumber>>;

    /// Provision a number onto the account.
    ///
    /// Never retried internally. A failure here means no state change
    /// occurred on our side; whether the vendor billed is answered by the
    /// returned error variant.
    async fn purchase_number(&self, req: &PurchaseNumberRequest) -> Result<PurchasedNumber>;

    /// Release a provisioned number from the account.
    ///
    /// Never retried internally. [`ProviderError::NumberNotFound`] from a
    /// repeated release is treated as success by callers (the number is
    /// already gone).
    async fn release_number(&self, number_sid: &str) -> Result<()>;
}
