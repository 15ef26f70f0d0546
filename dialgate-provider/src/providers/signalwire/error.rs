//! SignalWire error mapping
//!
//! The LaML dialect reuses Twilio's numeric error-code space, so the table
//! mirrors the Twilio mapper with SignalWire as the reporting provider.

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::SignalwireProvider;

impl ProviderErrorMapper for SignalwireProvider {
    fn provider_name(&self) -> &'static str {
        "signalwire"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("20003" | "20005") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("20403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("20404") => ProviderError::NumberNotFound {
                provider: self.provider_name().to_string(),
                number_sid: context.number_sid.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },
            Some("20429") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },
            Some("21422" | "21452") => ProviderError::NumberUnavailable {
                provider: self.provider_name().to_string(),
                phone_number: context
                    .phone_number
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },
            Some(code @ ("21421" | "21451" | "21615")) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: if code == "21451" {
                    "area_code".to_string()
                } else {
                    "phone_number".to_string()
                },
                detail: raw.message,
            },
            _ => self.api_error(raw),
        }
    }
}
