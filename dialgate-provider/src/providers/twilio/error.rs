//! Twilio error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::TwilioProvider;

/// Twilio error code mapping
/// Reference: <https://www.twilio.com/docs/api/errors>
impl ProviderErrorMapper for TwilioProvider {
    fn provider_name(&self) -> &'static str {
        "twilio"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // Authentication
            // 20003: Permission Denied — authentication failed
            // 20005: Account not active / unknown account
            Some("20003" | "20005") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Authorization
            // 20403: 403 Forbidden — account lacks access to the resource
            Some("20403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Resource not found
            // 20404: The requested resource was not found
            Some("20404") => ProviderError::NumberNotFound {
                provider: self.provider_name().to_string(),
                number_sid: context.number_sid.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // Rate limiting
            // 20429: Too many requests
            Some("20429") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            // Number cannot be purchased
            // 21422: The phone number is not available for purchase
            // 21452: No phone numbers found in the requested area code
            Some("21422" | "21452") => ProviderError::NumberUnavailable {
                provider: self.provider_name().to_string(),
                phone_number: context
                    .phone_number
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // Invalid parameter
            // 21421: The phone number is invalid
            // 21451: Invalid area code
            // 21615: The phone number is not a valid E.164 number
            Some(code @ ("21421" | "21451" | "21615")) => {
                let param = match code {
                    "21451" => "area_code",
                    _ => "phone_number",
                };
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // Other error fallback: pass the vendor code through.
            _ => self.api_error(raw),
        }
    }
}
