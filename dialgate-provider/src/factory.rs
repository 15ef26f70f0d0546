//! Provider factory functions and metadata.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::TelephonyProvider;
use crate::types::{NumberPricing, ProviderCredentials, ProviderMetadata};

#[cfg(feature = "signalwire")]
use crate::providers::SignalwireProvider;
#[cfg(feature = "twilio")]
use crate::providers::TwilioProvider;

/// Creates a [`TelephonyProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`]
/// variant. The returned provider is wrapped in `Arc<dyn TelephonyProvider>`
/// for easy sharing across async tasks. Construction is cheap; callers that
/// must not cache credentials across requests (secret rotation) can build a
/// fresh instance per request.
///
/// # Examples
///
/// ```rust,no_run
/// use dialgate_provider::{create_provider, NumberPricing, ProviderCredentials};
///
/// let provider = create_provider(
///     ProviderCredentials::Twilio {
///         account_sid: "AC...".to_string(),
///         auth_token: "token".to_string(),
///         api_key_sid: None,
///         api_key_secret: None,
///     },
///     NumberPricing::default(),
/// ).unwrap();
/// ```
pub fn create_provider(
    credentials: ProviderCredentials,
    pricing: NumberPricing,
) -> Result<Arc<dyn TelephonyProvider>> {
    match credentials {
        #[cfg(feature = "twilio")]
        ProviderCredentials::Twilio {
            account_sid,
            auth_token,
            api_key_sid,
            api_key_secret,
        } => {
            let mut provider = TwilioProvider::new(account_sid, auth_token).with_pricing(pricing);
            if let (Some(sid), Some(secret)) = (api_key_sid, api_key_secret) {
                provider = provider.with_api_key(sid, secret);
            }
            Ok(Arc::new(provider))
        }
        #[cfg(feature = "signalwire")]
        ProviderCredentials::Signalwire {
            space,
            project_id,
            api_token,
        } => Ok(Arc::new(
            SignalwireProvider::new(space, project_id, api_token).with_pricing(pricing),
        )),
    }
}

/// Returns metadata for all providers enabled via feature flags.
///
/// Useful for building credential forms and for the preflight check that
/// reports missing configuration identifiers by name.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        #[cfg(feature = "twilio")]
        TwilioProvider::metadata(),
        #[cfg(feature = "signalwire")]
        SignalwireProvider::metadata(),
    ]
}
