//! Twilio telephony provider

mod error;
mod http;
mod provider;

use reqwest::Client;

use crate::providers::common::create_http_client;
use crate::types::NumberPricing;

pub(crate) const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
/// Twilio caps availability search pages at 100 entries.
pub(crate) const MAX_SEARCH_PAGE_SIZE: u32 = 100;

/// Twilio telephony provider.
pub struct TwilioProvider {
    pub(crate) client: Client,
    pub(crate) account_sid: String,
    pub(crate) auth_token: String,
    pub(crate) api_key_sid: Option<String>,
    pub(crate) api_key_secret: Option<String>,
    pub(crate) pricing: NumberPricing,
}

impl TwilioProvider {
    /// Create a provider authenticating with the account auth token.
    pub fn new(account_sid: String, auth_token: String) -> Self {
        Self {
            client: create_http_client(),
            account_sid,
            auth_token,
            api_key_sid: None,
            api_key_secret: None,
            pricing: NumberPricing::default(),
        }
    }

    /// Prefer an API key pair over the account auth token.
    ///
    /// The account SID is still required: it names the account in the URL
    /// path even when the key pair authenticates the request.
    #[must_use]
    pub fn with_api_key(mut self, api_key_sid: String, api_key_secret: String) -> Self {
        self.api_key_sid = Some(api_key_sid);
        self.api_key_secret = Some(api_key_secret);
        self
    }

    /// Override the default pricing table stamped onto search results.
    #[must_use]
    pub fn with_pricing(mut self, pricing: NumberPricing) -> Self {
        self.pricing = pricing;
        self
    }
}
