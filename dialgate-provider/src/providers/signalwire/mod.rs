//! SignalWire telephony provider
//!
//! SignalWire exposes a Twilio-compatible "LaML" REST dialect under the
//! account's space subdomain; auth is the project id + API token pair.

mod error;
mod http;
mod provider;

use reqwest::Client;

use crate::providers::common::create_http_client;
use crate::types::NumberPricing;

/// SignalWire caps availability search pages at 100 entries.
pub(crate) const MAX_SEARCH_PAGE_SIZE: u32 = 100;

/// SignalWire telephony provider.
pub struct SignalwireProvider {
    pub(crate) client: Client,
    pub(crate) space: String,
    pub(crate) project_id: String,
    pub(crate) api_token: String,
    pub(crate) pricing: NumberPricing,
}

impl SignalwireProvider {
    /// Create a provider for the given space.
    pub fn new(space: String, project_id: String, api_token: String) -> Self {
        Self {
            client: create_http_client(),
            space,
            project_id,
            api_token,
            pricing: NumberPricing::default(),
        }
    }

    /// Override the default pricing table stamped onto search results.
    #[must_use]
    pub fn with_pricing(mut self, pricing: NumberPricing) -> Self {
        self.pricing = pricing;
        self
    }

    pub(crate) fn api_base(&self) -> String {
        format!(
            "https://{}.signalwire.com/api/laml/2010-04-01/Accounts/{}",
            self.space, self.project_id
        )
    }
}
