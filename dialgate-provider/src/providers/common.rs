//! Shared helpers for provider implementations.
//!
//! Twilio and SignalWire speak the same 2010-04-01 REST dialect, so the wire
//! structs live here and each provider keeps only its base URL, auth, and
//! error-code table.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::types::{AvailableNumber, NumberCapabilities, NumberType};

// ============ HTTP Client ============

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds). A hung provider call blocks a live
/// phone call, so every request is bounded.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with bounded timeouts.
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

// ============ Price Parsing ============

/// Parse a decimal dollar string (e.g. `"1.15"`) into integer cents.
///
/// The 2010-04-01 API reports prices as decimal strings. Fails closed with
/// `InvalidParameter` on malformed input rather than guessing a price.
pub fn parse_dollars_to_cents(value: &str, provider: &str) -> Result<u32> {
    let trimmed = value.trim().trim_start_matches('$');
    let invalid = || ProviderError::InvalidParameter {
        provider: provider.to_string(),
        param: "price".to_string(),
        detail: format!("not a decimal dollar amount: {value}"),
    };

    let (dollars, cents) = match trimmed.split_once('.') {
        Some((d, c)) => (d, c),
        None => (trimmed, ""),
    };
    let dollars: u32 = if dollars.is_empty() {
        0
    } else {
        dollars.parse().map_err(|_| invalid())?
    };
    // Normalize the fractional part to exactly two digits.
    let mut cents_str = cents.to_string();
    cents_str.truncate(2);
    while cents_str.len() < 2 {
        cents_str.push('0');
    }
    let cents: u32 = cents_str.parse().map_err(|_| invalid())?;

    dollars
        .checked_mul(100)
        .and_then(|d| d.checked_add(cents))
        .ok_or_else(invalid)
}

// ============ Twilio-compatible wire types ============

/// `capabilities` object on number resources.
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct WireCapabilities {
    #[serde(default)]
    pub voice: bool,
    #[serde(default, alias = "SMS", alias = "sms")]
    pub sms: bool,
    #[serde(default, alias = "MMS", alias = "mms")]
    pub mms: bool,
    #[serde(default)]
    pub fax: bool,
}

impl From<WireCapabilities> for NumberCapabilities {
    fn from(w: WireCapabilities) -> Self {
        Self {
            voice: w.voice,
            sms: w.sms,
            mms: w.mms,
            fax: w.fax,
        }
    }
}

/// One entry from `AvailablePhoneNumbers/{ISO}/{Type}.json`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireAvailableNumber {
    pub phone_number: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub iso_country: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub capabilities: WireCapabilities,
}

/// Response envelope of the availability search.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireAvailabilityPage {
    #[serde(default)]
    pub available_phone_numbers: Vec<WireAvailableNumber>,
}

/// A provisioned number resource (`IncomingPhoneNumbers`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireIncomingNumber {
    pub sid: String,
    pub phone_number: String,
    #[serde(default)]
    pub capabilities: WireCapabilities,
}

/// Error payload the 2010-04-01 dialect returns on 4xx.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

/// Convert a wire availability entry to [`AvailableNumber`].
///
/// The per-number price is not part of the availability payload in this
/// dialect; callers stamp the monthly/setup cost from their pricing table.
pub(crate) fn wire_to_available(
    wire: WireAvailableNumber,
    number_type: NumberType,
    fallback_country: &str,
    monthly_cost_cents: u32,
    setup_cost_cents: u32,
) -> AvailableNumber {
    AvailableNumber {
        phone_number: wire.phone_number,
        friendly_name: wire.friendly_name,
        number_type,
        country_code: wire
            .iso_country
            .unwrap_or_else(|| fallback_country.to_string()),
        capabilities: wire.capabilities.into(),
        monthly_cost_cents,
        setup_cost_cents,
        locality: wire.locality,
    }
}
