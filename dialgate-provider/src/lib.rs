//! # dialgate-provider
//!
//! A unified telephony provider abstraction library: number availability
//! search, purchase and release against multiple vendors, plus the shared
//! wire contracts of the voice webhook path (call-control documents and
//! webhook payloads).
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Twilio](https://www.twilio.com/) | `twilio` | Basic (Account SID + token, or API key pair) |
//! | [SignalWire](https://signalwire.com/) | `signalwire` | Basic (Project ID + API token) |
//!
//! ## Feature Flags
//!
//! ### Provider Selection
//!
//! - **`all-providers`** *(default)* — Enable all providers listed above.
//! - **`twilio`** — Enable only the Twilio provider.
//! - **`signalwire`** — Enable only the SignalWire provider.
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dialgate_provider::{
//!     create_provider, NumberPricing, NumberSearchParams, ProviderCredentials,
//!     PurchaseNumberRequest, TelephonyProvider,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Create a provider from credentials
//!     let credentials = ProviderCredentials::Twilio {
//!         account_sid: "AC...".to_string(),
//!         auth_token: "your-token".to_string(),
//!         api_key_sid: None,
//!         api_key_secret: None,
//!     };
//!     let provider = create_provider(credentials, NumberPricing::default())?;
//!
//!     // 2. Validate credentials against the remote API
//!     provider.validate_credentials().await?;
//!
//!     // 3. Search purchasable numbers
//!     let numbers = provider.search_numbers(&NumberSearchParams::default()).await?;
//!     for n in &numbers {
//!         println!("{} ({:?})", n.phone_number, n.number_type);
//!     }
//!
//!     // 4. Purchase the first one
//!     let purchased = provider
//!         .purchase_number(&PurchaseNumberRequest {
//!             phone_number: numbers[0].phone_number.clone(),
//!             voice_application_sid: Some("AP...".to_string()),
//!             friendly_name: None,
//!         })
//!         .await?;
//!     println!("provisioned as {}", purchased.number_sid);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Call Control
//!
//! The webhook path does not call the vendor API at all: the provider
//! executes the [`CallControl`] XML document returned as the webhook
//! response body.
//!
//! ```rust
//! use dialgate_provider::{CallControl, Dial, RecordMode};
//!
//! let doc = CallControl::new()
//!     .say("This call may be recorded.")
//!     .dial(
//!         Dial::number("+14155551234")
//!             .caller_id("+14155550000")
//!             .record(RecordMode::RecordFromRinging),
//!     );
//! let xml = doc.to_xml();
//! # assert!(xml.contains("Number"));
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried
//! with exponential backoff for idempotent reads only — number purchase and
//! release are executed at most once, since the vendor offers no exactly-once
//! guarantee and a replayed purchase double-bills the tenant.

mod callcontrol;
mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;
mod webhook;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, get_all_provider_metadata};

// Re-export core trait only (internal traits are not exported)
pub use traits::TelephonyProvider;

// Re-export types
pub use types::{
    AvailableNumber, CredentialValidationError, FieldType, NumberCapabilities, NumberPricing,
    NumberSearchParams, NumberType, ProviderCredentialField, ProviderCredentials, ProviderMetadata,
    ProviderType, PurchaseNumberRequest, PurchasedNumber,
};

// Re-export the call-control document model
pub use callcontrol::{CallControl, Dial, DialTarget, RecordMode, Verb};

// Re-export webhook payload types
pub use webhook::{CallDirection, RecordingWebhook, RecordingWireStatus, VoiceWebhook};

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "twilio")]
pub use providers::TwilioProvider;

#[cfg(feature = "signalwire")]
pub use providers::SignalwireProvider;
