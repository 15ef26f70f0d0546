//! Telephony provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "signalwire")]
mod signalwire;
#[cfg(feature = "twilio")]
mod twilio;

#[cfg(feature = "signalwire")]
pub use signalwire::SignalwireProvider;
#[cfg(feature = "twilio")]
pub use twilio::TwilioProvider;
