//! 类型定义模块

mod call;
mod config;
mod credential;
mod number;
mod recording;
mod rental;
mod selection;

pub use call::CallEvent;
pub use config::{InventoryConfig, RecordingConfig, RoutingConfig};
pub use credential::{CredentialMode, TelephonyCredential};
pub use number::{InventoryNumber, NumberAvailability};
pub use recording::{
    Recording, RecordingStatus, RecordingView, TranscriptSegment, Transcription,
    TranscriptionStatus, TranscriptionView,
};
pub use rental::{Rental, RentalNote, RentalStatus};
pub use selection::{NumberSelection, PricingSnapshot, SelectionStatus};

// Re-export provider 库的公共类型
pub use dialgate_provider::{
    AvailableNumber, CallControl, CallDirection, CredentialValidationError, Dial, DialTarget,
    NumberCapabilities, NumberPricing, NumberSearchParams, NumberType, ProviderCredentialField,
    ProviderCredentials, ProviderMetadata, ProviderType, PurchaseNumberRequest, PurchasedNumber,
    RecordMode, RecordingWebhook, RecordingWireStatus, VoiceWebhook,
};
