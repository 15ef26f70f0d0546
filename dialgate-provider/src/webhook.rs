//! Webhook payload types.
//!
//! The provider delivers call and recording status as form-encoded POSTs
//! with PascalCase field names. These structs are the deserialization
//! targets; parsing is deliberately lenient (unknown enum values fall back
//! to a safe default) because a rejected webhook fails a live call.

use serde::{Deserialize, Serialize};

/// Direction of a call as reported by the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    /// Call arrived from the PSTN or another account.
    Inbound,
    /// Call originated by this account (API or client SDK).
    Outbound,
}

impl CallDirection {
    /// Parse the provider's wire value.
    ///
    /// The provider uses `"inbound"`, `"outbound-api"`, `"outbound-dial"`
    /// and friends. Anything not recognizably inbound is treated as
    /// outbound — the conservative branch, since a misread outbound call
    /// still produces a valid fallback document while a misread inbound
    /// call would ring the wrong client.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("inbound") {
            Self::Inbound
        } else {
            Self::Outbound
        }
    }
}

/// A call-status webhook delivered to the voice endpoint.
///
/// The handler must answer HTTP 200 with a call-control document within the
/// provider's timeout (~15 s) or the call fails — there is no retry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VoiceWebhook {
    /// Unique call identifier.
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    /// Account the call belongs to.
    #[serde(rename = "AccountSid", default)]
    pub account_sid: String,
    /// Originating identity: an E.164 number, or a `client:`-style identity
    /// for calls placed by a software client.
    #[serde(rename = "From", default)]
    pub from: String,
    /// Dialed identity as the provider reports it.
    #[serde(rename = "To", default)]
    pub to: Option<String>,
    /// Legacy alias for the dialed party, sent by older API versions.
    #[serde(rename = "Called", default)]
    pub called: Option<String>,
    /// Legacy alias used by some client SDKs for the requested destination.
    #[serde(rename = "PhoneNumber", default)]
    pub phone_number: Option<String>,
    /// Call direction wire value (see [`CallDirection::from_wire`]).
    #[serde(rename = "Direction", default)]
    pub direction: String,
    /// Current call status (`ringing`, `in-progress`, `completed`, ...).
    #[serde(rename = "CallStatus", default)]
    pub call_status: String,
    /// Call duration in seconds, present on completion events.
    #[serde(rename = "CallDuration", default)]
    pub call_duration: Option<String>,
}

impl VoiceWebhook {
    /// Parsed call direction.
    #[must_use]
    pub fn parsed_direction(&self) -> CallDirection {
        CallDirection::from_wire(&self.direction)
    }

    /// The requested destination, checking every field alias in order of
    /// preference (`To`, `Called`, `PhoneNumber`). Empty strings count as
    /// absent.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        [&self.to, &self.called, &self.phone_number]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

/// Processing status of a recording as reported by the provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RecordingWireStatus {
    /// Recording still being captured.
    InProgress,
    /// Recording finished and the media is fetchable.
    Completed,
    /// Call ended without usable media.
    Absent,
    /// Recording failed.
    Failed,
}

impl RecordingWireStatus {
    /// Parse the provider's wire value, treating unknown values as failed.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "in-progress" | "processing" => Self::InProgress,
            "completed" => Self::Completed,
            "absent" => Self::Absent,
            _ => Self::Failed,
        }
    }
}

/// A recording-status webhook delivered to the recording callback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordingWebhook {
    /// Unique recording identifier.
    #[serde(rename = "RecordingSid", default)]
    pub recording_sid: String,
    /// Call the recording belongs to.
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    /// Recording status wire value (see [`RecordingWireStatus::from_wire`]).
    #[serde(rename = "RecordingStatus", default)]
    pub recording_status: String,
    /// Provider-hosted media URL.
    #[serde(rename = "RecordingUrl", default)]
    pub recording_url: Option<String>,
    /// Recording duration in seconds. The provider sends it as a string.
    #[serde(rename = "RecordingDuration", default)]
    pub recording_duration: Option<String>,
    /// Number of audio channels (1 or 2).
    #[serde(rename = "RecordingChannels", default)]
    pub recording_channels: Option<String>,
}

impl RecordingWebhook {
    /// Parsed recording status.
    #[must_use]
    pub fn parsed_status(&self) -> RecordingWireStatus {
        RecordingWireStatus::from_wire(&self.recording_status)
    }

    /// Duration in whole seconds, when present and numeric.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<u32> {
        self.recording_duration.as_deref()?.trim().parse().ok()
    }

    /// Channel count, when present and numeric.
    #[must_use]
    pub fn channels(&self) -> Option<u8> {
        self.recording_channels.as_deref()?.trim().parse().ok()
    }
}
