//! Call-control document model.
//!
//! The provider drives a live call by executing the XML document our webhook
//! handler returns: an ordered sequence of verbs (speak, dial, hang up).
//! Rendering is infallible — every [`CallControl`] value serializes to a
//! well-formed document, because the webhook protocol has no error channel
//! and a malformed response fails the call.

use serde::{Deserialize, Serialize};

/// When call recording starts for a dialed leg.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RecordMode {
    /// No recording.
    #[default]
    DoNotRecord,
    /// Record from the moment the dialed party starts ringing.
    RecordFromRinging,
    /// Record from the moment the dialed party answers.
    RecordFromAnswer,
}

impl RecordMode {
    fn wire_value(self) -> &'static str {
        match self {
            Self::DoNotRecord => "do-not-record",
            Self::RecordFromRinging => "record-from-ringing",
            Self::RecordFromAnswer => "record-from-answer",
        }
    }
}

/// Target of a dial verb.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DialTarget {
    /// A registered software-client identity (browser/mobile SDK endpoint).
    Client(String),
    /// A PSTN number in E.164 format.
    Number(String),
}

/// A dial verb: connect the current call to a client identity or PSTN number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dial {
    /// Who to connect.
    pub target: DialTarget,
    /// Caller ID presented to the dialed party.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
    /// Seconds to let the dialed party ring before giving up.
    pub timeout_secs: u32,
    /// Recording behavior for this leg.
    pub record: RecordMode,
    /// URL the provider posts recording-status events to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_status_callback: Option<String>,
}

impl Dial {
    /// Dial a registered software client.
    #[must_use]
    pub fn client(identity: impl Into<String>) -> Self {
        Self::new(DialTarget::Client(identity.into()))
    }

    /// Dial a PSTN number (E.164).
    #[must_use]
    pub fn number(e164: impl Into<String>) -> Self {
        Self::new(DialTarget::Number(e164.into()))
    }

    fn new(target: DialTarget) -> Self {
        Self {
            target,
            caller_id: None,
            timeout_secs: 30,
            record: RecordMode::DoNotRecord,
            recording_status_callback: None,
        }
    }

    /// Set the caller ID presented to the dialed party.
    #[must_use]
    pub fn caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    /// Set the ring timeout.
    #[must_use]
    pub fn timeout_secs(mut self, secs: u32) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the recording mode.
    #[must_use]
    pub fn record(mut self, mode: RecordMode) -> Self {
        self.record = mode;
        self
    }

    /// Set the recording-status callback URL.
    #[must_use]
    pub fn recording_status_callback(mut self, url: impl Into<String>) -> Self {
        self.recording_status_callback = Some(url.into());
        self
    }
}

/// A single call-control verb.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "verb", rename_all = "lowercase")]
pub enum Verb {
    /// Speak text to the caller.
    Say {
        /// Text to speak.
        text: String,
        /// Voice name, provider default when absent.
        #[serde(skip_serializing_if = "Option::is_none")]
        voice: Option<String>,
    },
    /// Connect the call.
    Dial(Dial),
    /// End the call.
    Hangup,
}

/// An ordered call-control document.
///
/// Built with the fluent methods and rendered with [`to_xml`](Self::to_xml):
///
/// ```
/// use dialgate_provider::{CallControl, Dial, RecordMode};
///
/// let doc = CallControl::new()
///     .say("This call may be recorded.")
///     .dial(
///         Dial::number("+14155551234")
///             .record(RecordMode::RecordFromRinging)
///             .recording_status_callback("https://example.com/webhooks/recording"),
///     );
/// assert!(doc.to_xml().contains("<Number>+14155551234</Number>"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallControl {
    /// Verbs executed in order.
    pub verbs: Vec<Verb>,
}

impl CallControl {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a say verb with the default voice.
    #[must_use]
    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say {
            text: text.into(),
            voice: None,
        });
        self
    }

    /// Append a say verb with an explicit voice.
    #[must_use]
    pub fn say_with_voice(mut self, text: impl Into<String>, voice: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say {
            text: text.into(),
            voice: Some(voice.into()),
        });
        self
    }

    /// Append a dial verb.
    #[must_use]
    pub fn dial(mut self, dial: Dial) -> Self {
        self.verbs.push(Verb::Dial(dial));
        self
    }

    /// Append a hangup verb.
    #[must_use]
    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    /// First dial verb in the document, if any.
    #[must_use]
    pub fn first_dial(&self) -> Option<&Dial> {
        self.verbs.iter().find_map(|v| match v {
            Verb::Dial(d) => Some(d),
            _ => None,
        })
    }

    /// Render the document to the provider's XML wire format.
    ///
    /// Infallible: text and attribute values are escaped, so arbitrary input
    /// still yields a well-formed document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say { text, voice } => {
                    match voice {
                        Some(v) => {
                            xml.push_str(&format!("<Say voice=\"{}\">", escape_attr(v)));
                        }
                        None => xml.push_str("<Say>"),
                    }
                    xml.push_str(&escape_text(text));
                    xml.push_str("</Say>");
                }
                Verb::Dial(dial) => {
                    xml.push_str("<Dial");
                    if let Some(ref caller_id) = dial.caller_id {
                        xml.push_str(&format!(" callerId=\"{}\"", escape_attr(caller_id)));
                    }
                    xml.push_str(&format!(" timeout=\"{}\"", dial.timeout_secs));
                    if dial.record != RecordMode::DoNotRecord {
                        xml.push_str(&format!(" record=\"{}\"", dial.record.wire_value()));
                    }
                    if let Some(ref url) = dial.recording_status_callback {
                        xml.push_str(&format!(
                            " recordingStatusCallback=\"{}\"",
                            escape_attr(url)
                        ));
                    }
                    xml.push('>');
                    match &dial.target {
                        DialTarget::Client(identity) => {
                            xml.push_str(&format!("<Client>{}</Client>", escape_text(identity)));
                        }
                        DialTarget::Number(number) => {
                            xml.push_str(&format!("<Number>{}</Number>", escape_text(number)));
                        }
                    }
                    xml.push_str("</Dial>");
                }
                Verb::Hangup => xml.push_str("<Hangup/>"),
            }
        }
        xml.push_str("</Response>");
        xml
    }
}

/// Escape XML text content.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an XML attribute value (double-quoted).
fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
