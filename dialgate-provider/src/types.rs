use serde::{Deserialize, Serialize};

// ============ Provider Types ============

/// Identifies which telephony provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Twilio. Requires feature `twilio`.
    #[cfg(feature = "twilio")]
    Twilio,
    /// SignalWire (Twilio-compatible LaML API). Requires feature `signalwire`.
    #[cfg(feature = "signalwire")]
    Signalwire,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "twilio")]
            Self::Twilio => write!(f, "twilio"),
            #[cfg(feature = "signalwire")]
            Self::Signalwire => write!(f, "signalwire"),
        }
    }
}

// ============ Number Types ============

/// Category of a telephony number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NumberType {
    /// Geographic local number.
    Local,
    /// Toll-free number (e.g., +1 8xx).
    Tollfree,
    /// Mobile number.
    Mobile,
}

impl NumberType {
    /// API path segment used by Twilio-compatible availability endpoints.
    #[must_use]
    pub fn api_segment(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Tollfree => "TollFree",
            Self::Mobile => "Mobile",
        }
    }
}

/// Media capabilities of a number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NumberCapabilities {
    /// Supports voice calls.
    pub voice: bool,
    /// Supports SMS.
    pub sms: bool,
    /// Supports MMS.
    pub mms: bool,
    /// Supports fax.
    pub fax: bool,
}

impl NumberCapabilities {
    /// Voice-only capability set, the minimum for a rentable number.
    #[must_use]
    pub fn voice_only() -> Self {
        Self {
            voice: true,
            ..Self::default()
        }
    }
}

/// A number offered by a provider's live availability search.
///
/// Costs are integer cents in the account currency. Providers that only
/// publish a monthly price report `setup_cost_cents = 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableNumber {
    /// E.164 phone number (e.g., `"+14155551234"`).
    pub phone_number: String,
    /// Human-friendly rendering, if the provider supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Number category.
    pub number_type: NumberType,
    /// ISO 3166-1 alpha-2 country code (e.g., `"US"`).
    pub country_code: String,
    /// Media capabilities.
    pub capabilities: NumberCapabilities,
    /// Monthly rental cost estimate in cents.
    pub monthly_cost_cents: u32,
    /// One-time setup cost in cents.
    pub setup_cost_cents: u32,
    /// Locality/region hint (e.g., `"San Francisco"`), if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
}

/// Search criteria for the provider's number availability endpoint.
///
/// # Default
///
/// US local voice-capable numbers, up to 20 results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSearchParams {
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
    /// Number category to search.
    pub number_type: NumberType,
    /// Digits/pattern the number must contain (provider wildcard syntax).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    /// Area code filter (NANP countries only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_code: Option<String>,
    /// Maximum number of results to return.
    pub limit: u32,
}

impl Default for NumberSearchParams {
    fn default() -> Self {
        Self {
            country_code: "US".to_string(),
            number_type: NumberType::Local,
            contains: None,
            area_code: None,
            limit: 20,
        }
    }
}

/// Request to provision a specific number onto the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseNumberRequest {
    /// E.164 phone number to purchase.
    pub phone_number: String,
    /// Call-control application to bind for inbound voice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_application_sid: Option<String>,
    /// Friendly name to attach to the provisioned number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

/// A number provisioned on the provider account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedNumber {
    /// Provider-side identifier of the provisioned number. Required for release.
    pub number_sid: String,
    /// E.164 phone number.
    pub phone_number: String,
    /// Capabilities reported by the provider at purchase time.
    pub capabilities: NumberCapabilities,
}

/// Rental pricing applied to numbers surfaced by the availability search.
///
/// The 2010-04-01 dialect does not return per-number prices inline, so each
/// provider instance carries the platform's pricing table and stamps it onto
/// search results. All values are integer cents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NumberPricing {
    /// Monthly cost of a local number.
    pub local_monthly_cents: u32,
    /// Monthly cost of a toll-free number.
    pub tollfree_monthly_cents: u32,
    /// Monthly cost of a mobile number.
    pub mobile_monthly_cents: u32,
    /// One-time setup cost applied to every purchase.
    pub setup_cents: u32,
}

impl Default for NumberPricing {
    fn default() -> Self {
        Self {
            local_monthly_cents: 115,
            tollfree_monthly_cents: 200,
            mobile_monthly_cents: 115,
            setup_cents: 0,
        }
    }
}

impl NumberPricing {
    /// Monthly cost for the given number category.
    #[must_use]
    pub fn monthly_cents(&self, number_type: NumberType) -> u32 {
        match number_type {
            NumberType::Local => self.local_monthly_cents,
            NumberType::Tollfree => self.tollfree_monthly_cents,
            NumberType::Mobile => self.mobile_monthly_cents,
        }
    }
}

// ============ Provider Metadata Types ============

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single credential field required by a provider.
///
/// Used to dynamically build credential forms and to report missing
/// configuration identifiers by name in the preflight check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Machine-readable field key (e.g., `"accountSid"`).
    pub key: String,
    /// Human-readable label (e.g., `"Account SID"`).
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Optional placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Optional help/description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static metadata describing a telephony provider.
///
/// Obtain via `TelephonyProvider::metadata()` or
/// [`get_all_provider_metadata()`](crate::get_all_provider_metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description of the provider.
    pub description: String,
    /// Credential fields required to authenticate with this provider.
    pub required_fields: Vec<ProviderCredentialField>,
}

// ============ Credential Types ============

/// Validation error for provider credentials.
///
/// Returned when credential fields are missing, empty, or have an invalid format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field has an invalid format.
    InvalidFormat {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe credential container for all supported telephony providers.
///
/// Each variant holds the authentication fields required by that provider.
/// Pass this to [`create_provider()`](crate::create_provider) to instantiate a provider.
///
/// # Serialization
///
/// Serialized as a tagged enum with `"provider"` as the tag and `"credentials"` as the content:
///
/// ```json
/// { "provider": "twilio", "credentials": { "account_sid": "AC...", "auth_token": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Twilio credentials. Requires feature `twilio`.
    #[cfg(feature = "twilio")]
    #[serde(rename = "twilio")]
    Twilio {
        /// Account SID (`AC…`).
        account_sid: String,
        /// Account auth token.
        auth_token: String,
        /// Optional API key SID (`SK…`). When set together with
        /// `api_key_secret`, requests authenticate with the key pair
        /// instead of the account auth token.
        #[serde(skip_serializing_if = "Option::is_none")]
        api_key_sid: Option<String>,
        /// Optional API key secret.
        #[serde(skip_serializing_if = "Option::is_none")]
        api_key_secret: Option<String>,
    },

    /// SignalWire credentials. Requires feature `signalwire`.
    #[cfg(feature = "signalwire")]
    #[serde(rename = "signalwire")]
    Signalwire {
        /// Space subdomain (`{space}.signalwire.com`).
        space: String,
        /// Project ID (UUID).
        project_id: String,
        /// API token.
        api_token: String,
    },
}

impl ProviderCredentials {
    /// Construct credentials from a `HashMap`, validating required fields.
    ///
    /// Useful for deserializing credentials stored in a flat key-value format.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing or empty.
    pub fn from_map(
        provider: &ProviderType,
        map: &std::collections::HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            #[cfg(feature = "twilio")]
            ProviderType::Twilio => Ok(Self::Twilio {
                account_sid: Self::get_required_field(provider, map, "accountSid", "Account SID")?,
                auth_token: Self::get_required_field(provider, map, "authToken", "Auth Token")?,
                api_key_sid: map.get("apiKeySid").filter(|v| !v.trim().is_empty()).cloned(),
                api_key_secret: map
                    .get("apiKeySecret")
                    .filter(|v| !v.trim().is_empty())
                    .cloned(),
            }),
            #[cfg(feature = "signalwire")]
            ProviderType::Signalwire => Ok(Self::Signalwire {
                space: Self::get_required_field(provider, map, "space", "Space")?,
                project_id: Self::get_required_field(provider, map, "projectId", "Project ID")?,
                api_token: Self::get_required_field(provider, map, "apiToken", "API Token")?,
            }),
            #[allow(unreachable_patterns)]
            _ => Err(CredentialValidationError::InvalidFormat {
                provider: provider.clone(),
                field: "provider".to_string(),
                label: "Provider".to_string(),
                reason: format!(
                    "Provider '{provider}' is not supported or its feature is not enabled."
                ),
            }),
        }
    }

    /// Obtain a required field from the map and verify that it is not empty.
    fn get_required_field(
        provider: &ProviderType,
        map: &std::collections::HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                provider: provider.clone(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                provider: provider.clone(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.clone()),
        }
    }

    /// Convert credentials to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> std::collections::HashMap<String, String> {
        match self {
            #[cfg(feature = "twilio")]
            Self::Twilio {
                account_sid,
                auth_token,
                api_key_sid,
                api_key_secret,
            } => {
                let mut map: std::collections::HashMap<String, String> = [
                    ("accountSid".to_string(), account_sid.clone()),
                    ("authToken".to_string(), auth_token.clone()),
                ]
                .into();
                if let Some(sid) = api_key_sid {
                    map.insert("apiKeySid".to_string(), sid.clone());
                }
                if let Some(secret) = api_key_secret {
                    map.insert("apiKeySecret".to_string(), secret.clone());
                }
                map
            }
            #[cfg(feature = "signalwire")]
            Self::Signalwire {
                space,
                project_id,
                api_token,
            } => [
                ("space".to_string(), space.clone()),
                ("projectId".to_string(), project_id.clone()),
                ("apiToken".to_string(), api_token.clone()),
            ]
            .into(),
        }
    }

    /// Returns the [`ProviderType`] corresponding to this credential variant.
    #[must_use]
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "twilio")]
            Self::Twilio { .. } => ProviderType::Twilio,
            #[cfg(feature = "signalwire")]
            Self::Signalwire { .. } => ProviderType::Signalwire,
        }
    }
}
