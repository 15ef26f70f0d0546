//! Environment-backed credential store.
//!
//! Reads the platform shared credential from `DIALGATE_*` environment
//! variables on every call, so rotating a secret takes effect without a
//! restart. Per-tenant modes and own credentials are registered at runtime;
//! unregistered tenants default to the shared platform credential.

use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dialgate_core::error::CoreResult;
use dialgate_core::traits::CredentialStore;
use dialgate_core::types::{CredentialMode, ProviderCredentials, TelephonyCredential};

/// Provider selector, `twilio` (default) or `signalwire`.
pub const ENV_PROVIDER: &str = "DIALGATE_PROVIDER";
/// Twilio account SID.
pub const ENV_ACCOUNT_SID: &str = "DIALGATE_ACCOUNT_SID";
/// Twilio auth token.
pub const ENV_AUTH_TOKEN: &str = "DIALGATE_AUTH_TOKEN";
/// Optional Twilio API key SID.
pub const ENV_API_KEY_SID: &str = "DIALGATE_API_KEY_SID";
/// Optional Twilio API key secret.
pub const ENV_API_KEY_SECRET: &str = "DIALGATE_API_KEY_SECRET";
/// SignalWire space subdomain.
pub const ENV_SPACE: &str = "DIALGATE_SPACE";
/// SignalWire project ID.
pub const ENV_PROJECT_ID: &str = "DIALGATE_PROJECT_ID";
/// SignalWire API token.
pub const ENV_API_TOKEN: &str = "DIALGATE_API_TOKEN";
/// Default outbound caller ID for the platform credential.
pub const ENV_CALLER_NUMBER: &str = "DIALGATE_CALLER_NUMBER";
/// Voice application SID bound to purchased numbers.
pub const ENV_VOICE_APP_SID: &str = "DIALGATE_VOICE_APP_SID";

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Environment-backed credential store.
pub struct EnvCredentialStore {
    modes: RwLock<HashMap<String, CredentialMode>>,
    tenant_credentials: RwLock<HashMap<String, TelephonyCredential>>,
}

impl EnvCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            modes: RwLock::new(HashMap::new()),
            tenant_credentials: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tenant's credential mode.
    pub async fn set_mode(&self, tenant_id: &str, mode: CredentialMode) {
        self.modes.write().await.insert(tenant_id.to_string(), mode);
    }

    /// Register a tenant-owned credential.
    pub async fn set_tenant_credential(&self, tenant_id: &str, credential: TelephonyCredential) {
        self.tenant_credentials
            .write()
            .await
            .insert(tenant_id.to_string(), credential);
    }

    /// Remove a tenant-owned credential, e.g. when it is deactivated.
    pub async fn clear_tenant_credential(&self, tenant_id: &str) {
        self.tenant_credentials.write().await.remove(tenant_id);
    }

    /// Assemble the platform credential from the environment.
    ///
    /// Returns `None` when the selected provider's required variables are
    /// absent; the preflight check reports the exact missing names.
    fn read_platform_credential() -> Option<TelephonyCredential> {
        let provider = env_nonempty(ENV_PROVIDER).unwrap_or_else(|| "twilio".to_string());
        let credentials = match provider.as_str() {
            "signalwire" => ProviderCredentials::Signalwire {
                space: env_nonempty(ENV_SPACE)?,
                project_id: env_nonempty(ENV_PROJECT_ID)?,
                api_token: env_nonempty(ENV_API_TOKEN)?,
            },
            _ => ProviderCredentials::Twilio {
                account_sid: env_nonempty(ENV_ACCOUNT_SID)?,
                auth_token: env_nonempty(ENV_AUTH_TOKEN)?,
                api_key_sid: env_nonempty(ENV_API_KEY_SID),
                api_key_secret: env_nonempty(ENV_API_KEY_SECRET),
            },
        };
        Some(TelephonyCredential {
            credentials,
            default_caller_number: env_nonempty(ENV_CALLER_NUMBER),
            voice_application_sid: env_nonempty(ENV_VOICE_APP_SID),
        })
    }
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn mode(&self, tenant_id: &str) -> CoreResult<CredentialMode> {
        Ok(self
            .modes
            .read()
            .await
            .get(tenant_id)
            .copied()
            .unwrap_or(CredentialMode::Shared))
    }

    async fn tenant_credential(&self, tenant_id: &str) -> CoreResult<Option<TelephonyCredential>> {
        Ok(self.tenant_credentials.read().await.get(tenant_id).cloned())
    }

    async fn platform_credential(&self) -> CoreResult<Option<TelephonyCredential>> {
        Ok(Self::read_platform_credential())
    }
}
