//! Startup configuration check.
//!
//! Verifies that the platform credential and the pricing table are complete
//! before the lifecycle services are allowed to take writes. A failed check
//! does not abort the process; the app downgrades itself to read-only and
//! keeps serving lookups while the operator fixes the environment.

use serde::Serialize;

use dialgate_core::error::CoreResult;
use dialgate_core::traits::CredentialStore;
use dialgate_core::types::{NumberPricing, ProviderCredentials};
use dialgate_core::utils::phone::is_valid_e164;

/// Outcome of the startup check. Serializable for an ops/health endpoint.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightReport {
    /// Identifiers that are missing or invalid, by name.
    pub missing: Vec<String>,
}

impl PreflightReport {
    /// Whether the app may take lifecycle writes.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check required credential and pricing identifiers.
pub async fn run_preflight(
    store: &dyn CredentialStore,
    pricing: &NumberPricing,
) -> CoreResult<PreflightReport> {
    let mut report = PreflightReport::default();

    match store.platform_credential().await? {
        None => report.missing.push("platform_credential".to_string()),
        Some(credential) => {
            check_credential_fields(&credential.credentials, &mut report);
            match credential.default_caller_number {
                None => report
                    .missing
                    .push("platform_credential.default_caller_number".to_string()),
                Some(ref number) if !is_valid_e164(number) => report
                    .missing
                    .push("platform_credential.default_caller_number (not E.164)".to_string()),
                Some(_) => {}
            }
        }
    }

    check_pricing(pricing, &mut report);

    if !report.is_ready() {
        log::warn!(
            "Preflight found {} missing identifier(s): {}",
            report.missing.len(),
            report.missing.join(", ")
        );
    }
    Ok(report)
}

fn check_credential_fields(credentials: &ProviderCredentials, report: &mut PreflightReport) {
    let mut require = |name: &str, value: &str| {
        if value.trim().is_empty() {
            report.missing.push(format!("platform_credential.{name}"));
        }
    };
    match credentials {
        ProviderCredentials::Twilio {
            account_sid,
            auth_token,
            ..
        } => {
            require("account_sid", account_sid);
            require("auth_token", auth_token);
        }
        ProviderCredentials::Signalwire {
            space,
            project_id,
            api_token,
        } => {
            require("space", space);
            require("project_id", project_id);
            require("api_token", api_token);
        }
    }
}

fn check_pricing(pricing: &NumberPricing, report: &mut PreflightReport) {
    let mut require = |name: &str, cents: u32| {
        if cents == 0 {
            report.missing.push(format!("pricing.{name}"));
        }
    };
    require("local_monthly_cents", pricing.local_monthly_cents);
    require("tollfree_monthly_cents", pricing.tollfree_monthly_cents);
    require("mobile_monthly_cents", pricing.mobile_monthly_cents);
    // setup_cents may legitimately be zero
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dialgate_core::types::{CredentialMode, TelephonyCredential};
    use tokio::sync::RwLock;

    struct FixedStore {
        credential: RwLock<Option<TelephonyCredential>>,
    }

    #[async_trait]
    impl CredentialStore for FixedStore {
        async fn mode(&self, _tenant_id: &str) -> CoreResult<CredentialMode> {
            Ok(CredentialMode::Shared)
        }

        async fn tenant_credential(
            &self,
            _tenant_id: &str,
        ) -> CoreResult<Option<TelephonyCredential>> {
            Ok(None)
        }

        async fn platform_credential(&self) -> CoreResult<Option<TelephonyCredential>> {
            Ok(self.credential.read().await.clone())
        }
    }

    fn complete_credential() -> TelephonyCredential {
        TelephonyCredential {
            credentials: ProviderCredentials::Twilio {
                account_sid: "AC_test".to_string(),
                auth_token: "token".to_string(),
                api_key_sid: None,
                api_key_secret: None,
            },
            default_caller_number: Some("+15559990000".to_string()),
            voice_application_sid: Some("AP_test".to_string()),
        }
    }

    #[tokio::test]
    async fn complete_configuration_is_ready() {
        let store = FixedStore {
            credential: RwLock::new(Some(complete_credential())),
        };
        let report = run_preflight(&store, &NumberPricing::default())
            .await
            .unwrap();
        assert!(report.is_ready(), "unexpected missing: {:?}", report.missing);
    }

    #[tokio::test]
    async fn missing_credential_reported_by_name() {
        let store = FixedStore {
            credential: RwLock::new(None),
        };
        let report = run_preflight(&store, &NumberPricing::default())
            .await
            .unwrap();
        assert!(!report.is_ready());
        assert!(report.missing.contains(&"platform_credential".to_string()));
    }

    #[tokio::test]
    async fn blank_fields_and_zero_pricing_reported() {
        let mut credential = complete_credential();
        credential.credentials = ProviderCredentials::Twilio {
            account_sid: "AC_test".to_string(),
            auth_token: "  ".to_string(),
            api_key_sid: None,
            api_key_secret: None,
        };
        credential.default_caller_number = Some("not-a-number".to_string());
        let store = FixedStore {
            credential: RwLock::new(Some(credential)),
        };

        let pricing = NumberPricing {
            local_monthly_cents: 0,
            ..NumberPricing::default()
        };
        let report = run_preflight(&store, &pricing).await.unwrap();

        assert!(
            report
                .missing
                .contains(&"platform_credential.auth_token".to_string())
        );
        assert!(
            report
                .missing
                .iter()
                .any(|m| m.starts_with("platform_credential.default_caller_number"))
        );
        assert!(report.missing.contains(&"pricing.local_monthly_cents".to_string()));
    }

    #[tokio::test]
    async fn zero_setup_cost_is_allowed() {
        let store = FixedStore {
            credential: RwLock::new(Some(complete_credential())),
        };
        let pricing = NumberPricing {
            setup_cents: 0,
            ..NumberPricing::default()
        };
        let report = run_preflight(&store, &pricing).await.unwrap();
        assert!(report.is_ready());
    }
}
