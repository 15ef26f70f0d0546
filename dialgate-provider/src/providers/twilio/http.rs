//! Twilio HTTP request methods

use serde::Deserialize;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::providers::common::WireErrorBody;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{TWILIO_API_BASE, TwilioProvider};

/// Reads tolerate one retry; purchase/release never retry.
const READ_MAX_RETRIES: u32 = 1;

impl TwilioProvider {
    fn account_url(&self, path: &str) -> String {
        format!("{TWILIO_API_BASE}/Accounts/{}{path}", self.account_sid)
    }

    /// Basic-auth pair: API key pair when configured, account token otherwise.
    fn auth_pair(&self) -> (&str, &str) {
        match (&self.api_key_sid, &self.api_key_secret) {
            (Some(sid), Some(secret)) => (sid.as_str(), secret.as_str()),
            _ => (self.account_sid.as_str(), self.auth_token.as_str()),
        }
    }

    fn map_wire_error(&self, status: u16, body: &str, context: ErrorContext) -> crate::error::ProviderError {
        let raw = match HttpUtils::parse_json::<WireErrorBody>(body, self.provider_name()) {
            Ok(parsed) => {
                let message = parsed
                    .message
                    .unwrap_or_else(|| format!("HTTP {status}"));
                match parsed.code {
                    Some(code) => RawApiError::with_code(code.to_string(), message),
                    None => RawApiError::new(message),
                }
            }
            Err(_) => RawApiError::new(format!("HTTP {status}: {body}")),
        };
        log::warn!("[{}] API error: {}", self.provider_name(), raw.message);
        self.map_error(raw, context)
    }

    /// GET with a single transient-error retry (idempotent reads only).
    pub(crate) async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path_and_query: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let url = self.account_url(path_and_query);
        let (user, pass) = self.auth_pair();
        let request = self.client.get(&url).basic_auth(user, Some(pass));

        let (status, body) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            path_and_query,
            READ_MAX_RETRIES,
        )
        .await?;

        if !(200..300).contains(&status) {
            return Err(self.map_wire_error(status, &body, context));
        }
        HttpUtils::parse_json(&body, self.provider_name())
    }

    /// Form-encoded POST, executed exactly once (mutations are never replayed).
    pub(crate) async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        form: &[(&str, String)],
        context: ErrorContext,
    ) -> Result<T> {
        let url = self.account_url(path);
        let (user, pass) = self.auth_pair();
        let request = self
            .client
            .post(&url)
            .basic_auth(user, Some(pass))
            .form(form);

        let (status, body) =
            HttpUtils::execute_request(request, self.provider_name(), "POST", path).await?;

        if !(200..300).contains(&status) {
            return Err(self.map_wire_error(status, &body, context));
        }
        HttpUtils::parse_json(&body, self.provider_name())
    }

    /// DELETE, executed exactly once.
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        let url = self.account_url(path);
        let (user, pass) = self.auth_pair();
        let request = self.client.delete(&url).basic_auth(user, Some(pass));

        let (status, body) =
            HttpUtils::execute_request(request, self.provider_name(), "DELETE", path).await?;

        // 204 on success; 404 and error payloads go through the mapper.
        if !(200..300).contains(&status) {
            return Err(self.map_wire_error(status, &body, context));
        }
        Ok(())
    }
}
