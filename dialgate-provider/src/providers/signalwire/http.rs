//! SignalWire HTTP request methods

use serde::Deserialize;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::providers::common::WireErrorBody;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::SignalwireProvider;

const READ_MAX_RETRIES: u32 = 1;

impl SignalwireProvider {
    fn map_wire_error(
        &self,
        status: u16,
        body: &str,
        context: ErrorContext,
    ) -> crate::error::ProviderError {
        let raw = match HttpUtils::parse_json::<WireErrorBody>(body, self.provider_name()) {
            Ok(parsed) => {
                let message = parsed.message.unwrap_or_else(|| format!("HTTP {status}"));
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

    pub(crate) async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path_and_query: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path_and_query}", self.api_base());
        let request = self
            .client
            .get(&url)
            .basic_auth(&self.project_id, Some(&self.api_token));

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

    pub(crate) async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        form: &[(&str, String)],
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base());
        let request = self
            .client
            .post(&url)
            .basic_auth(&self.project_id, Some(&self.api_token))
            .form(form);

        let (status, body) =
            HttpUtils::execute_request(request, self.provider_name(), "POST", path).await?;

        if !(200..300).contains(&status) {
            return Err(self.map_wire_error(status, &body, context));
        }
        HttpUtils::parse_json(&body, self.provider_name())
    }

    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        let url = format!("{}{path}", self.api_base());
        let request = self
            .client
            .delete(&url)
            .basic_auth(&self.project_id, Some(&self.api_token));

        let (status, body) =
            HttpUtils::execute_request(request, self.provider_name(), "DELETE", path).await?;

        if !(200..300).contains(&status) {
            return Err(self.map_wire_error(status, &body, context));
        }
        Ok(())
    }
}
