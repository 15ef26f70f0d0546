//! Twilio TelephonyProvider trait implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::providers::common::{
    WireAvailabilityPage, WireIncomingNumber, wire_to_available,
};
use crate::traits::{ErrorContext, TelephonyProvider};
use crate::types::{
    AvailableNumber, FieldType, NumberSearchParams, ProviderCredentialField, ProviderMetadata,
    ProviderType, PurchaseNumberRequest, PurchasedNumber,
};

use super::{MAX_SEARCH_PAGE_SIZE, TwilioProvider};

impl TwilioProvider {
    pub(crate) fn search_path(&self, params: &NumberSearchParams) -> String {
        let mut path = format!(
            "/AvailablePhoneNumbers/{}/{}.json?PageSize={}&VoiceEnabled=true",
            urlencoding::encode(&params.country_code),
            params.number_type.api_segment(),
            params.limit.min(MAX_SEARCH_PAGE_SIZE)
        );
        if let Some(ref contains) = params.contains
            && !contains.is_empty()
        {
            path.push_str(&format!("&Contains={}", urlencoding::encode(contains)));
        }
        if let Some(ref area_code) = params.area_code
            && !area_code.is_empty()
        {
            path.push_str(&format!("&AreaCode={}", urlencoding::encode(area_code)));
        }
        path
    }
}

#[async_trait]
impl TelephonyProvider for TwilioProvider {
    fn id(&self) -> &'static str {
        "twilio"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Twilio,
            name: "Twilio".to_string(),
            description: "Twilio Programmable Voice number inventory".to_string(),
            required_fields: vec![
                ProviderCredentialField {
                    key: "accountSid".to_string(),
                    label: "Account SID".to_string(),
                    field_type: FieldType::Text,
                    placeholder: Some("ACxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx".to_string()),
                    help_text: None,
                },
                ProviderCredentialField {
                    key: "authToken".to_string(),
                    label: "Auth Token".to_string(),
                    field_type: FieldType::Password,
                    placeholder: None,
                    help_text: Some(
                        "Found under Account Info in the Twilio console.".to_string(),
                    ),
                },
            ],
        }
    }

    async fn validate_credentials(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct AccountResource {
            status: String,
        }

        match self
            .get::<AccountResource>(".json", ErrorContext::default())
            .await
        {
            Ok(account) => Ok(account.status == "active"),
            Err(_) => Ok(false),
        }
    }

    async fn search_numbers(&self, params: &NumberSearchParams) -> Result<Vec<AvailableNumber>> {
        let path = self.search_path(params);
        let page: WireAvailabilityPage = self.get(&path, ErrorContext::default()).await?;

        let monthly = self.pricing.monthly_cents(params.number_type);
        let setup = self.pricing.setup_cents;
        Ok(page
            .available_phone_numbers
            .into_iter()
            .map(|wire| {
                wire_to_available(wire, params.number_type, &params.country_code, monthly, setup)
            })
            .collect())
    }

    async fn purchase_number(&self, req: &PurchaseNumberRequest) -> Result<PurchasedNumber> {
        let mut form: Vec<(&str, String)> = vec![("PhoneNumber", req.phone_number.clone())];
        if let Some(ref app_sid) = req.voice_application_sid {
            form.push(("VoiceApplicationSid", app_sid.clone()));
        }
        if let Some(ref name) = req.friendly_name {
            form.push(("FriendlyName", name.clone()));
        }

        let context = ErrorContext {
            phone_number: Some(req.phone_number.clone()),
            number_sid: None,
        };
        let wire: WireIncomingNumber = self
            .post_form("/IncomingPhoneNumbers.json", &form, context)
            .await?;

        Ok(PurchasedNumber {
            number_sid: wire.sid,
            phone_number: wire.phone_number,
            capabilities: wire.capabilities.into(),
        })
    }

    async fn release_number(&self, number_sid: &str) -> Result<()> {
        let context = ErrorContext {
            phone_number: None,
            number_sid: Some(number_sid.to_string()),
        };
        self.delete(
            &format!(
                "/IncomingPhoneNumbers/{}.json",
                urlencoding::encode(number_sid)
            ),
            context,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumberType;

    #[test]
    fn search_path_basic() {
        let p = TwilioProvider::new("AC0".to_string(), "tok".to_string());
        let path = p.search_path(&NumberSearchParams::default());
        assert_eq!(
            path,
            "/AvailablePhoneNumbers/US/Local.json?PageSize=20&VoiceEnabled=true"
        );
    }

    #[test]
    fn search_path_with_filters() {
        let p = TwilioProvider::new("AC0".to_string(), "tok".to_string());
        let params = NumberSearchParams {
            country_code: "GB".to_string(),
            number_type: NumberType::Mobile,
            contains: Some("555".to_string()),
            area_code: Some("415".to_string()),
            limit: 50,
        };
        let path = p.search_path(&params);
        assert!(path.starts_with("/AvailablePhoneNumbers/GB/Mobile.json?PageSize=50"));
        assert!(path.contains("&Contains=555"));
        assert!(path.contains("&AreaCode=415"));
    }

    #[test]
    fn search_page_size_capped() {
        let p = TwilioProvider::new("AC0".to_string(), "tok".to_string());
        let params = NumberSearchParams {
            limit: 500,
            ..NumberSearchParams::default()
        };
        assert!(p.search_path(&params).contains("PageSize=100"));
    }
}
