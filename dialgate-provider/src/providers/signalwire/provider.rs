//! SignalWire TelephonyProvider trait implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::providers::common::{WireAvailabilityPage, WireIncomingNumber, wire_to_available};
use crate::traits::{ErrorContext, TelephonyProvider};
use crate::types::{
    AvailableNumber, FieldType, NumberSearchParams, ProviderCredentialField, ProviderMetadata,
    ProviderType, PurchaseNumberRequest, PurchasedNumber,
};

use super::{MAX_SEARCH_PAGE_SIZE, SignalwireProvider};

#[async_trait]
impl TelephonyProvider for SignalwireProvider {
    fn id(&self) -> &'static str {
        "signalwire"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Signalwire,
            name: "SignalWire".to_string(),
            description: "SignalWire LaML number inventory".to_string(),
            required_fields: vec![
                ProviderCredentialField {
                    key: "space".to_string(),
                    label: "Space".to_string(),
                    field_type: FieldType::Text,
                    placeholder: Some("example (from example.signalwire.com)".to_string()),
                    help_text: None,
                },
                ProviderCredentialField {
                    key: "projectId".to_string(),
                    label: "Project ID".to_string(),
                    field_type: FieldType::Text,
                    placeholder: None,
                    help_text: None,
                },
                ProviderCredentialField {
                    key: "apiToken".to_string(),
                    label: "API Token".to_string(),
                    field_type: FieldType::Password,
                    placeholder: None,
                    help_text: None,
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
