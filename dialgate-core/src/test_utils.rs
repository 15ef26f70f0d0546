//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use dialgate_provider::{
    AvailableNumber, NumberCapabilities, NumberSearchParams, ProviderCredentials, ProviderError,
    ProviderMetadata, ProviderType, PurchaseNumberRequest, PurchasedNumber, TelephonyProvider,
};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{
    ApplyFn, ClientDirectory, CredentialStore, InventoryRepository, ObjectStore, ProviderFactory,
    RecordingRepository, RentalRepository, SelectionRepository, SignedUrl,
};
use crate::types::{
    CredentialMode, InventoryNumber, NumberAvailability, NumberSelection, NumberType, Recording,
    Rental, RentalStatus, SelectionStatus, TelephonyCredential,
};

// ===== MockInventoryRepository =====

pub struct MockInventoryRepository {
    numbers: RwLock<HashMap<String, InventoryNumber>>,
}

impl MockInventoryRepository {
    pub fn new() -> Self {
        Self {
            numbers: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl InventoryRepository for MockInventoryRepository {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<InventoryNumber>> {
        Ok(self.numbers.read().await.get(id).cloned())
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> CoreResult<Option<InventoryNumber>> {
        Ok(self
            .numbers
            .read()
            .await
            .values()
            .find(|n| n.phone_number == phone_number)
            .cloned())
    }

    async fn list_available(&self, now: DateTime<Utc>) -> CoreResult<Vec<InventoryNumber>> {
        Ok(self
            .numbers
            .read()
            .await
            .values()
            .filter(|n| n.is_effectively_available(now))
            .cloned()
            .collect())
    }

    async fn save(&self, number: &InventoryNumber) -> CoreResult<()> {
        self.numbers
            .write()
            .await
            .insert(number.id.clone(), number.clone());
        Ok(())
    }

    async fn transition(
        &self,
        id: &str,
        expected: &[NumberAvailability],
        apply: ApplyFn<InventoryNumber>,
    ) -> CoreResult<bool> {
        // 写锁内检查 + 应用，与真实存储的单临界区语义一致
        let mut store = self.numbers.write().await;
        let Some(current) = store.get_mut(id) else {
            return Ok(false);
        };
        if !expected.contains(&current.availability) {
            return Ok(false);
        }
        let mut candidate = current.clone();
        if !apply(&mut candidate) {
            return Ok(false);
        }
        *current = candidate;
        Ok(true)
    }
}

// ===== MockSelectionRepository =====

pub struct MockSelectionRepository {
    selections: RwLock<HashMap<String, NumberSelection>>,
    /// 如果 Some，save 时返回此错误（用于测试回滚路径）
    save_error: RwLock<Option<String>>,
}

impl MockSelectionRepository {
    pub fn new() -> Self {
        Self {
            selections: RwLock::new(HashMap::new()),
            save_error: RwLock::new(None),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }
}

#[async_trait]
impl SelectionRepository for MockSelectionRepository {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<NumberSelection>> {
        Ok(self.selections.read().await.get(id).cloned())
    }

    async fn save(&self, selection: &NumberSelection) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.selections
            .write()
            .await
            .insert(selection.id.clone(), selection.clone());
        Ok(())
    }

    async fn update_status(&self, id: &str, status: SelectionStatus) -> CoreResult<()> {
        let mut store = self.selections.write().await;
        if let Some(selection) = store.get_mut(id) {
            selection.status = status;
        }
        Ok(())
    }

    async fn expire_stale(&self, now: DateTime<Utc>) -> CoreResult<u64> {
        let mut store = self.selections.write().await;
        let mut expired = 0;
        for selection in store.values_mut() {
            if matches!(
                selection.status,
                SelectionStatus::Selected | SelectionStatus::PendingPayment
            ) && selection.reserved_until <= now
            {
                selection.status = SelectionStatus::Expired;
                expired += 1;
            }
        }
        Ok(expired)
    }
}

// ===== MockRentalRepository =====

pub struct MockRentalRepository {
    rentals: RwLock<HashMap<String, Rental>>,
    /// 如果 Some，save 时返回此错误（用于测试对账路径）
    save_error: RwLock<Option<String>>,
}

impl MockRentalRepository {
    pub fn new() -> Self {
        Self {
            rentals: RwLock::new(HashMap::new()),
            save_error: RwLock::new(None),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }
}

#[async_trait]
impl RentalRepository for MockRentalRepository {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Rental>> {
        Ok(self.rentals.read().await.get(id).cloned())
    }

    async fn find_by_tenant(&self, tenant_id: &str) -> CoreResult<Vec<Rental>> {
        Ok(self
            .rentals
            .read()
            .await
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn save(&self, rental: &Rental) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.rentals
            .write()
            .await
            .insert(rental.id.clone(), rental.clone());
        Ok(())
    }

    async fn transition(
        &self,
        id: &str,
        expected: &[RentalStatus],
        apply: ApplyFn<Rental>,
    ) -> CoreResult<bool> {
        let mut store = self.rentals.write().await;
        let Some(current) = store.get_mut(id) else {
            return Ok(false);
        };
        if !expected.contains(&current.status) {
            return Ok(false);
        }
        let mut candidate = current.clone();
        if !apply(&mut candidate) {
            return Ok(false);
        }
        *current = candidate;
        Ok(true)
    }

    async fn find_due(&self, now: DateTime<Utc>) -> CoreResult<Vec<Rental>> {
        Ok(self
            .rentals
            .read()
            .await
            .values()
            .filter(|r| {
                matches!(
                    r.status,
                    RentalStatus::Active | RentalStatus::PendingCancellation
                ) && r.rental_end <= now
            })
            .cloned()
            .collect())
    }
}

// ===== MockRecordingRepository =====

pub struct MockRecordingRepository {
    recordings: RwLock<HashMap<String, Recording>>,
}

impl MockRecordingRepository {
    pub fn new() -> Self {
        Self {
            recordings: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RecordingRepository for MockRecordingRepository {
    async fn find_by_sid(&self, recording_sid: &str) -> CoreResult<Option<Recording>> {
        Ok(self.recordings.read().await.get(recording_sid).cloned())
    }

    async fn latest_by_call_sid(&self, call_sid: &str) -> CoreResult<Option<Recording>> {
        Ok(self
            .recordings
            .read()
            .await
            .values()
            .filter(|r| r.call_sid == call_sid)
            .max_by_key(|r| r.updated_at)
            .cloned())
    }

    async fn upsert(&self, recording: &Recording) -> CoreResult<()> {
        self.recordings
            .write()
            .await
            .insert(recording.recording_sid.clone(), recording.clone());
        Ok(())
    }
}

// ===== MockCredentialStore =====

pub struct MockCredentialStore {
    modes: RwLock<HashMap<String, CredentialMode>>,
    tenant_credentials: RwLock<HashMap<String, TelephonyCredential>>,
    platform: RwLock<Option<TelephonyCredential>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self {
            modes: RwLock::new(HashMap::new()),
            tenant_credentials: RwLock::new(HashMap::new()),
            platform: RwLock::new(Some(test_credential())),
        }
    }

    pub async fn set_mode(&self, tenant_id: &str, mode: CredentialMode) {
        self.modes.write().await.insert(tenant_id.to_string(), mode);
    }

    pub async fn set_tenant_credential(&self, tenant_id: &str, credential: TelephonyCredential) {
        self.tenant_credentials
            .write()
            .await
            .insert(tenant_id.to_string(), credential);
    }

    pub async fn clear_platform(&self) {
        *self.platform.write().await = None;
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
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
        Ok(self.platform.read().await.clone())
    }
}

// ===== MockClientDirectory =====

pub struct MockClientDirectory {
    owners: RwLock<HashMap<String, String>>,
    /// 如果 Some，查询时返回此错误（用于测试降级路径）
    error: RwLock<Option<String>>,
}

impl MockClientDirectory {
    pub fn new() -> Self {
        Self {
            owners: RwLock::new(HashMap::new()),
            error: RwLock::new(None),
        }
    }

    pub async fn assign(&self, phone_number: &str, identity: &str) {
        self.owners
            .write()
            .await
            .insert(phone_number.to_string(), identity.to_string());
    }

    pub async fn set_error(&self, err: Option<String>) {
        *self.error.write().await = err;
    }
}

#[async_trait]
impl ClientDirectory for MockClientDirectory {
    async fn owner_of(&self, phone_number: &str) -> CoreResult<Option<String>> {
        if let Some(ref msg) = *self.error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        Ok(self.owners.read().await.get(phone_number).cloned())
    }
}

// ===== MockObjectStore =====

pub struct MockObjectStore;

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn create_signed_url(&self, path: &str, ttl_secs: u64) -> CoreResult<SignedUrl> {
        let expires_at =
            Utc::now() + chrono::Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX));
        Ok(SignedUrl {
            url: format!(
                "https://files.test/{path}?expires={}&signature=deadbeef",
                expires_at.timestamp()
            ),
            expires_at,
        })
    }
}

// ===== MockTelephonyProvider =====

pub struct MockTelephonyProvider {
    search_results: RwLock<Vec<AvailableNumber>>,
    purchased: RwLock<Vec<String>>,
    released: RwLock<Vec<String>>,
    fail_purchase: RwLock<bool>,
    fail_release: RwLock<bool>,
}

impl MockTelephonyProvider {
    pub fn new() -> Self {
        Self {
            search_results: RwLock::new(Vec::new()),
            purchased: RwLock::new(Vec::new()),
            released: RwLock::new(Vec::new()),
            fail_purchase: RwLock::new(false),
            fail_release: RwLock::new(false),
        }
    }

    pub async fn set_search_results(&self, results: Vec<AvailableNumber>) {
        *self.search_results.write().await = results;
    }

    pub async fn fail_purchase(&self, fail: bool) {
        *self.fail_purchase.write().await = fail;
    }

    pub async fn fail_release(&self, fail: bool) {
        *self.fail_release.write().await = fail;
    }

    pub async fn purchased(&self) -> Vec<String> {
        self.purchased.read().await.clone()
    }

    pub async fn released(&self) -> Vec<String> {
        self.released.read().await.clone()
    }
}

#[async_trait]
impl TelephonyProvider for MockTelephonyProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Twilio,
            name: "Mock".to_string(),
            description: "In-memory provider for tests".to_string(),
            required_fields: vec![],
        }
    }

    async fn validate_credentials(&self) -> dialgate_provider::Result<bool> {
        Ok(true)
    }

    async fn search_numbers(
        &self,
        _params: &NumberSearchParams,
    ) -> dialgate_provider::Result<Vec<AvailableNumber>> {
        Ok(self.search_results.read().await.clone())
    }

    async fn purchase_number(
        &self,
        req: &PurchaseNumberRequest,
    ) -> dialgate_provider::Result<PurchasedNumber> {
        if *self.fail_purchase.read().await {
            return Err(ProviderError::NumberUnavailable {
                provider: "mock".to_string(),
                phone_number: req.phone_number.clone(),
                raw_message: None,
            });
        }
        self.purchased.write().await.push(req.phone_number.clone());
        Ok(PurchasedNumber {
            number_sid: format!("PN{}", self.purchased.read().await.len()),
            phone_number: req.phone_number.clone(),
            capabilities: NumberCapabilities::voice_only(),
        })
    }

    async fn release_number(&self, number_sid: &str) -> dialgate_provider::Result<()> {
        if *self.fail_release.read().await {
            return Err(ProviderError::NetworkError {
                provider: "mock".to_string(),
                detail: "connection reset".to_string(),
            });
        }
        self.released.write().await.push(number_sid.to_string());
        Ok(())
    }
}

/// 返回固定 mock provider 的工厂
pub struct MockProviderFactory {
    provider: Arc<MockTelephonyProvider>,
}

impl ProviderFactory for MockProviderFactory {
    fn create(
        &self,
        _credentials: &ProviderCredentials,
    ) -> CoreResult<Arc<dyn dialgate_provider::TelephonyProvider>> {
        Ok(self.provider.clone())
    }
}

// ===== 测试夹具 =====

/// 组装好的测试上下文，mock 句柄全部外露
pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub inventory: Arc<MockInventoryRepository>,
    pub selections: Arc<MockSelectionRepository>,
    pub rentals: Arc<MockRentalRepository>,
    pub recordings: Arc<MockRecordingRepository>,
    pub credential_store: Arc<MockCredentialStore>,
    pub directory: Arc<MockClientDirectory>,
    pub provider: Arc<MockTelephonyProvider>,
}

impl TestContext {
    /// 创建测试上下文
    ///
    /// 默认所有租户处于 Shared 模式，平台凭证已配置。
    pub fn new() -> Self {
        let inventory = Arc::new(MockInventoryRepository::new());
        let selections = Arc::new(MockSelectionRepository::new());
        let rentals = Arc::new(MockRentalRepository::new());
        let recordings = Arc::new(MockRecordingRepository::new());
        let credential_store = Arc::new(MockCredentialStore::new());
        let directory = Arc::new(MockClientDirectory::new());
        let provider = Arc::new(MockTelephonyProvider::new());
        let factory = Arc::new(MockProviderFactory {
            provider: provider.clone(),
        });

        let ctx = Arc::new(ServiceContext::new(
            credential_store.clone(),
            inventory.clone(),
            selections.clone(),
            rentals.clone(),
            recordings.clone(),
            directory.clone(),
            Arc::new(MockObjectStore),
            factory,
        ));

        Self {
            ctx,
            inventory,
            selections,
            rentals,
            recordings,
            credential_store,
            directory,
            provider,
        }
    }

    /// 向库存播种一个号码
    pub async fn seed_number(&self, number: InventoryNumber) {
        self.inventory
            .save(&number)
            .await
            .expect("seeding inventory should not fail");
    }

    /// 读取库存号码（不存在时 panic）
    pub async fn number(&self, id: &str) -> InventoryNumber {
        self.inventory
            .find_by_id(id)
            .await
            .expect("lookup should not fail")
            .expect("number should exist")
    }

    /// 读取选号记录（不存在时 panic）
    pub async fn selection(&self, id: &str) -> NumberSelection {
        self.selections
            .find_by_id(id)
            .await
            .expect("lookup should not fail")
            .expect("selection should exist")
    }
}

/// 创建一个用于测试的库存号码（Local / US / 可售）
pub fn test_inventory_number(id: &str, phone_number: &str) -> InventoryNumber {
    InventoryNumber {
        id: id.to_string(),
        phone_number: phone_number.to_string(),
        number_type: NumberType::Local,
        country_code: "US".to_string(),
        capabilities: NumberCapabilities::voice_only(),
        monthly_cost_cents: 115,
        setup_cost_cents: 0,
        availability: NumberAvailability::Available,
        reserved_until: None,
        reserved_by_tenant: None,
    }
}

/// 创建一个用于测试的 `TelephonyCredential`
pub fn test_credential() -> TelephonyCredential {
    TelephonyCredential {
        credentials: ProviderCredentials::Twilio {
            account_sid: "AC_test".to_string(),
            auth_token: "token_test".to_string(),
            api_key_sid: None,
            api_key_secret: None,
        },
        default_caller_number: Some("+15559990000".to_string()),
        voice_application_sid: Some("AP_test".to_string()),
    }
}
