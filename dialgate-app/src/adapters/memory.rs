//! In-memory storage adapters.
//!
//! Backs every repository trait with a `RwLock`-guarded map. Suitable for
//! self-hosted single-process deployments and integration tests; conditional
//! transitions run entirely inside one write-lock critical section, so the
//! CAS guarantees the services rely on hold here exactly as they would
//! against a database with row-level `WHERE status IN (…)` updates.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use dialgate_core::error::CoreResult;
use dialgate_core::traits::{
    ApplyFn, ClientDirectory, InventoryRepository, RecordingRepository, RentalRepository,
    SelectionRepository,
};
use dialgate_core::types::{
    InventoryNumber, NumberAvailability, NumberSelection, Recording, Rental, RentalStatus,
    SelectionStatus,
};

/// In-memory number inventory.
pub struct MemoryInventoryRepository {
    numbers: RwLock<HashMap<String, InventoryNumber>>,
}

impl MemoryInventoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            numbers: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryInventoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
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
        let mut available: Vec<InventoryNumber> = self
            .numbers
            .read()
            .await
            .values()
            .filter(|n| n.is_effectively_available(now))
            .cloned()
            .collect();
        available.sort_by(|a, b| a.phone_number.cmp(&b.phone_number));
        Ok(available)
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
        let mut store = self.numbers.write().await;
        let Some(current) = store.get_mut(id) else {
            return Ok(false);
        };
        if !expected.contains(&current.availability) {
            return Ok(false);
        }
        // apply 在副本上执行，放弃时不留下半成品写入
        let mut candidate = current.clone();
        if !apply(&mut candidate) {
            return Ok(false);
        }
        *current = candidate;
        Ok(true)
    }
}

/// In-memory selection store.
pub struct MemorySelectionRepository {
    selections: RwLock<HashMap<String, NumberSelection>>,
}

impl MemorySelectionRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySelectionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SelectionRepository for MemorySelectionRepository {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<NumberSelection>> {
        Ok(self.selections.read().await.get(id).cloned())
    }

    async fn save(&self, selection: &NumberSelection) -> CoreResult<()> {
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

/// In-memory rental store.
pub struct MemoryRentalRepository {
    rentals: RwLock<HashMap<String, Rental>>,
}

impl MemoryRentalRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rentals: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRentalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RentalRepository for MemoryRentalRepository {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Rental>> {
        Ok(self.rentals.read().await.get(id).cloned())
    }

    async fn find_by_tenant(&self, tenant_id: &str) -> CoreResult<Vec<Rental>> {
        let mut rentals: Vec<Rental> = self
            .rentals
            .read()
            .await
            .values()
            .filter(|r| r.tenant_id == tenant_id)
            .cloned()
            .collect();
        rentals.sort_by(|a, b| a.rental_start.cmp(&b.rental_start));
        Ok(rentals)
    }

    async fn save(&self, rental: &Rental) -> CoreResult<()> {
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

/// In-memory recording store, keyed by recording SID.
pub struct MemoryRecordingRepository {
    recordings: RwLock<HashMap<String, Recording>>,
}

impl MemoryRecordingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recordings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRecordingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordingRepository for MemoryRecordingRepository {
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

/// In-memory client directory.
///
/// Number-to-client assignments are registered at runtime, typically right
/// after a purchase completes.
pub struct MemoryClientDirectory {
    owners: RwLock<HashMap<String, String>>,
}

impl MemoryClientDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            owners: RwLock::new(HashMap::new()),
        }
    }

    /// Assign an inbound number to a client identity.
    pub async fn assign(&self, phone_number: &str, client_identity: &str) {
        self.owners
            .write()
            .await
            .insert(phone_number.to_string(), client_identity.to_string());
    }

    /// Remove an assignment, e.g. when the number leaves the tenant.
    pub async fn unassign(&self, phone_number: &str) {
        self.owners.write().await.remove(phone_number);
    }
}

impl Default for MemoryClientDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientDirectory for MemoryClientDirectory {
    async fn owner_of(&self, phone_number: &str) -> CoreResult<Option<String>> {
        Ok(self.owners.read().await.get(phone_number).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use dialgate_core::types::{NumberCapabilities, NumberType};

    fn number(id: &str, phone: &str) -> InventoryNumber {
        InventoryNumber {
            id: id.to_string(),
            phone_number: phone.to_string(),
            number_type: NumberType::Local,
            country_code: "US".to_string(),
            capabilities: NumberCapabilities {
                voice: true,
                sms: false,
                mms: false,
                fax: false,
            },
            monthly_cost_cents: 115,
            setup_cost_cents: 0,
            availability: NumberAvailability::Available,
            reserved_until: None,
            reserved_by_tenant: None,
        }
    }

    #[tokio::test]
    async fn transition_rejects_unexpected_state() {
        let repo = MemoryInventoryRepository::new();
        let mut n = number("num-1", "+15550001111");
        n.availability = NumberAvailability::Purchased;
        repo.save(&n).await.unwrap();

        let ok = repo
            .transition(
                "num-1",
                &[NumberAvailability::Available],
                Box::new(|n| {
                    n.availability = NumberAvailability::Reserved;
                    true
                }),
            )
            .await
            .unwrap();
        assert!(!ok);
        let stored = repo.find_by_id("num-1").await.unwrap().unwrap();
        assert_eq!(stored.availability, NumberAvailability::Purchased);
    }

    #[tokio::test]
    async fn transition_abort_leaves_record_untouched() {
        let repo = MemoryInventoryRepository::new();
        repo.save(&number("num-1", "+15550001111")).await.unwrap();

        let ok = repo
            .transition(
                "num-1",
                &[NumberAvailability::Available],
                Box::new(|n| {
                    n.availability = NumberAvailability::Reserved;
                    false
                }),
            )
            .await
            .unwrap();
        assert!(!ok);
        let stored = repo.find_by_id("num-1").await.unwrap().unwrap();
        assert_eq!(stored.availability, NumberAvailability::Available);
    }

    #[tokio::test]
    async fn transition_missing_id_is_false_not_error() {
        let repo = MemoryInventoryRepository::new();
        let ok = repo
            .transition("ghost", &[NumberAvailability::Available], Box::new(|_| true))
            .await
            .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn list_available_includes_expired_reservations() {
        let repo = MemoryInventoryRepository::new();
        let now = Utc::now();

        let mut stale = number("num-1", "+15550001111");
        stale.availability = NumberAvailability::Reserved;
        stale.reserved_until = Some(now - Duration::minutes(5));
        repo.save(&stale).await.unwrap();

        let mut held = number("num-2", "+15550002222");
        held.availability = NumberAvailability::Reserved;
        held.reserved_until = Some(now + Duration::minutes(5));
        repo.save(&held).await.unwrap();

        let available = repo.list_available(now).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "num-1");
    }

    #[tokio::test]
    async fn latest_recording_wins_by_updated_at() {
        use dialgate_core::types::RecordingStatus;

        let repo = MemoryRecordingRepository::new();
        let base = Utc::now();
        let mk = |sid: &str, updated_at| Recording {
            recording_sid: sid.to_string(),
            call_sid: "CA1".to_string(),
            status: RecordingStatus::Completed,
            download_status: RecordingStatus::Completed,
            storage_path: Some(format!("recordings/{sid}.mp3")),
            duration_seconds: Some(12),
            channels: Some(2),
            transcription: None,
            created_at: base,
            updated_at,
        };

        repo.upsert(&mk("RE1", base)).await.unwrap();
        repo.upsert(&mk("RE2", base + Duration::seconds(10)))
            .await
            .unwrap();

        let latest = repo.latest_by_call_sid("CA1").await.unwrap().unwrap();
        assert_eq!(latest.recording_sid, "RE2");
    }

    #[tokio::test]
    async fn client_directory_assign_and_unassign() {
        let dir = MemoryClientDirectory::new();
        dir.assign("+15550001111", "user_alice").await;
        assert_eq!(
            dir.owner_of("+15550001111").await.unwrap().as_deref(),
            Some("user_alice")
        );
        dir.unassign("+15550001111").await;
        assert!(dir.owner_of("+15550001111").await.unwrap().is_none());
    }
}
