//! 号码库存服务
//!
//! 搜索是只读操作；预订是唯一的 Available -> Reserved 入口，
//! 通过存储层的 CAS 原语保证并发预订只有一个赢家。
//! 过期预订采取双轨回收：读取时惰性判定 + 周期性主动清扫。

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use dialgate_provider::{AvailableNumber, NumberSearchParams};

use crate::error::{CoreError, CoreResult};
use crate::types::{
    InventoryNumber, NumberAvailability, NumberSelection, PricingSnapshot, SelectionStatus,
};

use super::{CredentialService, ServiceContext};

/// 号码库存服务
pub struct InventoryService {
    ctx: Arc<ServiceContext>,
    credentials: CredentialService,
}

impl InventoryService {
    /// 创建号码库存服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            credentials: CredentialService::new(ctx.clone()),
            ctx,
        }
    }

    /// 实时搜索供应商可购号码（只读，不改库存）
    pub async fn search_provider(
        &self,
        tenant_id: &str,
        params: &NumberSearchParams,
    ) -> CoreResult<Vec<AvailableNumber>> {
        let (provider, _) = self.credentials.provider_for(tenant_id).await?;
        let found = provider.search_numbers(params).await?;
        log::debug!(
            "Provider {} returned {} candidate numbers for tenant {tenant_id}",
            provider.id(),
            found.len()
        );
        Ok(found)
    }

    /// 列出本地号池中当前可售的号码
    pub async fn list_local_available(&self) -> CoreResult<Vec<InventoryNumber>> {
        self.ctx.inventory_repository.list_available(Utc::now()).await
    }

    /// 预订号码并创建选号记录
    ///
    /// CAS Available -> Reserved：并发竞争同一号码时只有一个租户成功，
    /// 输家得到 [`CoreError::AlreadyReserved`]，应重新搜索。
    /// 过期的既有预订在同一个临界区内被回收后直接改写，
    /// 不存在"先释放再预订"的窗口。
    pub async fn reserve(
        &self,
        number_id: &str,
        tenant_id: &str,
        ttl: Option<Duration>,
    ) -> CoreResult<NumberSelection> {
        let now = Utc::now();
        let ttl = ttl
            .unwrap_or_else(|| Duration::seconds(self.ctx.inventory_config.reservation_ttl_secs));
        let reserved_until = now + ttl;

        let number = self
            .ctx
            .inventory_repository
            .find_by_id(number_id)
            .await?
            .ok_or_else(|| CoreError::NumberNotFound(number_id.to_string()))?;

        let tenant = tenant_id.to_string();
        let won = self
            .ctx
            .inventory_repository
            .transition(
                number_id,
                &[NumberAvailability::Available, NumberAvailability::Reserved],
                Box::new(move |n| {
                    // 在锁内重判：Reserved 且未过期则让路
                    if !n.is_effectively_available(now) {
                        return false;
                    }
                    n.availability = NumberAvailability::Reserved;
                    n.reserved_until = Some(reserved_until);
                    n.reserved_by_tenant = Some(tenant);
                    true
                }),
            )
            .await?;

        if !won {
            log::info!(
                "Tenant {tenant_id} lost the reservation race for {}",
                number.phone_number
            );
            return Err(CoreError::AlreadyReserved(number.phone_number));
        }

        let selection = NumberSelection {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            number_id: number.id.clone(),
            phone_number: number.phone_number.clone(),
            number_type: number.number_type,
            pricing: PricingSnapshot {
                monthly_cost_cents: number.monthly_cost_cents,
                setup_cost_cents: number.setup_cost_cents,
            },
            status: SelectionStatus::Selected,
            reserved_until,
            created_at: now,
        };

        // 选号落库失败时回滚预订，避免号码被无主预订卡住
        if let Err(e) = self.ctx.selection_repository.save(&selection).await {
            log::error!(
                "Failed to persist selection for {}, releasing reservation: {e}",
                selection.phone_number
            );
            if let Err(release_err) = self.release(number_id).await {
                log::warn!(
                    "Rollback release of {} also failed: {release_err}",
                    selection.phone_number
                );
            }
            return Err(e);
        }

        log::info!(
            "Number {} reserved by tenant {tenant_id} until {}",
            selection.phone_number,
            reserved_until.to_rfc3339()
        );
        Ok(selection)
    }

    /// 释放预订（幂等）
    ///
    /// 仅 Reserved -> Available；号码不存在或并非预订状态时静默成功。
    pub async fn release(&self, number_id: &str) -> CoreResult<()> {
        let changed = self
            .ctx
            .inventory_repository
            .transition(
                number_id,
                &[NumberAvailability::Reserved],
                Box::new(|n| {
                    n.availability = NumberAvailability::Available;
                    n.reserved_until = None;
                    n.reserved_by_tenant = None;
                    true
                }),
            )
            .await?;
        if changed {
            log::info!("Reservation released for number {number_id}");
        }
        Ok(())
    }

    /// 主动清扫：回收过期预订并作废过期选号
    ///
    /// 与读取时的惰性判定互补，保证即使无人再查询这些号码，
    /// 库存也会归位。返回回收的预订数量。
    pub async fn reclaim_expired(&self, now: DateTime<Utc>) -> CoreResult<u64> {
        let candidates: Vec<String> = self
            .ctx
            .inventory_repository
            .list_available(now)
            .await?
            .into_iter()
            .filter(|n| n.availability == NumberAvailability::Reserved)
            .map(|n| n.id)
            .collect();

        // 各号码的回收互相独立，并行发起
        let reclaim_futures: Vec<_> = candidates
            .into_iter()
            .map(|id| {
                let repository = Arc::clone(&self.ctx.inventory_repository);
                async move {
                    repository
                        .transition(
                            &id,
                            &[NumberAvailability::Reserved],
                            Box::new(move |n| {
                                // 清扫与新预订竞争时让位给新预订
                                if !n.is_effectively_available(now) {
                                    return false;
                                }
                                n.availability = NumberAvailability::Available;
                                n.reserved_until = None;
                                n.reserved_by_tenant = None;
                                true
                            }),
                        )
                        .await
                }
            })
            .collect();

        let mut reclaimed = 0u64;
        for cleared in futures::future::join_all(reclaim_futures).await {
            if cleared? {
                reclaimed += 1;
            }
        }

        let expired_selections = self.ctx.selection_repository.expire_stale(now).await?;
        if reclaimed > 0 || expired_selections > 0 {
            log::info!(
                "Inventory reclaim: {reclaimed} reservations cleared, {expired_selections} selections expired"
            );
        }
        Ok(reclaimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestContext, test_inventory_number};

    #[tokio::test]
    async fn reserve_marks_number_and_snapshots_pricing() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let service = InventoryService::new(fixture.ctx.clone());

        let selection = service.reserve("n1", "tenant-1", None).await.unwrap();
        assert_eq!(selection.phone_number, "+15550001111");
        assert_eq!(selection.status, SelectionStatus::Selected);
        assert_eq!(selection.pricing.monthly_cost_cents, 115);

        let number = fixture.number("n1").await;
        assert_eq!(number.availability, NumberAvailability::Reserved);
        assert_eq!(number.reserved_by_tenant.as_deref(), Some("tenant-1"));
    }

    #[tokio::test]
    async fn second_reservation_loses() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let service = InventoryService::new(fixture.ctx.clone());

        service.reserve("n1", "tenant-1", None).await.unwrap();
        let err = service.reserve("n1", "tenant-2", None).await.unwrap_err();
        assert!(matches!(err, CoreError::AlreadyReserved(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_reservations_have_a_single_winner() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let service = Arc::new(InventoryService::new(fixture.ctx.clone()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.reserve("n1", &format!("tenant-{i}"), None).await
            }));
        }

        let mut winners = 0;
        let mut losers = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(CoreError::AlreadyReserved(_)) => losers += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(losers, 7);
    }

    #[tokio::test]
    async fn zero_ttl_reservation_is_immediately_reclaimable() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let service = InventoryService::new(fixture.ctx.clone());

        service
            .reserve("n1", "tenant-1", Some(Duration::zero()))
            .await
            .unwrap();

        // Expired reservation: the number shows up as available again...
        let available = service.list_local_available().await.unwrap();
        assert_eq!(available.len(), 1);

        // ...and the next tenant can take it over in a single step.
        let selection = service.reserve("n1", "tenant-2", None).await.unwrap();
        assert_eq!(selection.tenant_id, "tenant-2");

        let number = fixture.number("n1").await;
        assert_eq!(number.reserved_by_tenant.as_deref(), Some("tenant-2"));
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let service = InventoryService::new(fixture.ctx.clone());

        service.reserve("n1", "tenant-1", None).await.unwrap();
        service.release("n1").await.unwrap();
        service.release("n1").await.unwrap();
        service.release("missing").await.unwrap();

        let number = fixture.number("n1").await;
        assert_eq!(number.availability, NumberAvailability::Available);
        assert!(number.reserved_by_tenant.is_none());
    }

    #[tokio::test]
    async fn reclaim_expired_clears_stale_reservations_only() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        fixture.seed_number(test_inventory_number("n2", "+15550002222")).await;
        let service = InventoryService::new(fixture.ctx.clone());

        service
            .reserve("n1", "tenant-1", Some(Duration::zero()))
            .await
            .unwrap();
        service.reserve("n2", "tenant-2", None).await.unwrap();

        let reclaimed = service.reclaim_expired(Utc::now()).await.unwrap();
        assert_eq!(reclaimed, 1);

        assert_eq!(
            fixture.number("n1").await.availability,
            NumberAvailability::Available
        );
        assert_eq!(
            fixture.number("n2").await.availability,
            NumberAvailability::Reserved
        );
    }

    #[tokio::test]
    async fn reserve_unknown_number_fails() {
        let fixture = TestContext::new();
        let service = InventoryService::new(fixture.ctx.clone());

        let err = service.reserve("ghost", "tenant-1", None).await.unwrap_err();
        assert!(matches!(err, CoreError::NumberNotFound(_)));
    }
}
