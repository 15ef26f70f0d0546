//! 租约生命周期服务
//!
//! 购买、续期、取消与到期清扫。供应商购买/释放绝不重试；
//! 一旦供应商扣款成功，后续任何本地失败都只能记录对账错误，
//! 绝不丢弃已付费的号码。

use std::sync::Arc;

use chrono::{DateTime, Duration, Months, Utc};

use dialgate_provider::PurchaseNumberRequest;

use crate::error::{CoreError, CoreResult, ProviderError};
use crate::types::{NumberAvailability, Rental, RentalNote, RentalStatus, SelectionStatus};

use super::{CredentialService, ServiceContext};

/// 审计记录操作者
const ACTOR_TENANT: &str = "tenant";
const ACTOR_SYSTEM: &str = "system";

/// 到期清扫结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// 本轮认领并处理的租约数
    pub processed: u64,
    /// 自然到期的租约数
    pub expired: u64,
    /// 预约取消最终生效的租约数
    pub cancelled: u64,
    /// 供应商释放失败（需人工清理）的数量
    pub release_failures: u64,
}

/// 租约生命周期服务
pub struct RentalService {
    ctx: Arc<ServiceContext>,
    credentials: CredentialService,
}

impl RentalService {
    /// 创建租约生命周期服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            credentials: CredentialService::new(ctx.clone()),
            ctx,
        }
    }

    /// 按 ID 查找租约
    pub async fn get(&self, rental_id: &str) -> CoreResult<Rental> {
        self.ctx
            .rental_repository
            .find_by_id(rental_id)
            .await?
            .ok_or_else(|| CoreError::RentalNotFound(rental_id.to_string()))
    }

    /// 列出租户的所有租约
    pub async fn list_for_tenant(&self, tenant_id: &str) -> CoreResult<Vec<Rental>> {
        self.ctx.rental_repository.find_by_tenant(tenant_id).await
    }

    /// 支付确认后执行购买
    ///
    /// 步骤顺序经过刻意安排：
    /// 1. 校验选号状态与号码归属（失败则中止，无任何状态变更）
    /// 2. 供应商购买（失败则中止，无任何状态变更，绝不重试）
    /// 3. 库存标记 Purchased —— 先于租约落库，保证 Active 租约
    ///    对应的库存号码必然处于 Purchased
    /// 4. 租约落库（失败时供应商已扣款，记对账错误后返回错误）
    /// 5. 选号标记 Purchased（失败仅告警）
    pub async fn purchase(&self, selection_id: &str) -> CoreResult<Rental> {
        let selection = self
            .ctx
            .selection_repository
            .find_by_id(selection_id)
            .await?
            .ok_or_else(|| CoreError::SelectionNotFound(selection_id.to_string()))?;

        match selection.status {
            SelectionStatus::Selected | SelectionStatus::PendingPayment => {}
            other => {
                return Err(CoreError::InvalidTransition {
                    from: other.as_str().to_string(),
                    action: "purchase".to_string(),
                });
            }
        }

        let number = self
            .ctx
            .inventory_repository
            .find_by_phone_number(&selection.phone_number)
            .await?
            .ok_or_else(|| CoreError::NumberNotFound(selection.phone_number.clone()))?;

        // 预订可能已经过期：只要号码还没被别人拿走就继续
        let now = Utc::now();
        let held = match number.availability {
            NumberAvailability::Available => true,
            NumberAvailability::Reserved => {
                number.reserved_by_tenant.as_deref() == Some(selection.tenant_id.as_str())
                    || number.is_effectively_available(now)
            }
            NumberAvailability::Purchased => false,
        };
        if !held {
            return Err(CoreError::AlreadyReserved(number.phone_number));
        }

        let (provider, resolved) = self.credentials.provider_for(&selection.tenant_id).await?;
        let request = PurchaseNumberRequest {
            phone_number: selection.phone_number.clone(),
            voice_application_sid: resolved.credential().voice_application_sid.clone(),
            friendly_name: Some(format!("tenant:{}", selection.tenant_id)),
        };
        // 供应商购买：失败即中止，无状态变更
        let purchased = provider.purchase_number(&request).await?;
        log::info!(
            "Purchased {} at {} (sid {})",
            purchased.phone_number,
            provider.id(),
            purchased.number_sid
        );

        let marked = self
            .ctx
            .inventory_repository
            .transition(
                &number.id,
                &[NumberAvailability::Reserved, NumberAvailability::Available],
                Box::new(|n| {
                    n.availability = NumberAvailability::Purchased;
                    n.reserved_until = None;
                    n.reserved_by_tenant = None;
                    true
                }),
            )
            .await;
        match marked {
            Ok(true) => {}
            Ok(false) => {
                // 已向供应商付费，强制覆盖库存状态
                log::error!(
                    "Number {} purchased at provider but inventory CAS failed, forcing purchased state",
                    number.phone_number
                );
                let mut fixed = number.clone();
                fixed.availability = NumberAvailability::Purchased;
                fixed.reserved_until = None;
                fixed.reserved_by_tenant = None;
                if let Err(e) = self.ctx.inventory_repository.save(&fixed).await {
                    log::error!(
                        "Could not mark {} purchased, manual reconciliation required: {e}",
                        number.phone_number
                    );
                }
            }
            Err(e) => {
                log::error!(
                    "Number {} purchased at provider but inventory update failed, manual reconciliation required: {e}",
                    number.phone_number
                );
            }
        }

        let mut rental = Rental {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: selection.tenant_id.clone(),
            phone_number: purchased.phone_number.clone(),
            provider_number_sid: purchased.number_sid.clone(),
            status: RentalStatus::Active,
            rental_start: now,
            rental_end: add_months(now, 1),
            monthly_cost_cents: selection.pricing.monthly_cost_cents,
            notes: Vec::new(),
        };
        rental.push_note(
            ACTOR_TENANT,
            "purchase",
            format!("purchased via {} for selection {selection_id}", provider.id()),
        );

        if let Err(e) = self.ctx.rental_repository.save(&rental).await {
            // 号码已付费但租约没落下去：绝不能丢号
            log::error!(
                "Provider purchase of {} succeeded (sid {}) but rental persistence failed, manual reconciliation required: {e}",
                purchased.phone_number,
                purchased.number_sid
            );
            return Err(e);
        }

        if let Err(e) = self
            .ctx
            .selection_repository
            .update_status(selection_id, SelectionStatus::Purchased)
            .await
        {
            log::warn!("Failed to mark selection {selection_id} purchased: {e}");
        }

        log::info!(
            "Rental {} activated for {} (tenant {}), ends {}",
            rental.id,
            rental.phone_number,
            rental.tenant_id,
            rental.rental_end.to_rfc3339()
        );
        Ok(rental)
    }

    /// 续期租约
    ///
    /// 仅 Active 可续；长度限 1-12 个月；新到期时间从
    /// max(当前到期时间, now) 起算，不调用供应商。
    pub async fn extend(&self, rental_id: &str, months: u32) -> CoreResult<Rental> {
        if !(1..=12).contains(&months) {
            return Err(CoreError::InvalidExtension(months));
        }

        let rental = self.get(rental_id).await?;
        if rental.status != RentalStatus::Active {
            return Err(CoreError::InvalidTransition {
                from: rental.status.as_str().to_string(),
                action: "extend".to_string(),
            });
        }

        let now = Utc::now();
        let changed = self
            .ctx
            .rental_repository
            .transition(
                rental_id,
                &[RentalStatus::Active],
                Box::new(move |r| {
                    let base = if r.rental_end > now { r.rental_end } else { now };
                    r.rental_end = add_months(base, months);
                    r.notes.push(RentalNote::new(
                        ACTOR_TENANT,
                        "extend",
                        format!("extended by {months} month(s)"),
                    ));
                    true
                }),
            )
            .await?;

        if !changed {
            // 与取消/清扫并发时让位，按当前状态报告
            return Err(self.transition_conflict(rental_id, "extend").await);
        }

        let updated = self.get(rental_id).await?;
        log::info!(
            "Rental {rental_id} extended by {months} month(s), new end {}",
            updated.rental_end.to_rfc3339()
        );
        Ok(updated)
    }

    /// 取消租约
    ///
    /// 仅 Active 可取消。`immediate` 为真时立即终止：先 CAS 认领终态，
    /// 再尽力而为地释放供应商号码（失败只记录，绝不阻塞），最后把库存
    /// 放回可售。否则转入 PendingCancellation，到期时由清扫收尾。
    pub async fn cancel(
        &self,
        rental_id: &str,
        immediate: bool,
        reason: Option<String>,
    ) -> CoreResult<Rental> {
        let rental = self.get(rental_id).await?;
        if rental.status != RentalStatus::Active {
            return Err(CoreError::InvalidTransition {
                from: rental.status.as_str().to_string(),
                action: "cancel".to_string(),
            });
        }

        let now = Utc::now();
        let changed = if immediate {
            let detail = reason.unwrap_or_else(|| "cancelled immediately".to_string());
            self.ctx
                .rental_repository
                .transition(
                    rental_id,
                    &[RentalStatus::Active],
                    Box::new(move |r| {
                        r.status = RentalStatus::Cancelled;
                        r.rental_end = now;
                        r.notes.push(RentalNote::new(ACTOR_TENANT, "cancel", detail));
                        true
                    }),
                )
                .await?
        } else {
            let detail =
                reason.unwrap_or_else(|| "cancellation scheduled at period end".to_string());
            self.ctx
                .rental_repository
                .transition(
                    rental_id,
                    &[RentalStatus::Active],
                    Box::new(move |r| {
                        r.status = RentalStatus::PendingCancellation;
                        r.notes
                            .push(RentalNote::new(ACTOR_TENANT, "cancel_deferred", detail));
                        true
                    }),
                )
                .await?
        };

        if !changed {
            return Err(self.transition_conflict(rental_id, "cancel").await);
        }

        if immediate {
            // 供应商释放失败不回滚取消，也不挡住库存归位
            self.release_at_provider(&rental).await;
            self.return_number_to_inventory(&rental.phone_number).await;
            log::info!("Rental {rental_id} cancelled immediately");
        } else {
            log::info!(
                "Rental {rental_id} scheduled for cancellation at period end {}",
                rental.rental_end.to_rfc3339()
            );
        }

        self.get(rental_id).await
    }

    /// 到期清扫
    ///
    /// 处理所有 `rental_end <= now` 的 Active / PendingCancellation 租约：
    /// CAS 认领终态（Active -> Expired，PendingCancellation -> Cancelled），
    /// 认领成功后释放供应商号码并把库存放回可售。认领失败说明别的
    /// 执行者已处理，直接跳过 —— 重复清扫因此是空操作。
    pub async fn run_expiry_sweep(&self, now: DateTime<Utc>) -> CoreResult<SweepReport> {
        let due = self.ctx.rental_repository.find_due(now).await?;
        let mut report = SweepReport::default();

        for rental in due {
            let was_pending = rental.status == RentalStatus::PendingCancellation;
            let claimed = self
                .ctx
                .rental_repository
                .transition(
                    &rental.id,
                    &[RentalStatus::Active, RentalStatus::PendingCancellation],
                    Box::new(move |r| {
                        if r.rental_end > now {
                            return false;
                        }
                        let (status, action) = if r.status == RentalStatus::PendingCancellation {
                            (RentalStatus::Cancelled, "cancel_finalized")
                        } else {
                            (RentalStatus::Expired, "expire")
                        };
                        r.status = status;
                        r.notes.push(RentalNote::new(
                            ACTOR_SYSTEM,
                            action,
                            format!("expiry sweep at {}", now.to_rfc3339()),
                        ));
                        true
                    }),
                )
                .await?;

            if !claimed {
                continue;
            }
            report.processed += 1;
            if was_pending {
                report.cancelled += 1;
            } else {
                report.expired += 1;
            }

            if !self.release_at_provider(&rental).await {
                report.release_failures += 1;
            }
            self.return_number_to_inventory(&rental.phone_number).await;
        }

        if report.processed > 0 {
            log::info!(
                "Expiry sweep: {} rentals processed ({} expired, {} cancelled, {} release failures)",
                report.processed,
                report.expired,
                report.cancelled,
                report.release_failures
            );
        }
        Ok(report)
    }

    /// CAS 失败后按当前状态构造冲突错误
    async fn transition_conflict(&self, rental_id: &str, action: &str) -> CoreError {
        let from = match self.ctx.rental_repository.find_by_id(rental_id).await {
            Ok(Some(r)) => r.status.as_str().to_string(),
            _ => "unknown".to_string(),
        };
        CoreError::InvalidTransition {
            from,
            action: action.to_string(),
        }
    }

    /// 在供应商处释放号码（尽力而为）
    ///
    /// 重复释放产生的 `NumberNotFound` 视为成功。返回是否确认释放。
    async fn release_at_provider(&self, rental: &Rental) -> bool {
        let (provider, _) = match self.credentials.provider_for(&rental.tenant_id).await {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!(
                    "Could not resolve credentials to release {}: {e}",
                    rental.phone_number
                );
                return false;
            }
        };
        match provider.release_number(&rental.provider_number_sid).await {
            Ok(()) => {
                log::info!("Released {} at provider {}", rental.phone_number, provider.id());
                true
            }
            Err(ProviderError::NumberNotFound { .. }) => {
                log::info!("Number {} already released at provider", rental.phone_number);
                true
            }
            Err(e) => {
                log::warn!(
                    "Failed to release {} at provider, manual cleanup needed: {e}",
                    rental.phone_number
                );
                false
            }
        }
    }

    /// 租约终止后把号码放回本地号池
    async fn return_number_to_inventory(&self, phone_number: &str) {
        let number = match self
            .ctx
            .inventory_repository
            .find_by_phone_number(phone_number)
            .await
        {
            Ok(Some(n)) => n,
            Ok(None) => {
                log::warn!("Number {phone_number} missing from inventory, nothing to return");
                return;
            }
            Err(e) => {
                log::error!("Failed to look up {phone_number} in inventory: {e}");
                return;
            }
        };

        let result = self
            .ctx
            .inventory_repository
            .transition(
                &number.id,
                &[NumberAvailability::Purchased],
                Box::new(|n| {
                    n.availability = NumberAvailability::Available;
                    n.reserved_until = None;
                    n.reserved_by_tenant = None;
                    true
                }),
            )
            .await;
        match result {
            Ok(true) => log::info!("Number {phone_number} returned to inventory"),
            Ok(false) => {
                log::warn!("Number {phone_number} was not in purchased state, skipping return");
            }
            Err(e) => log::error!("Failed to return {phone_number} to inventory: {e}"),
        }
    }
}

/// 按整月推进时间，极端越界时退化为 30 天/月
fn add_months(at: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    at.checked_add_months(Months::new(months))
        .unwrap_or_else(|| at + Duration::days(30 * i64::from(months)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InventoryService;
    use crate::test_utils::{TestContext, test_inventory_number};
    use crate::types::NumberSelection;

    /// 预订一个号码，返回选号
    async fn reserve(fixture: &TestContext, number_id: &str, tenant: &str) -> NumberSelection {
        InventoryService::new(fixture.ctx.clone())
            .reserve(number_id, tenant, None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn purchase_activates_rental_and_marks_inventory() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        assert_eq!(rental.status, RentalStatus::Active);
        assert_eq!(rental.phone_number, "+15550001111");
        assert_eq!(rental.monthly_cost_cents, 115);
        assert!(rental.rental_end > rental.rental_start);
        assert_eq!(rental.notes[0].action, "purchase");

        // Active rental implies purchased inventory.
        let number = fixture.number("n1").await;
        assert_eq!(number.availability, NumberAvailability::Purchased);
        assert!(number.reserved_by_tenant.is_none());

        // Selection was consumed.
        let selection = fixture.selection(&selection.id).await;
        assert_eq!(selection.status, SelectionStatus::Purchased);

        // Provider saw exactly one purchase.
        assert_eq!(fixture.provider.purchased().await, vec!["+15550001111"]);
    }

    #[tokio::test]
    async fn provider_failure_aborts_purchase_without_state_change() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        fixture.provider.fail_purchase(true).await;
        let service = RentalService::new(fixture.ctx.clone());

        let err = service.purchase(&selection.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));

        // Reservation still in place, no rental created.
        let number = fixture.number("n1").await;
        assert_eq!(number.availability, NumberAvailability::Reserved);
        let rentals = service.list_for_tenant("tenant-1").await.unwrap();
        assert!(rentals.is_empty());
    }

    #[tokio::test]
    async fn rental_persistence_failure_is_a_reconciliation_error() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        fixture.rentals.set_save_error(Some("disk full".into())).await;
        let service = RentalService::new(fixture.ctx.clone());

        let err = service.purchase(&selection.id).await.unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));

        // The number was paid for: inventory stays purchased for reconciliation.
        let number = fixture.number("n1").await;
        assert_eq!(number.availability, NumberAvailability::Purchased);
        assert_eq!(fixture.provider.purchased().await.len(), 1);
    }

    #[tokio::test]
    async fn purchase_rejects_consumed_selection() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        service.purchase(&selection.id).await.unwrap();
        let err = service.purchase(&selection.id).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        // Only one provider purchase despite the retry.
        assert_eq!(fixture.provider.purchased().await.len(), 1);
    }

    #[tokio::test]
    async fn extend_pushes_end_date_and_records_note() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        let original_end = rental.rental_end;

        let extended = service.extend(&rental.id, 3).await.unwrap();
        assert!(extended.rental_end > original_end);
        assert!(extended.notes.iter().any(|n| n.action == "extend"));
        // No provider interaction on extend.
        assert_eq!(fixture.provider.released().await.len(), 0);
    }

    #[tokio::test]
    async fn extend_validates_month_range() {
        let fixture = TestContext::new();
        let service = RentalService::new(fixture.ctx.clone());

        assert!(matches!(
            service.extend("r1", 0).await.unwrap_err(),
            CoreError::InvalidExtension(0)
        ));
        assert!(matches!(
            service.extend("r1", 13).await.unwrap_err(),
            CoreError::InvalidExtension(13)
        ));
    }

    #[tokio::test]
    async fn extend_rejected_on_terminal_state_without_changes() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        service.cancel(&rental.id, true, None).await.unwrap();
        let before = service.get(&rental.id).await.unwrap();

        let err = service.extend(&rental.id, 1).await.unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidTransition { ref from, .. } if from == "cancelled")
        );

        let after = service.get(&rental.id).await.unwrap();
        assert_eq!(after.rental_end, before.rental_end);
        assert_eq!(after.notes.len(), before.notes.len());
    }

    #[tokio::test]
    async fn immediate_cancel_releases_and_frees_inventory() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        let cancelled = service
            .cancel(&rental.id, true, Some("customer left".into()))
            .await
            .unwrap();

        assert_eq!(cancelled.status, RentalStatus::Cancelled);
        assert!(cancelled.rental_end <= Utc::now());
        assert_eq!(fixture.provider.released().await.len(), 1);
        assert_eq!(
            fixture.number("n1").await.availability,
            NumberAvailability::Available
        );
    }

    #[tokio::test]
    async fn immediate_cancel_frees_inventory_even_when_release_fails() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        fixture.provider.fail_release(true).await;

        let cancelled = service.cancel(&rental.id, true, None).await.unwrap();
        assert_eq!(cancelled.status, RentalStatus::Cancelled);
        // Provider release failed but the local pool still gets the number back.
        assert_eq!(
            fixture.number("n1").await.availability,
            NumberAvailability::Available
        );
    }

    #[tokio::test]
    async fn deferred_cancel_keeps_number_until_period_end() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        let original_end = rental.rental_end;

        let pending = service.cancel(&rental.id, false, None).await.unwrap();
        assert_eq!(pending.status, RentalStatus::PendingCancellation);
        assert_eq!(pending.rental_end, original_end);
        // Nothing released yet, inventory untouched.
        assert_eq!(fixture.provider.released().await.len(), 0);
        assert_eq!(
            fixture.number("n1").await.availability,
            NumberAvailability::Purchased
        );
    }

    #[tokio::test]
    async fn cancel_rejected_when_not_active() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        service.cancel(&rental.id, false, None).await.unwrap();

        let err = service.cancel(&rental.id, true, None).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn sweep_expires_overdue_rentals_and_frees_numbers() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();

        // Not due yet: sweep is a no-op.
        let report = service.run_expiry_sweep(Utc::now()).await.unwrap();
        assert_eq!(report, SweepReport::default());

        // Past the rental end: the rental expires and the number is freed.
        let later = rental.rental_end + Duration::seconds(1);
        let report = service.run_expiry_sweep(later).await.unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.expired, 1);
        assert_eq!(report.cancelled, 0);
        assert_eq!(report.release_failures, 0);

        let swept = service.get(&rental.id).await.unwrap();
        assert_eq!(swept.status, RentalStatus::Expired);
        assert!(swept.notes.iter().any(|n| n.actor == "system"));
        assert_eq!(
            fixture.number("n1").await.availability,
            NumberAvailability::Available
        );

        // Duplicate sweep: already claimed, nothing happens.
        let report = service.run_expiry_sweep(later).await.unwrap();
        assert_eq!(report, SweepReport::default());
        assert_eq!(fixture.provider.released().await.len(), 1);
    }

    #[tokio::test]
    async fn sweep_finalizes_deferred_cancellation() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        service.cancel(&rental.id, false, None).await.unwrap();

        let later = rental.rental_end + Duration::seconds(1);
        let report = service.run_expiry_sweep(later).await.unwrap();
        assert_eq!(report.cancelled, 1);
        assert_eq!(report.expired, 0);

        let finalized = service.get(&rental.id).await.unwrap();
        assert_eq!(finalized.status, RentalStatus::Cancelled);
    }

    #[tokio::test]
    async fn sweep_counts_release_failures_but_still_frees_inventory() {
        let fixture = TestContext::new();
        fixture.seed_number(test_inventory_number("n1", "+15550001111")).await;
        let selection = reserve(&fixture, "n1", "tenant-1").await;
        let service = RentalService::new(fixture.ctx.clone());

        let rental = service.purchase(&selection.id).await.unwrap();
        fixture.provider.fail_release(true).await;

        let later = rental.rental_end + Duration::seconds(1);
        let report = service.run_expiry_sweep(later).await.unwrap();
        assert_eq!(report.release_failures, 1);
        assert_eq!(
            fixture.number("n1").await.availability,
            NumberAvailability::Available
        );
    }

    #[test]
    fn add_months_advances_by_calendar_months() {
        let at = DateTime::parse_from_rfc3339("2026-01-31T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let next = add_months(at, 1);
        // Chrono clamps to the end of February.
        assert_eq!(next.to_rfc3339(), "2026-02-28T12:00:00+00:00");
    }
}
