//! 租约仓库抽象 Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::types::{Rental, RentalStatus};

use super::ApplyFn;

/// 租约仓库 Trait
///
/// 与库存仓库一样，状态转换必须通过 [`transition`](Self::transition)。
/// 清扫任务与手动取消/续期依赖这一源状态守卫相互让位，
/// 重复执行的清扫因此退化为空操作。
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// 按 ID 查找租约
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Rental>>;

    /// 列出租户的所有租约
    async fn find_by_tenant(&self, tenant_id: &str) -> CoreResult<Vec<Rental>>;

    /// 保存租约（仅用于购买落库）
    async fn save(&self, rental: &Rental) -> CoreResult<()>;

    /// 原子条件转换（CAS），语义同
    /// [`InventoryRepository::transition`](super::InventoryRepository::transition)
    async fn transition(
        &self,
        id: &str,
        expected: &[RentalStatus],
        apply: ApplyFn<Rental>,
    ) -> CoreResult<bool>;

    /// 到期清扫候选：Active 或 PendingCancellation 且 `rental_end <= now`
    async fn find_due(&self, now: DateTime<Utc>) -> CoreResult<Vec<Rental>>;
}
