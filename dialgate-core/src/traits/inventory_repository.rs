//! 号码库存仓库抽象 Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::types::{InventoryNumber, NumberAvailability};

use super::ApplyFn;

/// 号码库存仓库 Trait
///
/// 所有改变可用性状态的写入都必须通过 [`transition`](Self::transition)
/// 这一条件更新原语，并发预订的输家由此落败而不是覆盖赢家。
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// 按 ID 查找号码
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<InventoryNumber>>;

    /// 按 E.164 号码查找
    async fn find_by_phone_number(&self, phone_number: &str)
    -> CoreResult<Option<InventoryNumber>>;

    /// 列出当前可售号码（含过期预订的惰性回收判定）
    async fn list_available(&self, now: DateTime<Utc>) -> CoreResult<Vec<InventoryNumber>>;

    /// 无条件保存（仅用于初始入库和对账修复）
    async fn save(&self, number: &InventoryNumber) -> CoreResult<()>;

    /// 原子条件转换（CAS）
    ///
    /// 实现必须在同一个临界区内完成检查与写入：
    /// 1. 当前 `availability` 必须属于 `expected`，否则返回 `Ok(false)`；
    /// 2. 在记录副本上执行 `apply`，返回 `false` 表示放弃，不产生写入；
    /// 3. 两者都通过才持久化并返回 `Ok(true)`。
    ///
    /// 号码不存在时返回 `Ok(false)`。
    async fn transition(
        &self,
        id: &str,
        expected: &[NumberAvailability],
        apply: ApplyFn<InventoryNumber>,
    ) -> CoreResult<bool>;
}
