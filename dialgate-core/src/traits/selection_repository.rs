//! 选号仓库抽象 Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::types::{NumberSelection, SelectionStatus};

/// 选号仓库 Trait
#[async_trait]
pub trait SelectionRepository: Send + Sync {
    /// 按 ID 查找选号
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<NumberSelection>>;

    /// 保存选号
    async fn save(&self, selection: &NumberSelection) -> CoreResult<()>;

    /// 更新选号状态
    async fn update_status(&self, id: &str, status: SelectionStatus) -> CoreResult<()>;

    /// 将所有已过期的未完成选号标记为 Expired，返回数量
    ///
    /// 终态（Purchased / Expired）的选号不受影响。
    async fn expire_stale(&self, now: DateTime<Utc>) -> CoreResult<u64>;
}
