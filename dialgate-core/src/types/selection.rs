//! 选号相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dialgate_provider::NumberType;

/// 选号状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// 已选定，等待进入支付
    Selected,
    /// 支付进行中
    PendingPayment,
    /// 支付完成，已转为租约
    Purchased,
    /// 预订超时作废
    Expired,
}

impl SelectionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::PendingPayment => "pending_payment",
            Self::Purchased => "purchased",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SelectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 价格快照（美分）
///
/// 预订时从库存号码上抄下来，支付金额以快照为准，
/// 后续价目表调整不影响已创建的选号。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    /// 月租（美分）
    pub monthly_cost_cents: u32,
    /// 开通费（美分）
    pub setup_cost_cents: u32,
}

/// 选号记录
///
/// 预订和支付之间的短生命周期对象，由支付确认消费，或超时作废。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSelection {
    /// 选号 ID (UUID)
    pub id: String,
    /// 租户 ID
    pub tenant_id: String,
    /// 对应的库存号码 ID
    pub number_id: String,
    /// E.164 格式号码
    pub phone_number: String,
    /// 号码类型
    pub number_type: NumberType,
    /// 价格快照
    pub pricing: PricingSnapshot,
    /// 选号状态
    pub status: SelectionStatus,
    /// 预订过期时间
    #[serde(with = "crate::utils::datetime")]
    pub reserved_until: DateTime<Utc>,
    /// 创建时间
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}
