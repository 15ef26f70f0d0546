//! 租约相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 租约状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// 购买流程进行中
    Pending,
    /// 生效中
    Active,
    /// 已预约到期取消（到期前号码仍可用）
    PendingCancellation,
    /// 已取消（终态）
    Cancelled,
    /// 已到期（终态）
    Expired,
}

impl RentalStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::PendingCancellation => "pending_cancellation",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// 是否为终态（不允许再发生任何转换）
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Expired)
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 租约审计条目（结构化，只追加）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalNote {
    /// 记录时间
    #[serde(with = "crate::utils::datetime")]
    pub timestamp: DateTime<Utc>,
    /// 操作者（tenant / system）
    pub actor: String,
    /// 动作名
    pub action: String,
    /// 详情
    pub detail: String,
}

impl RentalNote {
    #[must_use]
    pub fn new(actor: impl Into<String>, action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            actor: actor.into(),
            action: action.into(),
            detail: detail.into(),
        }
    }
}

/// 号码租约
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    /// 租约 ID (UUID)
    pub id: String,
    /// 租户 ID
    pub tenant_id: String,
    /// E.164 格式号码
    pub phone_number: String,
    /// 供应商侧号码 SID（释放时使用）
    pub provider_number_sid: String,
    /// 租约状态
    pub status: RentalStatus,
    /// 起租时间
    #[serde(with = "crate::utils::datetime")]
    pub rental_start: DateTime<Utc>,
    /// 到期时间
    #[serde(with = "crate::utils::datetime")]
    pub rental_end: DateTime<Utc>,
    /// 月租（美分）
    pub monthly_cost_cents: u32,
    /// 审计记录（只追加）
    #[serde(default)]
    pub notes: Vec<RentalNote>,
}

impl Rental {
    /// 追加一条审计记录
    pub fn push_note(
        &mut self,
        actor: impl Into<String>,
        action: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.notes.push(RentalNote::new(actor, action, detail));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(RentalStatus::Cancelled.is_terminal());
        assert!(RentalStatus::Expired.is_terminal());
        assert!(!RentalStatus::Active.is_terminal());
        assert!(!RentalStatus::PendingCancellation.is_terminal());
    }

    #[test]
    fn notes_are_appended_in_order() {
        let mut rental = Rental {
            id: "r1".into(),
            tenant_id: "t1".into(),
            phone_number: "+15550001111".into(),
            provider_number_sid: "PN123".into(),
            status: RentalStatus::Active,
            rental_start: Utc::now(),
            rental_end: Utc::now(),
            monthly_cost_cents: 115,
            notes: vec![],
        };
        rental.push_note("tenant", "purchase", "initial purchase");
        rental.push_note("system", "expire", "sweep");
        assert_eq!(rental.notes.len(), 2);
        assert_eq!(rental.notes[0].action, "purchase");
        assert_eq!(rental.notes[1].actor, "system");
    }
}
