//! 号码库存相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dialgate_provider::{AvailableNumber, NumberCapabilities, NumberType};

/// 库存号码可用性状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NumberAvailability {
    /// 可售
    Available,
    /// 已被某租户预订（带过期时间）
    Reserved,
    /// 已购买，归某个租约持有
    Purchased,
}

impl NumberAvailability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Purchased => "purchased",
        }
    }
}

impl std::fmt::Display for NumberAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 库存号码
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryNumber {
    /// 号码 ID (UUID)
    pub id: String,
    /// E.164 格式号码
    pub phone_number: String,
    /// 号码类型
    pub number_type: NumberType,
    /// ISO 国家码
    pub country_code: String,
    /// 号码能力
    pub capabilities: NumberCapabilities,
    /// 月租（美分）
    pub monthly_cost_cents: u32,
    /// 开通费（美分）
    pub setup_cost_cents: u32,
    /// 可用性状态
    pub availability: NumberAvailability,
    /// 预订过期时间（仅 Reserved 时有意义）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "crate::utils::datetime::option")]
    pub reserved_until: Option<DateTime<Utc>>,
    /// 预订租户（仅 Reserved 时有意义）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_by_tenant: Option<String>,
}

impl InventoryNumber {
    /// 读取时的惰性回收判定：过期的预订视同可售。
    ///
    /// 预订只在状态转换时落库，过期不额外写存储；
    /// 所有"是否可售"的判断都必须走这里而不是直接比对 `availability`。
    #[must_use]
    pub fn is_effectively_available(&self, now: DateTime<Utc>) -> bool {
        match self.availability {
            NumberAvailability::Available => true,
            NumberAvailability::Reserved => self.reserved_until.is_none_or(|until| until <= now),
            NumberAvailability::Purchased => false,
        }
    }

    /// 从供应商搜索结果建立本地库存记录
    #[must_use]
    pub fn from_search_result(found: &AvailableNumber) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            phone_number: found.phone_number.clone(),
            number_type: found.number_type,
            country_code: found.country_code.clone(),
            capabilities: found.capabilities,
            monthly_cost_cents: found.monthly_cost_cents,
            setup_cost_cents: found.setup_cost_cents,
            availability: NumberAvailability::Available,
            reserved_until: None,
            reserved_by_tenant: None,
        }
    }
}
