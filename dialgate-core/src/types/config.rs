//! 服务配置类型定义
//!
//! 各项配置均为普通结构体并带 `Default`，由平台层在构建
//! `ServiceContext` 时注入。

/// 呼叫路由配置
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// 客户端身份前缀（以此前缀开头的主叫视为平台内的客户端应用）
    pub client_identity_prefix: String,
    /// 目录查不到归属时使用的兜底客户端身份
    pub fallback_client_identity: String,
    /// Dial 振铃超时（秒）
    pub dial_timeout_secs: u32,
    /// 外呼前播报的录音告知语
    pub disclosure_text: String,
    /// 路由失败时的致歉语
    pub apology_text: String,
    /// 被叫号码非法时的提示语
    pub invalid_destination_text: String,
    /// 录音状态回调路径（拼在请求方提供的基址之后）
    pub recording_callback_path: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            client_identity_prefix: "user_".to_string(),
            fallback_client_identity: "user_default".to_string(),
            dial_timeout_secs: 30,
            disclosure_text: "This call may be recorded for quality and training purposes."
                .to_string(),
            apology_text:
                "We are unable to connect your call at this time. Please try again later."
                    .to_string(),
            invalid_destination_text: "The number you are trying to reach is invalid. Please check the number and try again."
                .to_string(),
            recording_callback_path: "/webhooks/recording".to_string(),
        }
    }
}

/// 录音服务配置
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// 签名 URL 有效期（秒）
    pub signed_url_ttl_secs: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            signed_url_ttl_secs: 3600,
        }
    }
}

/// 库存服务配置
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// 预订默认有效期（秒）
    pub reservation_ttl_secs: i64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            reservation_ttl_secs: 30 * 60,
        }
    }
}
