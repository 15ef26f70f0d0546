//! 呼叫事件类型定义

use dialgate_provider::{CallDirection, VoiceWebhook};

/// 呼叫事件
///
/// 从呼叫状态 webhook 解析出的短暂对象，只用于路由决策，从不落库。
#[derive(Debug, Clone)]
pub struct CallEvent {
    /// 呼叫 SID
    pub call_sid: String,
    /// 呼叫方向
    pub direction: CallDirection,
    /// 主叫（E.164 或 client:identity）
    pub from: String,
    /// 被叫（多个历史字段名归一后的结果）
    pub to: Option<String>,
    /// 呼叫状态（原样保留）
    pub status: String,
}

impl CallEvent {
    /// 从 webhook 表单构建呼叫事件
    #[must_use]
    pub fn from_webhook(hook: &VoiceWebhook) -> Self {
        Self {
            call_sid: hook.call_sid.clone(),
            direction: hook.parsed_direction(),
            from: hook.from.clone(),
            to: hook.destination().map(str::to_string),
            status: hook.call_status.clone(),
        }
    }
}
