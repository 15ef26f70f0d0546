//! 租户凭证相关类型定义

use serde::{Deserialize, Serialize};

use dialgate_provider::ProviderCredentials;

/// 租户凭证模式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// 租户使用自己的供应商账号
    Own,
    /// 租户共用平台账号
    Shared,
}

/// 一套可用的电话凭证及其关联配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelephonyCredential {
    /// 供应商凭证（结构化类型）
    pub credentials: ProviderCredentials,
    /// 默认外呼主叫号码
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_caller_number: Option<String>,
    /// 呼叫控制应用 SID（购买号码时绑定语音回调）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_application_sid: Option<String>,
}
