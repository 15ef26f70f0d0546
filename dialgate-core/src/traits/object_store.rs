//! 对象存储抽象 Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// 限时签名 URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    /// 完整下载 URL
    pub url: String,
    /// 签名过期时间
    #[serde(with = "crate::utils::datetime")]
    pub expires_at: DateTime<Utc>,
}

/// 对象存储 Trait
///
/// 录音归档后通过这里换取限时签名下载 URL，永不对外暴露
/// 存储的原始路径。
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 为存储路径签发限时 URL
    async fn create_signed_url(&self, path: &str, ttl_secs: u64) -> CoreResult<SignedUrl>;
}
