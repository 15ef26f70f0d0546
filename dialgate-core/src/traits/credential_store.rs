//! 凭证存储抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{CredentialMode, TelephonyCredential};

/// 凭证存储 Trait
///
/// 平台实现:
/// - 生产环境: 数据库 + 密文存储
/// - 自托管 / 测试: 环境变量（平台共享凭证）
///
/// 调用方每次请求都重新读取，不做跨请求缓存，密钥轮换立即生效。
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 租户的凭证模式（own / shared）
    ///
    /// 未登记的租户默认 `Shared`。
    async fn mode(&self, tenant_id: &str) -> CoreResult<CredentialMode>;

    /// 租户自有的有效默认凭证
    ///
    /// # Returns
    /// * `Ok(Some(credential))` - 存在有效凭证
    /// * `Ok(None)` - 租户未配置或凭证已停用
    async fn tenant_credential(&self, tenant_id: &str) -> CoreResult<Option<TelephonyCredential>>;

    /// 平台共享凭证
    async fn platform_credential(&self) -> CoreResult<Option<TelephonyCredential>>;
}
