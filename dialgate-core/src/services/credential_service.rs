//! 凭证解析服务
//!
//! 按租户解析出呼叫所用的供应商凭证：租户自有（OWN）或平台共享（SHARED）。
//! 每次调用都重新读取存储并新建 provider 实例，凭证轮换立即生效，
//! 不在任何地方跨请求缓存密钥。

use std::sync::Arc;

use dialgate_provider::TelephonyProvider;

use crate::error::{CoreError, CoreResult};
use crate::types::{CredentialMode, TelephonyCredential};

use super::ServiceContext;

/// 解析结果：凭证及其来源
#[derive(Debug, Clone)]
pub enum ResolvedCredentials {
    /// 租户自有凭证
    Owned(TelephonyCredential),
    /// 平台共享凭证
    Shared(TelephonyCredential),
}

impl ResolvedCredentials {
    /// 取出凭证本体（不关心来源时使用）
    #[must_use]
    pub fn credential(&self) -> &TelephonyCredential {
        match self {
            Self::Owned(c) | Self::Shared(c) => c,
        }
    }

    /// 是否为租户自有凭证
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

/// 凭证解析服务
pub struct CredentialService {
    ctx: Arc<ServiceContext>,
}

impl CredentialService {
    /// 创建凭证解析服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 解析租户应使用的凭证
    ///
    /// - OWN 模式下没有有效凭证 -> [`CoreError::NoCredentialConfigured`]，
    ///   不会静默回落到平台凭证（避免把租户呼叫记到平台账上）
    /// - SHARED 模式下平台凭证缺失 -> [`CoreError::PlatformMisconfigured`]
    pub async fn resolve(&self, tenant_id: &str) -> CoreResult<ResolvedCredentials> {
        match self.ctx.credential_store.mode(tenant_id).await? {
            CredentialMode::Own => {
                let credential = self
                    .ctx
                    .credential_store
                    .tenant_credential(tenant_id)
                    .await?
                    .ok_or_else(|| CoreError::NoCredentialConfigured(tenant_id.to_string()))?;
                log::debug!("Resolved own credentials for tenant {tenant_id}");
                Ok(ResolvedCredentials::Owned(credential))
            }
            CredentialMode::Shared => {
                let credential =
                    self.ctx
                        .credential_store
                        .platform_credential()
                        .await?
                        .ok_or_else(|| {
                            CoreError::PlatformMisconfigured(
                                "platform telephony credential is not configured".to_string(),
                            )
                        })?;
                log::debug!("Resolved shared platform credentials for tenant {tenant_id}");
                Ok(ResolvedCredentials::Shared(credential))
            }
        }
    }

    /// 解析凭证并构建 provider 客户端
    ///
    /// 每次调用都新建实例，绝不跨请求复用。
    pub async fn provider_for(
        &self,
        tenant_id: &str,
    ) -> CoreResult<(Arc<dyn TelephonyProvider>, ResolvedCredentials)> {
        let resolved = self.resolve(tenant_id).await?;
        let provider = self
            .ctx
            .provider_factory
            .create(&resolved.credential().credentials)?;
        Ok((provider, resolved))
    }
}
