//! Provider 工厂抽象 Trait

use std::sync::Arc;

use dialgate_provider::{NumberPricing, ProviderCredentials, TelephonyProvider, create_provider};

use crate::error::CoreResult;

/// Provider 工厂 Trait
///
/// 每次调用都构建全新的 provider 实例：凭证轮换后的下一个请求
/// 立即用上新密钥，代价只是一次廉价的结构体构造。
/// 测试通过注入假工厂替换真实供应商。
pub trait ProviderFactory: Send + Sync {
    /// 按凭证构建 provider 客户端
    fn create(&self, credentials: &ProviderCredentials) -> CoreResult<Arc<dyn TelephonyProvider>>;
}

/// 默认工厂：按凭证变体构建真实 provider
pub struct DefaultProviderFactory {
    pricing: NumberPricing,
}

impl DefaultProviderFactory {
    /// 以给定价目表创建工厂
    #[must_use]
    pub fn new(pricing: NumberPricing) -> Self {
        Self { pricing }
    }
}

impl Default for DefaultProviderFactory {
    fn default() -> Self {
        Self::new(NumberPricing::default())
    }
}

impl ProviderFactory for DefaultProviderFactory {
    fn create(&self, credentials: &ProviderCredentials) -> CoreResult<Arc<dyn TelephonyProvider>> {
        Ok(create_provider(credentials.clone(), self.pricing)?)
    }
}
