//! 客户端目录抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// 客户端目录 Trait
///
/// 将被叫的 E.164 号码解析为持有该号码的客户端应用身份，
/// 来电据此转接。查不到归属时返回 `None`，由路由层使用
/// 配置的兜底身份。
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// 被叫号码 -> 归属客户端身份
    async fn owner_of(&self, phone_number: &str) -> CoreResult<Option<String>>;
}
