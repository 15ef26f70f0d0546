//! 业务逻辑服务层

mod credential_service;
mod inventory_service;
mod recording_service;
mod rental_service;
mod routing_service;

pub use credential_service::{CredentialService, ResolvedCredentials};
pub use inventory_service::InventoryService;
pub use recording_service::RecordingService;
pub use rental_service::{RentalService, SweepReport};
pub use routing_service::{RouteContext, RoutingService};

use std::sync::Arc;

use crate::traits::{
    ClientDirectory, CredentialStore, InventoryRepository, ObjectStore, ProviderFactory,
    RecordingRepository, RentalRepository, SelectionRepository,
};
use crate::types::{InventoryConfig, RecordingConfig, RoutingConfig};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// 凭证存储
    pub credential_store: Arc<dyn CredentialStore>,
    /// 号码库存仓库
    pub inventory_repository: Arc<dyn InventoryRepository>,
    /// 选号仓库
    pub selection_repository: Arc<dyn SelectionRepository>,
    /// 租约仓库
    pub rental_repository: Arc<dyn RentalRepository>,
    /// 录音仓库
    pub recording_repository: Arc<dyn RecordingRepository>,
    /// 客户端目录
    pub client_directory: Arc<dyn ClientDirectory>,
    /// 对象存储（录音归档）
    pub object_store: Arc<dyn ObjectStore>,
    /// Provider 工厂
    pub provider_factory: Arc<dyn ProviderFactory>,
    /// 路由配置
    pub routing_config: RoutingConfig,
    /// 录音配置
    pub recording_config: RecordingConfig,
    /// 库存配置
    pub inventory_config: InventoryConfig,
}

impl ServiceContext {
    /// 创建服务上下文（配置取默认值）
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        inventory_repository: Arc<dyn InventoryRepository>,
        selection_repository: Arc<dyn SelectionRepository>,
        rental_repository: Arc<dyn RentalRepository>,
        recording_repository: Arc<dyn RecordingRepository>,
        client_directory: Arc<dyn ClientDirectory>,
        object_store: Arc<dyn ObjectStore>,
        provider_factory: Arc<dyn ProviderFactory>,
    ) -> Self {
        Self {
            credential_store,
            inventory_repository,
            selection_repository,
            rental_repository,
            recording_repository,
            client_directory,
            object_store,
            provider_factory,
            routing_config: RoutingConfig::default(),
            recording_config: RecordingConfig::default(),
            inventory_config: InventoryConfig::default(),
        }
    }

    /// 覆盖路由配置
    #[must_use]
    pub fn with_routing_config(mut self, config: RoutingConfig) -> Self {
        self.routing_config = config;
        self
    }

    /// 覆盖录音配置
    #[must_use]
    pub fn with_recording_config(mut self, config: RecordingConfig) -> Self {
        self.recording_config = config;
        self
    }

    /// 覆盖库存配置
    #[must_use]
    pub fn with_inventory_config(mut self, config: InventoryConfig) -> Self {
        self.inventory_config = config;
        self
    }
}
