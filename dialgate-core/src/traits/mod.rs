//! Storage layer abstraction trait definition

mod client_directory;
mod credential_store;
mod inventory_repository;
mod object_store;
mod provider_factory;
mod recording_repository;
mod rental_repository;
mod selection_repository;

pub use client_directory::ClientDirectory;
pub use credential_store::CredentialStore;
pub use inventory_repository::InventoryRepository;
pub use object_store::{ObjectStore, SignedUrl};
pub use provider_factory::{DefaultProviderFactory, ProviderFactory};
pub use recording_repository::RecordingRepository;
pub use rental_repository::RentalRepository;
pub use selection_repository::SelectionRepository;

/// 条件更新闭包：在存储实现的写临界区内执行。
///
/// 返回 `false` 表示放弃本次转换，存储层不得写入任何变更。
pub type ApplyFn<T> = Box<dyn FnOnce(&mut T) -> bool + Send>;
