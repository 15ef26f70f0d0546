//! Storage and infrastructure adapters for self-hosted deployments.

mod env_credential_store;
mod hmac_signed_urls;
mod memory;

pub use env_credential_store::EnvCredentialStore;
pub use hmac_signed_urls::HmacSignedUrls;
pub use memory::{
    MemoryClientDirectory, MemoryInventoryRepository, MemoryRecordingRepository,
    MemoryRentalRepository, MemorySelectionRepository,
};
