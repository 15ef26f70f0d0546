//! Dialgate Core Library
//!
//! Provides core business logic for telephony lifecycle management, including:
//! - Credential resolution (Credential Service)
//! - Number inventory and reservations (Inventory Service)
//! - Rental lifecycle and expiry sweep (Rental Service)
//! - Inbound/outbound call routing (Routing Service)
//! - Recording and transcription access (Recording Service)
//!
//! This library is designed to be platform-independent, abstracting the storage layer through traits,
//! so the same services can back a web API, a worker process, or tests.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{
    CredentialService, InventoryService, RecordingService, RentalService, RoutingService,
    ServiceContext,
};
pub use traits::{
    ClientDirectory, CredentialStore, InventoryRepository, ObjectStore, ProviderFactory,
    RecordingRepository, RentalRepository, SelectionRepository,
};
