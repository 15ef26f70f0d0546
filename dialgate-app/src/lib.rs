//! Platform-agnostic application bootstrap for Dialgate.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter
//! injection), ready-made adapters for self-hosted deployments, the startup
//! preflight check, and the background expiry sweep.

pub mod adapters;
pub mod preflight;
pub mod sweep;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dialgate_core::error::{CoreError, CoreResult};
use dialgate_core::services::{
    CredentialService, InventoryService, RecordingService, RentalService, RoutingService,
    ServiceContext,
};
use dialgate_core::traits::{
    ClientDirectory, CredentialStore, DefaultProviderFactory, InventoryRepository, ObjectStore,
    ProviderFactory, RecordingRepository, RentalRepository, SelectionRepository,
};
use dialgate_core::types::{InventoryConfig, NumberPricing, RecordingConfig, RoutingConfig};

pub use preflight::{PreflightReport, run_preflight};
pub use sweep::{DEFAULT_SWEEP_INTERVAL, SweepScheduler};

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs
/// this once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all storage adapters)
    pub ctx: Arc<ServiceContext>,
    /// Credential resolution service
    pub credential_service: CredentialService,
    /// Number inventory service
    pub inventory_service: InventoryService,
    /// Rental lifecycle service
    pub rental_service: Arc<RentalService>,
    /// Call routing service
    pub routing_service: RoutingService,
    /// Recording access service
    pub recording_service: RecordingService,
    /// Pricing table used by preflight and the default provider factory
    pub pricing: NumberPricing,
    /// Whether lifecycle writes are disabled (failed preflight)
    read_only: AtomicBool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pricing", &self.pricing)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Run the startup preflight and downgrade to read-only if it fails.
    ///
    /// A storage error during the check also downgrades: serving lookups is
    /// always safe, taking purchases against an unverified configuration
    /// is not.
    pub async fn run_preflight(&self) -> PreflightReport {
        let report = match preflight::run_preflight(
            self.ctx.credential_store.as_ref(),
            &self.pricing,
        )
        .await
        {
            Ok(report) => report,
            Err(e) => {
                log::error!("Preflight check could not complete: {e}");
                PreflightReport {
                    missing: vec![format!("platform_credential (store error: {e})")],
                }
            }
        };

        if report.is_ready() {
            log::info!("配置检查通过，生命周期服务就绪");
            self.read_only.store(false, Ordering::SeqCst);
        } else {
            log::warn!("配置不完整，降级为只读模式");
            self.read_only.store(true, Ordering::SeqCst);
        }
        report
    }

    /// Whether the app is limited to read-only endpoints.
    pub fn is_read_only(&self) -> bool {
        self.read_only.load(Ordering::SeqCst)
    }

    /// Start the background expiry sweep with the given cadence.
    pub fn start_sweep(&self, interval: std::time::Duration) -> tokio::task::JoinHandle<()> {
        SweepScheduler::new(Arc::clone(&self.rental_service))
            .with_interval(interval)
            .spawn()
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `credential_store`
/// - `inventory_repository`
/// - `selection_repository`
/// - `rental_repository`
/// - `recording_repository`
/// - `client_directory`
/// - `object_store`
///
/// # Optional
/// - `provider_factory` — defaults to `DefaultProviderFactory` over the
///   configured pricing table
/// - `pricing`, `routing_config`, `recording_config`, `inventory_config` —
///   default values otherwise
#[derive(Default)]
pub struct AppStateBuilder {
    credential_store: Option<Arc<dyn CredentialStore>>,
    inventory_repository: Option<Arc<dyn InventoryRepository>>,
    selection_repository: Option<Arc<dyn SelectionRepository>>,
    rental_repository: Option<Arc<dyn RentalRepository>>,
    recording_repository: Option<Arc<dyn RecordingRepository>>,
    client_directory: Option<Arc<dyn ClientDirectory>>,
    object_store: Option<Arc<dyn ObjectStore>>,
    provider_factory: Option<Arc<dyn ProviderFactory>>,
    pricing: Option<NumberPricing>,
    routing_config: Option<RoutingConfig>,
    recording_config: Option<RecordingConfig>,
    inventory_config: Option<InventoryConfig>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credential_store = Some(store);
        self
    }

    #[must_use]
    pub fn inventory_repository(mut self, repo: Arc<dyn InventoryRepository>) -> Self {
        self.inventory_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn selection_repository(mut self, repo: Arc<dyn SelectionRepository>) -> Self {
        self.selection_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn rental_repository(mut self, repo: Arc<dyn RentalRepository>) -> Self {
        self.rental_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn recording_repository(mut self, repo: Arc<dyn RecordingRepository>) -> Self {
        self.recording_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn client_directory(mut self, directory: Arc<dyn ClientDirectory>) -> Self {
        self.client_directory = Some(directory);
        self
    }

    #[must_use]
    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    #[must_use]
    pub fn provider_factory(mut self, factory: Arc<dyn ProviderFactory>) -> Self {
        self.provider_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn pricing(mut self, pricing: NumberPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    #[must_use]
    pub fn routing_config(mut self, config: RoutingConfig) -> Self {
        self.routing_config = Some(config);
        self
    }

    #[must_use]
    pub fn recording_config(mut self, config: RecordingConfig) -> Self {
        self.recording_config = Some(config);
        self
    }

    #[must_use]
    pub fn inventory_config(mut self, config: InventoryConfig) -> Self {
        self.inventory_config = Some(config);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        fn required<T: ?Sized>(adapter: Option<Arc<T>>, name: &str) -> CoreResult<Arc<T>> {
            adapter.ok_or_else(|| CoreError::ValidationError(format!("{name} is required")))
        }

        let credential_store = required(self.credential_store, "credential_store")?;
        let inventory_repository = required(self.inventory_repository, "inventory_repository")?;
        let selection_repository = required(self.selection_repository, "selection_repository")?;
        let rental_repository = required(self.rental_repository, "rental_repository")?;
        let recording_repository = required(self.recording_repository, "recording_repository")?;
        let client_directory = required(self.client_directory, "client_directory")?;
        let object_store = required(self.object_store, "object_store")?;

        let pricing = self.pricing.unwrap_or_default();
        let provider_factory = self
            .provider_factory
            .unwrap_or_else(|| Arc::new(DefaultProviderFactory::new(pricing)));

        let mut ctx = ServiceContext::new(
            credential_store,
            inventory_repository,
            selection_repository,
            rental_repository,
            recording_repository,
            client_directory,
            object_store,
            provider_factory,
        );
        if let Some(config) = self.routing_config {
            ctx = ctx.with_routing_config(config);
        }
        if let Some(config) = self.recording_config {
            ctx = ctx.with_recording_config(config);
        }
        if let Some(config) = self.inventory_config {
            ctx = ctx.with_inventory_config(config);
        }
        let ctx = Arc::new(ctx);

        Ok(AppState {
            credential_service: CredentialService::new(Arc::clone(&ctx)),
            inventory_service: InventoryService::new(Arc::clone(&ctx)),
            rental_service: Arc::new(RentalService::new(Arc::clone(&ctx))),
            routing_service: RoutingService::new(Arc::clone(&ctx)),
            recording_service: RecordingService::new(Arc::clone(&ctx)),
            ctx,
            pricing,
            // writes stay disabled until the preflight passes
            read_only: AtomicBool::new(true),
        })
    }
}
