//! Service wiring
//!
//! Opens the SQLite storage and builds the pricing service and backend
//! adapter from the loaded configuration.

use std::sync::Arc;

use anyhow::Context;
use application::{BookingAdminService, BookingWorkflow, CatalogService, PricingService};
use chrono::NaiveDate;
use infrastructure::{
    AppConfig, BackendAdapter, GeocodingAdapter, RouteAdapter, SqliteBookingStore,
    SqliteVehicleCatalog, TollAdapter, create_pool,
};
use integration_tolls::TollSessionState;
use tracing::{debug, info};

/// Booking and vehicle storage; needs no API keys
#[derive(Debug, Clone)]
pub struct Storage {
    pub bookings: Arc<SqliteBookingStore>,
    pub catalog: Arc<SqliteVehicleCatalog>,
}

impl Storage {
    /// Open the database and seed an empty catalog from `[[vehicles]]`
    pub async fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = Arc::new(
            create_pool(&config.database)
                .with_context(|| format!("Failed to open database {}", config.database.path))?,
        );

        let catalog = SqliteVehicleCatalog::new(Arc::clone(&pool));
        let seeded = catalog
            .seed(&config.vehicles)
            .await
            .context("Failed to seed the vehicle catalog")?;
        if seeded > 0 {
            info!(seeded, "Vehicle catalog initialised from configuration");
        }

        Ok(Self {
            bookings: Arc::new(SqliteBookingStore::new(pool)),
            catalog: Arc::new(catalog),
        })
    }

    /// Booking status management
    pub fn booking_admin(&self) -> BookingAdminService {
        BookingAdminService::new(self.bookings.clone())
    }

    /// Vehicle administration
    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.catalog.clone())
    }
}

/// Everything the pricing and booking commands need
pub struct Services {
    pub pricing: Arc<PricingService>,
    pub storage: Storage,
    pub backend: Option<Arc<BackendAdapter>>,
    pub currency: String,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("backend", &self.backend.is_some())
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl Services {
    /// Build all adapters from configuration on top of opened storage
    pub fn build(config: &AppConfig, storage: Storage) -> anyhow::Result<Self> {
        let maps = config.to_maps_config();
        let geocoder = GeocodingAdapter::new(&maps).context("Failed to set up geocoding")?;
        let router = RouteAdapter::new(&maps).context("Failed to set up directions")?;

        // One breaker per process; every toll client shares it
        let toll_session = Arc::new(TollSessionState::new());
        let tolls = TollAdapter::new(config.tolls.to_toll_config(), toll_session)
            .context("Failed to set up toll estimation")?;

        let pricing = PricingService::new(
            Arc::new(geocoder),
            Arc::new(router),
            Arc::new(tolls),
            storage.catalog.clone(),
        )
        .with_policy(config.pricing.to_fare_policy());

        let backend = if config.backend.base_url.is_some() {
            let adapter = BackendAdapter::new(&config.backend, config.pricing.currency.clone())
                .context("Failed to set up invoice/payment backend")?;
            Some(Arc::new(adapter))
        } else {
            debug!("No backend configured, invoice and payment will be skipped");
            None
        };

        info!(backend = backend.is_some(), "Services ready");

        Ok(Self {
            pricing: Arc::new(pricing),
            storage,
            backend,
            currency: config.pricing.currency.clone(),
        })
    }

    /// Start a booking workflow wired to the configured side effects
    pub fn workflow(&self, today: NaiveDate) -> BookingWorkflow {
        let workflow =
            BookingWorkflow::new(self.pricing.clone(), self.storage.bookings.clone(), today);
        match &self.backend {
            Some(backend) => workflow
                .with_invoices(backend.clone())
                .with_payments(backend.clone()),
            None => workflow,
        }
    }
}
