//! Server initialization and routing

use crate::api;
use crate::cache::{CacheManager, CacheOperations};
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::ObservabilityLayer;
use crate::policy::TenantResolver;
use crate::repository::{
    customer::CustomerRepositoryImpl, dealer::DealerRepositoryImpl, meter::MeterRepositoryImpl,
    radio::RadioRepositoryImpl, service_address::ServiceAddressRepositoryImpl,
    tank::TankRepositoryImpl, user::UserRepositoryImpl,
};
use crate::service::{
    CustomerService, IdentityService, MeterService, RadioService, ServiceAddressService,
    TankService,
};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    http::{HeaderValue, StatusCode},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_manager: JwtManager,
    pub cache_manager: CacheManager,
    pub identity_service: Arc<IdentityService<UserRepositoryImpl>>,
    pub tenant_resolver: Arc<TenantResolver<DealerRepositoryImpl>>,
    pub customer_service: Arc<CustomerService<CustomerRepositoryImpl>>,
    pub service_address_service:
        Arc<ServiceAddressService<ServiceAddressRepositoryImpl, CustomerRepositoryImpl>>,
    pub tank_service: Arc<TankService<TankRepositoryImpl, ServiceAddressRepositoryImpl>>,
    pub meter_service: Arc<MeterService<MeterRepositoryImpl, ServiceAddressRepositoryImpl>>,
    pub radio_service: Arc<RadioService<RadioRepositoryImpl>>,
}

impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type DealerRepo = DealerRepositoryImpl;
    type CustomerRepo = CustomerRepositoryImpl;
    type ServiceAddressRepo = ServiceAddressRepositoryImpl;
    type TankRepo = TankRepositoryImpl;
    type MeterRepo = MeterRepositoryImpl;
    type RadioRepo = RadioRepositoryImpl;
    type Cache = CacheManager;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn cache(&self) -> &Self::Cache {
        &self.cache_manager
    }

    fn identity_service(&self) -> &IdentityService<Self::UserRepo> {
        &self.identity_service
    }

    fn tenant_resolver(&self) -> &TenantResolver<Self::DealerRepo> {
        &self.tenant_resolver
    }

    fn customer_service(&self) -> &CustomerService<Self::CustomerRepo> {
        &self.customer_service
    }

    fn service_address_service(
        &self,
    ) -> &ServiceAddressService<Self::ServiceAddressRepo, Self::CustomerRepo> {
        &self.service_address_service
    }

    fn tank_service(&self) -> &TankService<Self::TankRepo, Self::ServiceAddressRepo> {
        &self.tank_service
    }

    fn meter_service(&self) -> &MeterService<Self::MeterRepo, Self::ServiceAddressRepo> {
        &self.meter_service
    }

    fn radio_service(&self) -> &RadioService<Self::RadioRepo> {
        &self.radio_service
    }

    async fn check_ready(&self) -> (bool, bool) {
        let db_ok = sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok();
        let cache_ok = self.cache_manager.ping().await.is_ok();
        (db_ok, cache_ok)
    }
}

/// Run the HTTP server until it stops or fails
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.request_timeout_secs))
        .connect(&config.database.url)
        .await?;
    info!("Connected to database");

    let cache_manager = CacheManager::new(&config.redis).await?;
    info!("Connected to Redis");

    let jwt_manager = JwtManager::new(config.jwt.clone())?;

    let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
    let dealer_repo = Arc::new(DealerRepositoryImpl::new(db_pool.clone()));
    let customer_repo = Arc::new(CustomerRepositoryImpl::new(db_pool.clone()));
    let service_address_repo = Arc::new(ServiceAddressRepositoryImpl::new(db_pool.clone()));
    let tank_repo = Arc::new(TankRepositoryImpl::new(db_pool.clone()));
    let meter_repo = Arc::new(MeterRepositoryImpl::new(db_pool.clone()));
    let radio_repo = Arc::new(RadioRepositoryImpl::new(db_pool.clone()));

    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_manager,
        cache_manager,
        identity_service: Arc::new(IdentityService::new(user_repo)),
        tenant_resolver: Arc::new(TenantResolver::new(dealer_repo)),
        customer_service: Arc::new(CustomerService::new(customer_repo.clone())),
        service_address_service: Arc::new(ServiceAddressService::new(
            service_address_repo.clone(),
            customer_repo,
        )),
        tank_service: Arc::new(TankService::new(tank_repo, service_address_repo.clone())),
        meter_service: Arc::new(MeterService::new(meter_repo, service_address_repo)),
        radio_service: Arc::new(RadioService::new(radio_repo)),
    };

    let app = build_router(state).merge(metrics_router(prometheus_handle));

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Prometheus scrape endpoint; responds 404 when metrics are disabled
pub fn metrics_router(handle: Option<PrometheusHandle>) -> Router {
    Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(handle))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        if config.is_production() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; accepting any origin");
        }
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = cors_layer(state.config());
    let timeout = Duration::from_secs(state.config().request_timeout_secs);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // Endpoint index
        .route("/", get(api::index::index))
        .route("/api", get(api::index::index))
        .route("/api/v1.0", get(api::index::index))
        .route("/api/v1.0/index", get(api::index::index))
        // Session endpoints
        .route("/api/v1.0/auth/login", axum::routing::post(api::auth::login::<S>))
        .route("/api/v1.0/auth/me", get(api::auth::me::<S>))
        .route(
            "/api/v1.0/auth/password",
            axum::routing::put(api::auth::change_password::<S>),
        )
        .route(
            "/api/v1.0/logout",
            get(api::auth::logout::<S>).post(api::auth::logout::<S>),
        )
        // Customers
        .route(
            "/api/v1.0/customers",
            get(api::customer::list::<S>).post(api::customer::create::<S>),
        )
        .route(
            "/api/v1.0/customer/{id}",
            get(api::customer::get::<S>).put(api::customer::update::<S>),
        )
        // Service addresses
        .route(
            "/api/v1.0/customer/{id}/service-addresses",
            get(api::service_address::list::<S>).post(api::service_address::create::<S>),
        )
        .route(
            "/api/v1.0/customer/{id}/service-address/{sa_id}",
            get(api::service_address::get::<S>).put(api::service_address::update::<S>),
        )
        // Tanks
        .route(
            "/api/v1.0/tanks",
            get(api::tank::list::<S>).post(api::tank::create::<S>),
        )
        .route(
            "/api/v1.0/tank/{id}",
            get(api::tank::get::<S>).put(api::tank::update::<S>),
        )
        // Meters
        .route(
            "/api/v1.0/meters",
            get(api::meter::list::<S>).post(api::meter::create::<S>),
        )
        .route(
            "/api/v1.0/meter/{id}",
            get(api::meter::get::<S>).put(api::meter::update::<S>),
        )
        // Radios
        .route("/api/v1.0/radios", get(api::radio::list::<S>))
        .route(
            "/api/v1.0/radio/{id}",
            get(api::radio::get::<S>).put(api::radio::update::<S>),
        )
        .route(
            "/api/v1.0/radio/lookup/{dealer_radio_id}",
            get(api::radio::lookup::<S>),
        )
        // Add middleware
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
