//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`], so the production router runs
//! unchanged on top of either the MySQL-backed `AppState` or an in-memory
//! test state.

use crate::cache::CacheOperations;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::policy::TenantResolver;
use crate::repository::{
    CustomerRepository, DealerRepository, MeterRepository, RadioRepository,
    ServiceAddressRepository, TankRepository, UserRepository,
};
use crate::service::{
    CustomerService, IdentityService, MeterService, RadioService, ServiceAddressService,
    TankService,
};

pub trait HasServices: Clone + Send + Sync + 'static {
    type UserRepo: UserRepository;
    type DealerRepo: DealerRepository;
    type CustomerRepo: CustomerRepository;
    type ServiceAddressRepo: ServiceAddressRepository;
    type TankRepo: TankRepository;
    type MeterRepo: MeterRepository;
    type RadioRepo: RadioRepository;
    /// `CacheManager` in production, an in-process store in tests
    type Cache: CacheOperations + Clone + 'static;

    fn config(&self) -> &Config;

    fn jwt_manager(&self) -> &JwtManager;

    fn cache(&self) -> &Self::Cache;

    fn identity_service(&self) -> &IdentityService<Self::UserRepo>;

    fn tenant_resolver(&self) -> &TenantResolver<Self::DealerRepo>;

    fn customer_service(&self) -> &CustomerService<Self::CustomerRepo>;

    fn service_address_service(
        &self,
    ) -> &ServiceAddressService<Self::ServiceAddressRepo, Self::CustomerRepo>;

    fn tank_service(&self) -> &TankService<Self::TankRepo, Self::ServiceAddressRepo>;

    fn meter_service(&self) -> &MeterService<Self::MeterRepo, Self::ServiceAddressRepo>;

    fn radio_service(&self) -> &RadioService<Self::RadioRepo>;

    /// Returns `(db_ok, cache_ok)`
    fn check_ready(&self) -> impl std::future::Future<Output = (bool, bool)> + Send;
}
