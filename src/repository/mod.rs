//! Data access layer (Repository pattern)
//!
//! Tenant-owned repositories only accept a [`crate::policy::ScopedPredicate`];
//! there is no unscoped lookup by id on their traits.

pub mod customer;
pub mod dealer;
pub mod meter;
pub mod radio;
pub mod scope_sql;
pub mod service_address;
pub mod tank;
pub mod user;

pub use customer::CustomerRepository;
pub use dealer::DealerRepository;
pub use meter::MeterRepository;
pub use radio::RadioRepository;
pub use service_address::ServiceAddressRepository;
pub use tank::TankRepository;
pub use user::UserRepository;
