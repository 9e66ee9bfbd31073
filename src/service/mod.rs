//! Business logic layer

pub mod customer;
pub mod identity;
pub mod meter;
pub mod radio;
pub mod service_address;
pub mod tank;

pub use customer::CustomerService;
pub use identity::{hash_password, verify_password, IdentityService};
pub use meter::MeterService;
pub use radio::RadioService;
pub use service_address::ServiceAddressService;
pub use tank::TankService;
