//! Domain models

pub mod common;
pub mod customer;
pub mod dealer;
pub mod meter;
pub mod radio;
pub mod service_address;
pub mod tank;
pub mod user;

pub use common::{CustomerId, DealerId, MeterId, RadioId, ServiceAddressId, TankId, UserId};
pub use customer::{CreateCustomerInput, Customer, NewCustomer, UpdateCustomerInput};
pub use dealer::Dealer;
pub use meter::{CreateMeterInput, Meter, NewMeter, UpdateMeterInput};
pub use radio::{Radio, UpdateRadioInput};
pub use service_address::{
    CreateServiceAddressInput, NewServiceAddress, ServiceAddress, UpdateServiceAddressInput,
};
pub use tank::{CreateTankInput, NewTank, Tank, UpdateTankInput};
pub use user::{ChangePasswordInput, LoginInput, User};
