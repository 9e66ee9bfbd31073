//! Tank domain model

use super::common::{ServiceAddressId, TankId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Storage tank installed at a service address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tank {
    pub id: TankId,
    pub service_address_id: ServiceAddressId,
    pub capacity: Option<i32>,
    pub notes: Option<String>,
    pub usage_billing: bool,
    pub tank_type: Option<String>,
    pub tank_manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub manufacture_date: Option<DateTime<Utc>>,
    pub install_date: Option<DateTime<Utc>>,
    pub last_inspection_date: Option<DateTime<Utc>>,
    pub next_inspection_date: Option<DateTime<Utc>>,
    /// Radio network address; written by the radio network, not the API
    pub network_id: Option<String>,
    pub receiver_time: Option<DateTime<Utc>>,
    pub sensor_value: Option<f64>,
    pub days_to_empty: Option<i32>,
}

/// Input for creating a tank.
///
/// `service_address_id` names the target parent; it is verified against the
/// caller's dealer before the insert record is built.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTankInput {
    pub service_address_id: ServiceAddressId,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub notes: Option<String>,
    pub usage_billing: Option<bool>,
    #[validate(length(max = 255))]
    pub tank_type: Option<String>,
    #[validate(length(max = 255))]
    pub tank_manufacturer: Option<String>,
    #[validate(length(max = 255))]
    pub serial_number: Option<String>,
    pub manufacture_date: Option<DateTime<Utc>>,
    pub install_date: Option<DateTime<Utc>>,
    pub last_inspection_date: Option<DateTime<Utc>>,
    pub next_inspection_date: Option<DateTime<Utc>>,
}

/// Insert record for a tank under a verified service address
#[derive(Debug, Clone)]
pub struct NewTank {
    service_address_id: ServiceAddressId,
    fields: CreateTankInput,
}

impl NewTank {
    pub(crate) fn new(service_address_id: ServiceAddressId, fields: CreateTankInput) -> Self {
        Self {
            service_address_id,
            fields,
        }
    }

    pub fn service_address_id(&self) -> ServiceAddressId {
        self.service_address_id
    }

    pub fn fields(&self) -> &CreateTankInput {
        &self.fields
    }
}

/// Partial update for a tank; it cannot be moved to another service address
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTankInput {
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    pub notes: Option<String>,
    pub usage_billing: Option<bool>,
    #[validate(length(max = 255))]
    pub tank_type: Option<String>,
    #[validate(length(max = 255))]
    pub tank_manufacturer: Option<String>,
    #[validate(length(max = 255))]
    pub serial_number: Option<String>,
    pub manufacture_date: Option<DateTime<Utc>>,
    pub install_date: Option<DateTime<Utc>>,
    pub last_inspection_date: Option<DateTime<Utc>>,
    pub next_inspection_date: Option<DateTime<Utc>>,
}
