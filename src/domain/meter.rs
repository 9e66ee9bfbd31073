//! Meter domain model

use super::common::{MeterId, ServiceAddressId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Flow meter installed at a service address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Meter {
    pub id: MeterId,
    pub service_address_id: ServiceAddressId,
    pub meter_current_read: Option<String>,
    pub meter_model: Option<String>,
    pub meter_multiplier: i32,
    pub meter_pulse_per_rev: i32,
    pub meter_date_installed: Option<DateTime<Utc>>,
    pub meter_serial_number: Option<String>,
    pub network_id: Option<String>,
    pub receiver_time: Option<DateTime<Utc>>,
    pub sensor_value: Option<f64>,
    pub meter_notes: Option<String>,
}

/// Input for creating a meter under a service address the caller owns
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMeterInput {
    pub service_address_id: ServiceAddressId,
    #[validate(length(max = 255))]
    pub meter_current_read: Option<String>,
    #[validate(length(max = 255))]
    pub meter_model: Option<String>,
    #[validate(range(min = 1))]
    pub meter_multiplier: i32,
    #[validate(range(min = 1))]
    pub meter_pulse_per_rev: i32,
    pub meter_date_installed: Option<DateTime<Utc>>,
    #[validate(length(max = 255))]
    pub meter_serial_number: Option<String>,
    pub meter_notes: Option<String>,
}

/// Insert record for a meter under a verified service address
#[derive(Debug, Clone)]
pub struct NewMeter {
    service_address_id: ServiceAddressId,
    fields: CreateMeterInput,
}

impl NewMeter {
    pub(crate) fn new(service_address_id: ServiceAddressId, fields: CreateMeterInput) -> Self {
        Self {
            service_address_id,
            fields,
        }
    }

    pub fn service_address_id(&self) -> ServiceAddressId {
        self.service_address_id
    }

    pub fn fields(&self) -> &CreateMeterInput {
        &self.fields
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMeterInput {
    #[validate(length(max = 255))]
    pub meter_current_read: Option<String>,
    #[validate(length(max = 255))]
    pub meter_model: Option<String>,
    #[validate(range(min = 1))]
    pub meter_multiplier: Option<i32>,
    #[validate(range(min = 1))]
    pub meter_pulse_per_rev: Option<i32>,
    pub meter_date_installed: Option<DateTime<Utc>>,
    #[validate(length(max = 255))]
    pub meter_serial_number: Option<String>,
    pub meter_notes: Option<String>,
}
