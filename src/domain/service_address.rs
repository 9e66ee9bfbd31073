//! Service address domain model

use super::common::{CustomerId, ServiceAddressId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Delivery location belonging to a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ServiceAddress {
    pub id: ServiceAddressId,
    pub customer_id: CustomerId,
    pub service_address_account_number: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub routing_zone: Option<String>,
    pub product_rate: Option<f64>,
    pub tax_rate: Option<f64>,
    pub management_rate: Option<f64>,
    pub current_balance: Option<f64>,
    pub short_code: Option<String>,
    pub coordinates_locked: Option<bool>,
}

/// Input for creating a service address under a customer taken from the path
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateServiceAddressInput {
    #[validate(length(min = 1, max = 255))]
    pub service_address_account_number: String,
    #[validate(length(min = 1, max = 255))]
    pub address1: String,
    #[validate(length(max = 255))]
    pub address2: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub city: String,
    #[validate(length(min = 1, max = 255))]
    pub state: String,
    #[validate(length(min = 1, max = 255))]
    pub postal_code: String,
    #[validate(length(max = 255))]
    pub country: Option<String>,
    #[validate(length(max = 255))]
    pub phone: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    #[validate(length(max = 255))]
    pub routing_zone: Option<String>,
    #[validate(range(min = 0.0))]
    pub product_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub tax_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub management_rate: Option<f64>,
    #[validate(length(min = 1, max = 255))]
    pub short_code: Option<String>,
    pub coordinates_locked: Option<bool>,
}

/// Insert record whose parent customer was verified inside the caller's scope
#[derive(Debug, Clone)]
pub struct NewServiceAddress {
    customer_id: CustomerId,
    fields: CreateServiceAddressInput,
}

impl NewServiceAddress {
    pub(crate) fn new(customer_id: CustomerId, fields: CreateServiceAddressInput) -> Self {
        Self {
            customer_id,
            fields,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn fields(&self) -> &CreateServiceAddressInput {
        &self.fields
    }
}

/// Partial update for a service address
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateServiceAddressInput {
    #[validate(length(min = 1, max = 255))]
    pub service_address_account_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address1: Option<String>,
    #[validate(length(max = 255))]
    pub address2: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub postal_code: Option<String>,
    #[validate(length(max = 255))]
    pub country: Option<String>,
    #[validate(length(max = 255))]
    pub phone: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    #[validate(length(max = 255))]
    pub routing_zone: Option<String>,
    #[validate(range(min = 0.0))]
    pub product_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub tax_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub management_rate: Option<f64>,
    #[validate(length(min = 1, max = 255))]
    pub short_code: Option<String>,
    pub coordinates_locked: Option<bool>,
}
