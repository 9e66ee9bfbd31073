//! Customer domain model

use super::common::{CustomerId, DealerId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Customer entity, owned by exactly one dealer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub dealer_id: DealerId,
    pub account_id: Option<UserId>,
    pub customer_name: String,
    pub customer_number: Option<String>,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub active: bool,
}

/// Input for creating a customer.
///
/// Carries no ownership field: a `dealer_id` in the request body is dropped
/// during deserialization and the owner comes from the resolved tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomerInput {
    #[validate(length(min = 1, max = 255))]
    pub customer_name: String,
    #[validate(length(max = 255))]
    pub customer_number: Option<String>,
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
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub phone: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub active: Option<bool>,
}

/// Insert record for a customer whose owner has already been resolved.
///
/// Only the scoped query authorizer can build one.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    dealer_id: DealerId,
    fields: CreateCustomerInput,
}

impl NewCustomer {
    pub(crate) fn new(dealer_id: DealerId, fields: CreateCustomerInput) -> Self {
        Self { dealer_id, fields }
    }

    pub fn dealer_id(&self) -> DealerId {
        self.dealer_id
    }

    pub fn fields(&self) -> &CreateCustomerInput {
        &self.fields
    }
}

/// Partial update for a customer; ownership is not updatable
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCustomerInput {
    #[validate(length(min = 1, max = 255))]
    pub customer_name: Option<String>,
    #[validate(length(max = 255))]
    pub customer_number: Option<String>,
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
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub phone: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub active: Option<bool>,
}
