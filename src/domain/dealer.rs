//! Dealer (tenant) domain model

use super::common::DealerId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A dealer organisation; every customer belongs to exactly one
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dealer {
    pub id: DealerId,
    pub dealer_name: String,
    pub address1: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub timezone: Option<String>,
    pub website_url: Option<String>,
    pub start_of_billing_cycle: i32,
    pub logo_image: Option<String>,
    pub color_navbar_top: Option<String>,
    pub color_navbar_bottom: Option<String>,
}
