//! Radio domain model

use super::common::{DealerId, MeterId, RadioId, TankId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Telemetry radio held in a dealer's inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Radio {
    pub id: RadioId,
    pub dealer_id: DealerId,
    /// Dealer-assigned radio number, unique within the dealer
    pub dealer_radio_id: i64,
    pub network_id: String,
    pub radio_type: Option<String>,
    pub firmware_version: Option<String>,
    pub battery_voltage: Option<f64>,
    pub receiver_time: Option<DateTime<Utc>>,
    pub tank_id: Option<TankId>,
    pub meter_id: Option<MeterId>,
    pub notes: Option<String>,
    pub active: bool,
}

/// Fields of a radio the API may change
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRadioInput {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub active: Option<bool>,
}
