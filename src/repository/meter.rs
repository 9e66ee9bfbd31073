//! Meter repository

use super::scope_sql::{self, ScopedUpdate};
use crate::domain::{Meter, MeterId, NewMeter, UpdateMeterInput};
use crate::error::{AppError, Result};
use crate::policy::{ResourceKind, ScopedPredicate};
use async_trait::async_trait;
use sqlx::MySqlPool;

const COLUMNS: &str = "m.id, m.service_address_id, m.meter_current_read, m.meter_model, \
                       m.meter_multiplier, m.meter_pulse_per_rev, m.meter_date_installed, \
                       m.meter_serial_number, m.network_id, m.receiver_time, m.sensor_value, \
                       m.meter_notes";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeterRepository: Send + Sync {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Meter>>;
    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Meter>>;
    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64>;
    async fn insert(&self, record: &NewMeter) -> Result<Meter>;
    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateMeterInput,
    ) -> Result<Option<Meter>>;
}

pub struct MeterRepositoryImpl {
    pool: MySqlPool,
}

impl MeterRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeterRepository for MeterRepositoryImpl {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Meter>> {
        predicate.expect_kind(ResourceKind::Meter)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" LIMIT 1");
        let meter = qb
            .build_query_as::<Meter>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(meter)
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Meter>> {
        predicate.expect_kind(ResourceKind::Meter)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" ORDER BY m.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let meters = qb.build_query_as::<Meter>().fetch_all(&self.pool).await?;
        Ok(meters)
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Meter)?;
        scope_sql::count(&self.pool, predicate).await
    }

    async fn insert(&self, record: &NewMeter) -> Result<Meter> {
        let input = record.fields();
        let result = sqlx::query(
            r#"
            INSERT INTO frontend_meter
                (service_address_id, meter_current_read, meter_model, meter_multiplier,
                 meter_pulse_per_rev, meter_date_installed, meter_serial_number, meter_notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.service_address_id())
        .bind(&input.meter_current_read)
        .bind(&input.meter_model)
        .bind(input.meter_multiplier)
        .bind(input.meter_pulse_per_rev)
        .bind(input.meter_date_installed)
        .bind(&input.meter_serial_number)
        .bind(&input.meter_notes)
        .execute(&self.pool)
        .await?;

        let id = MeterId(result.last_insert_id() as i64);
        let sql = format!("SELECT {} FROM frontend_meter m WHERE m.id = ?", COLUMNS);
        sqlx::query_as::<_, Meter>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create meter")))
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateMeterInput,
    ) -> Result<Option<Meter>> {
        predicate.expect_kind(ResourceKind::Meter)?;
        let mut update = ScopedUpdate::new(ResourceKind::Meter);
        update
            .set("m.meter_current_read", input.meter_current_read.clone())
            .set("m.meter_model", input.meter_model.clone())
            .set("m.meter_multiplier", input.meter_multiplier)
            .set("m.meter_pulse_per_rev", input.meter_pulse_per_rev)
            .set("m.meter_date_installed", input.meter_date_installed)
            .set("m.meter_serial_number", input.meter_serial_number.clone())
            .set("m.meter_notes", input.meter_notes.clone());
        update.execute(&self.pool, predicate).await?;

        self.find_one(predicate).await
    }
}
