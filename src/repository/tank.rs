//! Tank repository

use super::scope_sql::{self, ScopedUpdate};
use crate::domain::{NewTank, Tank, TankId, UpdateTankInput};
use crate::error::{AppError, Result};
use crate::policy::{ResourceKind, ScopedPredicate};
use async_trait::async_trait;
use sqlx::MySqlPool;

const COLUMNS: &str = "t.id, t.service_address_id, t.capacity, t.notes, t.usage_billing, \
                       t.tank_type, t.tank_manufacturer, t.serial_number, t.manufacture_date, \
                       t.install_date, t.last_inspection_date, t.next_inspection_date, \
                       t.network_id, t.receiver_time, t.sensor_value, t.days_to_empty";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TankRepository: Send + Sync {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Tank>>;
    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Tank>>;
    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64>;
    async fn insert(&self, record: &NewTank) -> Result<Tank>;
    async fn update(&self, predicate: &ScopedPredicate, input: &UpdateTankInput)
        -> Result<Option<Tank>>;
}

pub struct TankRepositoryImpl {
    pool: MySqlPool,
}

impl TankRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TankRepository for TankRepositoryImpl {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Tank>> {
        predicate.expect_kind(ResourceKind::Tank)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" LIMIT 1");
        let tank = qb
            .build_query_as::<Tank>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(tank)
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Tank>> {
        predicate.expect_kind(ResourceKind::Tank)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" ORDER BY t.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let tanks = qb.build_query_as::<Tank>().fetch_all(&self.pool).await?;
        Ok(tanks)
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Tank)?;
        scope_sql::count(&self.pool, predicate).await
    }

    async fn insert(&self, record: &NewTank) -> Result<Tank> {
        let input = record.fields();
        let result = sqlx::query(
            r#"
            INSERT INTO frontend_tank
                (service_address_id, capacity, notes, usage_billing, tank_type, tank_manufacturer,
                 serial_number, manufacture_date, install_date, last_inspection_date,
                 next_inspection_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.service_address_id())
        .bind(input.capacity)
        .bind(&input.notes)
        .bind(input.usage_billing.unwrap_or(false))
        .bind(&input.tank_type)
        .bind(&input.tank_manufacturer)
        .bind(&input.serial_number)
        .bind(input.manufacture_date)
        .bind(input.install_date)
        .bind(input.last_inspection_date)
        .bind(input.next_inspection_date)
        .execute(&self.pool)
        .await?;

        let id = TankId(result.last_insert_id() as i64);
        let sql = format!("SELECT {} FROM frontend_tank t WHERE t.id = ?", COLUMNS);
        sqlx::query_as::<_, Tank>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create tank")))
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateTankInput,
    ) -> Result<Option<Tank>> {
        predicate.expect_kind(ResourceKind::Tank)?;
        let mut update = ScopedUpdate::new(ResourceKind::Tank);
        update
            .set("t.capacity", input.capacity)
            .set("t.notes", input.notes.clone())
            .set("t.usage_billing", input.usage_billing)
            .set("t.tank_type", input.tank_type.clone())
            .set("t.tank_manufacturer", input.tank_manufacturer.clone())
            .set("t.serial_number", input.serial_number.clone())
            .set("t.manufacture_date", input.manufacture_date)
            .set("t.install_date", input.install_date)
            .set("t.last_inspection_date", input.last_inspection_date)
            .set("t.next_inspection_date", input.next_inspection_date);
        update.execute(&self.pool, predicate).await?;

        self.find_one(predicate).await
    }
}
