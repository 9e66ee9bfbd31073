//! Radio inventory repository

use super::scope_sql::{self, ScopedUpdate};
use crate::domain::{Radio, UpdateRadioInput};
use crate::error::Result;
use crate::policy::{ResourceKind, ScopedPredicate};
use async_trait::async_trait;
use sqlx::MySqlPool;

const COLUMNS: &str = "r.id, r.dealer_id, r.dealer_radio_id, r.network_id, r.radio_type, \
                       r.firmware_version, r.battery_voltage, r.receiver_time, r.tank_id, \
                       r.meter_id, r.notes, r.active";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RadioRepository: Send + Sync {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Radio>>;
    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Radio>>;
    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64>;
    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateRadioInput,
    ) -> Result<Option<Radio>>;
}

pub struct RadioRepositoryImpl {
    pool: MySqlPool,
}

impl RadioRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RadioRepository for RadioRepositoryImpl {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Radio>> {
        predicate.expect_kind(ResourceKind::Radio)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" LIMIT 1");
        let radio = qb
            .build_query_as::<Radio>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(radio)
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Radio>> {
        predicate.expect_kind(ResourceKind::Radio)?;
        let mut qb = scope_sql::select(COLUMNS, predicate)?;
        qb.push(" ORDER BY r.dealer_radio_id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let radios = qb.build_query_as::<Radio>().fetch_all(&self.pool).await?;
        Ok(radios)
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Radio)?;
        scope_sql::count(&self.pool, predicate).await
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateRadioInput,
    ) -> Result<Option<Radio>> {
        predicate.expect_kind(ResourceKind::Radio)?;
        let mut update = ScopedUpdate::new(ResourceKind::Radio);
        update
            .set("r.notes", input.notes.clone())
            .set("r.active", input.active);
        update.execute(&self.pool, predicate).await?;

        self.find_one(predicate).await
    }
}
