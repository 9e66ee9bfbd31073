//! Meter business logic

use crate::domain::{CreateMeterInput, Meter, MeterId, ServiceAddressId, UpdateMeterInput};
use crate::error::Result;
use crate::policy::{ResourceKind, ScopedQueryAuthorizer, TenantScope};
use crate::repository::{MeterRepository, ServiceAddressRepository};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct MeterService<M: MeterRepository, S: ServiceAddressRepository> {
    repo: Arc<M>,
    service_address_repo: Arc<S>,
}

impl<M: MeterRepository, S: ServiceAddressRepository> MeterService<M, S> {
    pub fn new(repo: Arc<M>, service_address_repo: Arc<S>) -> Self {
        Self {
            repo,
            service_address_repo,
        }
    }

    pub async fn list(
        &self,
        scope: &TenantScope,
        service_address_id: Option<ServiceAddressId>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Meter>, i64)> {
        let auth = ScopedQueryAuthorizer::new(scope);
        if let Some(sa) = service_address_id {
            self.service_address_repo
                .find_one(&auth.service_address_by_id(sa))
                .await?
                .ok_or_else(|| ResourceKind::ServiceAddress.not_found())?;
        }

        let predicate = auth.meters(service_address_id);
        let meters = self.repo.find_many(&predicate, offset, limit).await?;
        let total = self.repo.count(&predicate).await?;
        Ok((meters, total))
    }

    pub async fn get(&self, scope: &TenantScope, id: MeterId) -> Result<Meter> {
        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Meter,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .find_one(&predicate)
            .await?
            .ok_or_else(|| ResourceKind::Meter.not_found())
    }

    pub async fn create(&self, scope: &TenantScope, input: CreateMeterInput) -> Result<Meter> {
        input.validate()?;

        let auth = ScopedQueryAuthorizer::new(scope);
        let parent_scope = auth.service_address_by_id(input.service_address_id);
        let parent = self
            .service_address_repo
            .find_one(&parent_scope)
            .await?
            .ok_or_else(|| ResourceKind::ServiceAddress.not_found())?;

        let record = auth.meter_record(&parent_scope, &parent, input)?;
        let meter = self.repo.insert(&record).await?;
        info!(
            meter_id = %meter.id,
            service_address_id = %meter.service_address_id,
            "Meter created"
        );
        Ok(meter)
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: MeterId,
        input: UpdateMeterInput,
    ) -> Result<Meter> {
        input.validate()?;

        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Meter,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .update(&predicate, &input)
            .await?
            .ok_or_else(|| ResourceKind::Meter.not_found())
    }
}
