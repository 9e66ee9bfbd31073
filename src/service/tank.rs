//! Tank business logic

use crate::domain::{CreateTankInput, ServiceAddressId, Tank, TankId, UpdateTankInput};
use crate::error::Result;
use crate::policy::{ResourceKind, ScopedQueryAuthorizer, TenantScope};
use crate::repository::{ServiceAddressRepository, TankRepository};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct TankService<T: TankRepository, S: ServiceAddressRepository> {
    repo: Arc<T>,
    service_address_repo: Arc<S>,
}

impl<T: TankRepository, S: ServiceAddressRepository> TankService<T, S> {
    pub fn new(repo: Arc<T>, service_address_repo: Arc<S>) -> Self {
        Self {
            repo,
            service_address_repo,
        }
    }

    /// Tanks of the caller's dealer, optionally narrowed to one service address.
    pub async fn list(
        &self,
        scope: &TenantScope,
        service_address_id: Option<ServiceAddressId>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Tank>, i64)> {
        let auth = ScopedQueryAuthorizer::new(scope);
        if let Some(sa) = service_address_id {
            self.service_address_repo
                .find_one(&auth.service_address_by_id(sa))
                .await?
                .ok_or_else(|| ResourceKind::ServiceAddress.not_found())?;
        }

        let predicate = auth.tanks(service_address_id);
        let tanks = self.repo.find_many(&predicate, offset, limit).await?;
        let total = self.repo.count(&predicate).await?;
        Ok((tanks, total))
    }

    pub async fn get(&self, scope: &TenantScope, id: TankId) -> Result<Tank> {
        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Tank,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .find_one(&predicate)
            .await?
            .ok_or_else(|| ResourceKind::Tank.not_found())
    }

    pub async fn create(&self, scope: &TenantScope, input: CreateTankInput) -> Result<Tank> {
        input.validate()?;

        let auth = ScopedQueryAuthorizer::new(scope);
        let parent_scope = auth.service_address_by_id(input.service_address_id);
        let parent = self
            .service_address_repo
            .find_one(&parent_scope)
            .await?
            .ok_or_else(|| ResourceKind::ServiceAddress.not_found())?;

        let record = auth.tank_record(&parent_scope, &parent, input)?;
        let tank = self.repo.insert(&record).await?;
        info!(
            tank_id = %tank.id,
            service_address_id = %tank.service_address_id,
            "Tank created"
        );
        Ok(tank)
    }

    pub async fn update(
        &self,
        scope: &TenantScope,
        id: TankId,
        input: UpdateTankInput,
    ) -> Result<Tank> {
        input.validate()?;

        let predicate = ScopedQueryAuthorizer::new(scope).predicate(
            ResourceKind::Tank,
            &[],
            Some(id.get()),
        )?;
        self.repo
            .update(&predicate, &input)
            .await?
            .ok_or_else(|| ResourceKind::Tank.not_found())
    }
}
