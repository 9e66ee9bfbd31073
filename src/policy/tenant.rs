//! Tenant resolution: authenticated user -> owning dealer

use crate::domain::{Dealer, DealerId, UserId};
use crate::error::{AppError, Result};
use crate::repository::DealerRepository;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Dealer scope of one request.
///
/// Only [`TenantResolver::resolve`] hands these out; handlers receive one per
/// request and pass it explicitly to every scoped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    user_id: UserId,
    dealer_id: DealerId,
}

impl TenantScope {
    pub(crate) fn new(user_id: UserId, dealer_id: DealerId) -> Self {
        Self { user_id, dealer_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn dealer_id(&self) -> DealerId {
        self.dealer_id
    }
}

/// Maps a user to the dealer that owns it through `frontend_dealer_account`.
pub struct TenantResolver<D: DealerRepository> {
    repo: Arc<D>,
}

impl<D: DealerRepository> TenantResolver<D> {
    pub fn new(repo: Arc<D>) -> Self {
        Self { repo }
    }

    /// Resolve the owning dealer of `user_id`.
    ///
    /// No link fails closed with `NoTenant`; more than one distinct dealer is
    /// an integrity fault and fails with `AmbiguousTenant`.
    pub async fn resolve_dealer(&self, user_id: UserId) -> Result<DealerId> {
        let mut links = self.repo.find_dealer_ids_by_user(user_id).await?;
        links.sort_unstable();
        links.dedup();

        match links.as_slice() {
            [] => {
                counter!("owl_tenant_resolution_total", "outcome" => "no_tenant").increment(1);
                warn!(user_id = %user_id, "User has no dealer account link");
                Err(AppError::NoTenant(user_id.get()))
            }
            [dealer_id] => {
                counter!("owl_tenant_resolution_total", "outcome" => "resolved").increment(1);
                debug!(user_id = %user_id, dealer_id = %dealer_id, "Resolved tenant");
                Ok(*dealer_id)
            }
            many => {
                counter!("owl_tenant_resolution_total", "outcome" => "ambiguous").increment(1);
                error!(
                    user_id = %user_id,
                    links = many.len(),
                    "User is linked to more than one dealer"
                );
                Err(AppError::AmbiguousTenant {
                    user_id: user_id.get(),
                    links: many.len(),
                })
            }
        }
    }

    pub async fn resolve(&self, user_id: UserId) -> Result<TenantScope> {
        let dealer_id = self.resolve_dealer(user_id).await?;
        Ok(TenantScope::new(user_id, dealer_id))
    }

    /// Load the dealer record of an already resolved scope.
    pub async fn dealer(&self, scope: &TenantScope) -> Result<Dealer> {
        self.repo
            .find_by_id(scope.dealer_id())
            .await?
            .ok_or_else(|| AppError::NoTenant(scope.user_id().get()))
    }
}
