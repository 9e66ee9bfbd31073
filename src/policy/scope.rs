//! Scoped query authorization.
//!
//! Every read or write of a tenant-owned resource goes through a
//! [`ScopedPredicate`] built from the request's [`TenantScope`]. The predicate
//! always carries the caller's dealer; the ownership chain of the resource
//! kind decides how that dealer is reached (directly, or through the parent
//! customer and service address). Repositories never see an unscoped filter.

use super::tenant::TenantScope;
use crate::domain::{
    CreateCustomerInput, CreateMeterInput, CreateServiceAddressInput, CreateTankInput, Customer,
    CustomerId, DealerId, Meter, NewCustomer, NewMeter, NewServiceAddress, NewTank, Radio,
    ServiceAddress, ServiceAddressId, Tank,
};
use crate::error::{AppError, Result};
use serde::Serialize;
use tracing::warn;

/// Tenant-owned resource kinds and their ownership chains:
///
/// - `Customer -> Dealer`
/// - `ServiceAddress -> Customer -> Dealer`
/// - `Tank | Meter -> ServiceAddress -> Customer -> Dealer`
/// - `Radio -> Dealer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Customer,
    ServiceAddress,
    Tank,
    Meter,
    Radio,
}

impl ResourceKind {
    /// Number of ancestor ids (customer, then service address) a path may carry.
    pub fn max_ancestors(self) -> usize {
        match self {
            ResourceKind::Customer | ResourceKind::Radio => 0,
            ResourceKind::ServiceAddress => 1,
            ResourceKind::Tank | ResourceKind::Meter => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Customer => "Customer",
            ResourceKind::ServiceAddress => "Service address",
            ResourceKind::Tank => "Tank",
            ResourceKind::Meter => "Meter",
            ResourceKind::Radio => "Radio",
        }
    }

    /// The uniform "absent or not yours" error for this kind.
    pub fn not_found(self) -> AppError {
        AppError::NotFound(format!("{} not found", self.label()))
    }
}

/// Logical column a predicate constrains.
///
/// Repositories translate these to their physical joins; an unmapped column
/// must be treated as an error, never skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeColumn {
    Id,
    DealerId,
    CustomerId,
    ServiceAddressId,
    DealerRadioId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub column: ScopeColumn,
    pub value: i64,
}

/// Filter restricting a query of one resource kind to one dealer.
///
/// Built only by [`ScopedQueryAuthorizer`], so the dealer constraint cannot be
/// left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedPredicate {
    kind: ResourceKind,
    dealer_id: DealerId,
    customer_id: Option<CustomerId>,
    service_address_id: Option<ServiceAddressId>,
    id: Option<i64>,
    dealer_radio_id: Option<i64>,
}

impl ScopedPredicate {
    fn new(kind: ResourceKind, dealer_id: DealerId) -> Self {
        Self {
            kind,
            dealer_id,
            customer_id: None,
            service_address_id: None,
            id: None,
            dealer_radio_id: None,
        }
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn with_service_address(mut self, service_address_id: ServiceAddressId) -> Self {
        self.service_address_id = Some(service_address_id);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn dealer_id(&self) -> DealerId {
        self.dealer_id
    }

    pub fn target_id(&self) -> Option<i64> {
        self.id
    }

    /// All constraints as a conjunction. The dealer constraint is always last
    /// and always present.
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut out = Vec::with_capacity(5);
        if let Some(id) = self.id {
            out.push(Constraint {
                column: ScopeColumn::Id,
                value: id,
            });
        }
        if let Some(sa) = self.service_address_id {
            out.push(Constraint {
                column: ScopeColumn::ServiceAddressId,
                value: sa.get(),
            });
        }
        if let Some(customer) = self.customer_id {
            out.push(Constraint {
                column: ScopeColumn::CustomerId,
                value: customer.get(),
            });
        }
        if let Some(radio) = self.dealer_radio_id {
            out.push(Constraint {
                column: ScopeColumn::DealerRadioId,
                value: radio,
            });
        }
        out.push(Constraint {
            column: ScopeColumn::DealerId,
            value: self.dealer_id.get(),
        });
        out
    }

    /// Guard used by repositories before translating a predicate.
    pub fn expect_kind(&self, kind: ResourceKind) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(AppError::Internal(anyhow::anyhow!(
                "{:?} predicate passed to {:?} repository",
                self.kind,
                kind
            )))
        }
    }

    /// Evaluate against a row's ownership chain. A constraint on a column the
    /// lineage does not carry evaluates to false.
    pub fn matches(&self, lineage: &Lineage) -> bool {
        lineage.kind == self.kind
            && self
                .constraints()
                .iter()
                .all(|c| lineage.value(c.column) == Some(c.value))
    }
}

/// Ownership chain of a stored row, from the row up to its dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lineage {
    pub kind: ResourceKind,
    pub id: i64,
    pub dealer_id: DealerId,
    pub customer_id: Option<CustomerId>,
    pub service_address_id: Option<ServiceAddressId>,
    pub dealer_radio_id: Option<i64>,
}

impl Lineage {
    pub fn customer(customer: &Customer) -> Self {
        Self {
            kind: ResourceKind::Customer,
            id: customer.id.get(),
            dealer_id: customer.dealer_id,
            customer_id: Some(customer.id),
            service_address_id: None,
            dealer_radio_id: None,
        }
    }

    pub fn service_address(sa: &ServiceAddress, owner: &Customer) -> Self {
        Self {
            kind: ResourceKind::ServiceAddress,
            id: sa.id.get(),
            dealer_id: owner.dealer_id,
            customer_id: Some(sa.customer_id),
            service_address_id: Some(sa.id),
            dealer_radio_id: None,
        }
    }

    pub fn tank(tank: &Tank, sa: &ServiceAddress, owner: &Customer) -> Self {
        Self {
            kind: ResourceKind::Tank,
            id: tank.id.get(),
            dealer_id: owner.dealer_id,
            customer_id: Some(sa.customer_id),
            service_address_id: Some(tank.service_address_id),
            dealer_radio_id: None,
        }
    }

    pub fn meter(meter: &Meter, sa: &ServiceAddress, owner: &Customer) -> Self {
        Self {
            kind: ResourceKind::Meter,
            id: meter.id.get(),
            dealer_id: owner.dealer_id,
            customer_id: Some(sa.customer_id),
            service_address_id: Some(meter.service_address_id),
            dealer_radio_id: None,
        }
    }

    pub fn radio(radio: &Radio) -> Self {
        Self {
            kind: ResourceKind::Radio,
            id: radio.id.get(),
            dealer_id: radio.dealer_id,
            customer_id: None,
            service_address_id: None,
            dealer_radio_id: Some(radio.dealer_radio_id),
        }
    }

    fn value(&self, column: ScopeColumn) -> Option<i64> {
        match column {
            ScopeColumn::Id => Some(self.id),
            ScopeColumn::DealerId => Some(self.dealer_id.get()),
            ScopeColumn::CustomerId => self.customer_id.map(CustomerId::get),
            ScopeColumn::ServiceAddressId => self.service_address_id.map(ServiceAddressId::get),
            ScopeColumn::DealerRadioId => self.dealer_radio_id,
        }
    }
}

/// Builds tenant-restricted predicates and insert records for one request.
#[derive(Debug, Clone, Copy)]
pub struct ScopedQueryAuthorizer<'a> {
    scope: &'a TenantScope,
}

impl<'a> ScopedQueryAuthorizer<'a> {
    pub fn new(scope: &'a TenantScope) -> Self {
        Self { scope }
    }

    pub fn dealer_id(&self) -> DealerId {
        self.scope.dealer_id()
    }

    fn base(&self, kind: ResourceKind) -> ScopedPredicate {
        ScopedPredicate::new(kind, self.scope.dealer_id())
    }

    /// Predicate for a resource addressed by path ids.
    ///
    /// `ancestors` is the ordered chain of ids from the top of the ownership
    /// chain (customer first, then service address); `target` is the
    /// resource's own id, or `None` for a collection.
    pub fn predicate(
        &self,
        kind: ResourceKind,
        ancestors: &[i64],
        target: Option<i64>,
    ) -> Result<ScopedPredicate> {
        if ancestors.len() > kind.max_ancestors() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "{:?} accepts at most {} ancestor ids, got {}",
                kind,
                kind.max_ancestors(),
                ancestors.len()
            )));
        }

        let mut predicate = self.base(kind);
        predicate.customer_id = ancestors.first().copied().map(CustomerId);
        predicate.service_address_id = ancestors.get(1).copied().map(ServiceAddressId);
        predicate.id = target;
        Ok(predicate)
    }

    /// Service address addressed by its own id, without the customer in the path.
    pub fn service_address_by_id(&self, id: ServiceAddressId) -> ScopedPredicate {
        self.base(ResourceKind::ServiceAddress).with_id(id.get())
    }

    pub fn tanks(&self, service_address_id: Option<ServiceAddressId>) -> ScopedPredicate {
        let predicate = self.base(ResourceKind::Tank);
        match service_address_id {
            Some(sa) => predicate.with_service_address(sa),
            None => predicate,
        }
    }

    pub fn meters(&self, service_address_id: Option<ServiceAddressId>) -> ScopedPredicate {
        let predicate = self.base(ResourceKind::Meter);
        match service_address_id {
            Some(sa) => predicate.with_service_address(sa),
            None => predicate,
        }
    }

    /// Radio addressed by the dealer's own numbering.
    pub fn radio_by_dealer_radio_id(&self, dealer_radio_id: i64) -> ScopedPredicate {
        let mut predicate = self.base(ResourceKind::Radio);
        predicate.dealer_radio_id = Some(dealer_radio_id);
        predicate
    }

    /// Insert record for a customer owned by the caller's dealer.
    pub fn customer_record(&self, input: CreateCustomerInput) -> NewCustomer {
        NewCustomer::new(self.scope.dealer_id(), input)
    }

    /// Insert record for a service address. `parent` must belong to the
    /// caller's dealer; anything else is reported as a missing customer.
    pub fn service_address_record(
        &self,
        parent: &Customer,
        input: CreateServiceAddressInput,
    ) -> Result<NewServiceAddress> {
        if parent.dealer_id != self.scope.dealer_id() {
            warn!(
                customer_id = %parent.id,
                dealer_id = %self.scope.dealer_id(),
                "Rejected service address create under foreign customer"
            );
            return Err(ResourceKind::Customer.not_found());
        }
        Ok(NewServiceAddress::new(parent.id, input))
    }

    /// Insert record for a tank. `parent_scope` must be the predicate under
    /// which `parent` was loaded.
    pub fn tank_record(
        &self,
        parent_scope: &ScopedPredicate,
        parent: &ServiceAddress,
        input: CreateTankInput,
    ) -> Result<NewTank> {
        self.check_parent(parent_scope, parent, input.service_address_id)?;
        Ok(NewTank::new(parent.id, input))
    }

    pub fn meter_record(
        &self,
        parent_scope: &ScopedPredicate,
        parent: &ServiceAddress,
        input: CreateMeterInput,
    ) -> Result<NewMeter> {
        self.check_parent(parent_scope, parent, input.service_address_id)?;
        Ok(NewMeter::new(parent.id, input))
    }

    fn check_parent(
        &self,
        parent_scope: &ScopedPredicate,
        parent: &ServiceAddress,
        requested: ServiceAddressId,
    ) -> Result<()> {
        let verified = parent_scope.kind == ResourceKind::ServiceAddress
            && parent_scope.dealer_id == self.scope.dealer_id()
            && parent_scope.id == Some(parent.id.get())
            && requested == parent.id;
        if verified {
            Ok(())
        } else {
            warn!(
                service_address_id = %requested,
                dealer_id = %self.scope.dealer_id(),
                "Rejected create under unverified service address"
            );
            Err(ResourceKind::ServiceAddress.not_found())
        }
    }
}
