//! API integration test infrastructure
//!
//! In-memory repositories over one shared store, so handler tests run the
//! production router without MySQL or Redis. Every scoped lookup goes through
//! `ScopedPredicate::matches`, the same ownership rule the SQL joins encode.


use async_trait::async_trait;
use owl_api::cache::CacheOperations;
use owl_api::config::JwtConfig;
use owl_api::domain::{
    Customer, CustomerId, Dealer, DealerId, Meter, MeterId, NewCustomer, NewMeter,
    NewServiceAddress, NewTank, Radio, RadioId, ServiceAddress, ServiceAddressId, Tank, TankId,
    UpdateCustomerInput, UpdateMeterInput, UpdateRadioInput, UpdateServiceAddressInput,
    UpdateTankInput, User, UserId,
};
use owl_api::error::{AppError, Result};
use owl_api::jwt::JwtManager;
use owl_api::policy::{Lineage, ResourceKind, ScopedPredicate};
use owl_api::repository::{
    CustomerRepository, DealerRepository, MeterRepository, RadioRepository,
    ServiceAddressRepository, TankRepository, UserRepository,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// Test Configuration
// ============================================================================

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "https://owl.test".to_string(),
        session_ttl_secs: 3600,
        private_key_pem: None,
        public_key_pem: None,
    }
}

pub fn create_test_jwt_manager() -> JwtManager {
    JwtManager::new(test_jwt_config()).expect("test jwt config is valid")
}

/// Argon2 is slow in debug builds; hash the shared test password once.
pub fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| owl_api::service::hash_password(TEST_PASSWORD).unwrap())
}

// ============================================================================
// Shared in-memory store
// ============================================================================

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub dealers: Vec<Dealer>,
    pub dealer_links: Vec<(UserId, DealerId)>,
    pub customers: Vec<Customer>,
    pub service_addresses: Vec<ServiceAddress>,
    pub tanks: Vec<Tank>,
    pub meters: Vec<Meter>,
    pub radios: Vec<Radio>,
    next_id: i64,
}

impl Tables {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn customer_lineage(&self, customer: &Customer) -> Lineage {
        Lineage::customer(customer)
    }

    fn owner_of(&self, sa: &ServiceAddress) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == sa.customer_id)
    }

    fn sa_by_id(&self, id: ServiceAddressId) -> Option<&ServiceAddress> {
        self.service_addresses.iter().find(|sa| sa.id == id)
    }

    /// Orphaned rows have no lineage and therefore never match.
    fn service_address_lineage(&self, sa: &ServiceAddress) -> Option<Lineage> {
        let owner = self.owner_of(sa)?;
        Some(Lineage::service_address(sa, owner))
    }

    fn tank_lineage(&self, tank: &Tank) -> Option<Lineage> {
        let sa = self.sa_by_id(tank.service_address_id)?;
        let owner = self.owner_of(sa)?;
        Some(Lineage::tank(tank, sa, owner))
    }

    fn meter_lineage(&self, meter: &Meter) -> Option<Lineage> {
        let sa = self.sa_by_id(meter.service_address_id)?;
        let owner = self.owner_of(sa)?;
        Some(Lineage::meter(meter, sa, owner))
    }
}

#[derive(Default)]
pub struct TestStore {
    pub tables: RwLock<Tables>,
}

impl TestStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn page<T: Clone>(rows: Vec<&T>, offset: i64, limit: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

fn set<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        *target = value.clone();
    }
}

// ============================================================================
// Test Repository Implementations
// ============================================================================

pub struct TestUserRepository {
    store: Arc<TestStore>,
}

impl TestUserRepository {
    pub fn new(store: Arc<TestStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for TestUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<()> {
        let mut tables = self.store.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.password = password_hash.to_string();
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: UserId) -> Result<()> {
        let mut tables = self.store.tables.write().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(chrono::Utc::now());
        }
        Ok(())
    }
}

pub struct TestDealerRepository {
    store: Arc<TestStore>,
}

impl TestDealerRepository {
    pub fn new(store: Arc<TestStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DealerRepository for TestDealerRepository {
    async fn find_dealer_ids_by_user(&self, user_id: UserId) -> Result<Vec<DealerId>> {
        let tables = self.store.tables.read().await;
        let mut ids: Vec<DealerId> = tables
            .dealer_links
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, dealer)| *dealer)
            .collect();
        ids.sort();
        ids.dedup();
        ids.truncate(2);
        Ok(ids)
    }

    async fn find_by_id(&self, id: DealerId) -> Result<Option<Dealer>> {
        let tables = self.store.tables.read().await;
        Ok(tables.dealers.iter().find(|d| d.id == id).cloned())
    }
}

pub struct TestCustomerRepository {
    store: Arc<TestStore>,
}

impl TestCustomerRepository {
    pub fn new(store: Arc<TestStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CustomerRepository for TestCustomerRepository {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Customer>> {
        predicate.expect_kind(ResourceKind::Customer)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .customers
            .iter()
            .find(|c| predicate.matches(&tables.customer_lineage(c)))
            .cloned())
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>> {
        predicate.expect_kind(ResourceKind::Customer)?;
        let tables = self.store.tables.read().await;
        let rows = tables
            .customers
            .iter()
            .filter(|c| predicate.matches(&tables.customer_lineage(c)))
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Customer)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .customers
            .iter()
            .filter(|c| predicate.matches(&tables.customer_lineage(c)))
            .count() as i64)
    }

    async fn insert(&self, record: &NewCustomer) -> Result<Customer> {
        let mut tables = self.store.tables.write().await;
        if !tables.dealers.iter().any(|d| d.id == record.dealer_id()) {
            return Err(AppError::Constraint("unknown dealer".to_string()));
        }
        let input = record.fields();
        let customer = Customer {
            id: CustomerId(tables.next_id()),
            dealer_id: record.dealer_id(),
            account_id: None,
            customer_name: input.customer_name.clone(),
            customer_number: input.customer_number.clone(),
            address1: input.address1.clone(),
            address2: input.address2.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            postal_code: input.postal_code.clone(),
            country: input.country.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
            active: input.active.unwrap_or(true),
        };
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateCustomerInput,
    ) -> Result<Option<Customer>> {
        predicate.expect_kind(ResourceKind::Customer)?;
        let mut tables = self.store.tables.write().await;
        let position = tables
            .customers
            .iter()
            .position(|c| predicate.matches(&Lineage::customer(c)));
        let Some(index) = position else {
            return Ok(None);
        };
        let c = &mut tables.customers[index];
        set(&mut c.customer_name, &input.customer_name);
        set_opt(&mut c.customer_number, &input.customer_number);
        set(&mut c.address1, &input.address1);
        set_opt(&mut c.address2, &input.address2);
        set(&mut c.city, &input.city);
        set(&mut c.state, &input.state);
        set(&mut c.postal_code, &input.postal_code);
        set_opt(&mut c.country, &input.country);
        set_opt(&mut c.email, &input.email);
        set_opt(&mut c.phone, &input.phone);
        set_opt(&mut c.latitude, &input.latitude);
        set_opt(&mut c.longitude, &input.longitude);
        set(&mut c.active, &input.active);
        Ok(Some(c.clone()))
    }
}

pub struct TestServiceAddressRepository {
    store: Arc<TestStore>,
}

impl TestServiceAddressRepository {
    pub fn new(store: Arc<TestStore>) -> Self {
        Self { store }
    }
}

fn sa_matches(tables: &Tables, predicate: &ScopedPredicate, sa: &ServiceAddress) -> bool {
    tables
        .service_address_lineage(sa)
        .is_some_and(|lineage| predicate.matches(&lineage))
}

#[async_trait]
impl ServiceAddressRepository for TestServiceAddressRepository {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<ServiceAddress>> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .service_addresses
            .iter()
            .find(|sa| sa_matches(&tables, predicate, sa))
            .cloned())
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ServiceAddress>> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        let tables = self.store.tables.read().await;
        let rows = tables
            .service_addresses
            .iter()
            .filter(|sa| sa_matches(&tables, predicate, sa))
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .service_addresses
            .iter()
            .filter(|sa| sa_matches(&tables, predicate, sa))
            .count() as i64)
    }

    async fn insert(&self, record: &NewServiceAddress) -> Result<ServiceAddress> {
        let mut tables = self.store.tables.write().await;
        let input = record.fields();
        if let Some(code) = &input.short_code {
            if tables
                .service_addresses
                .iter()
                .any(|sa| sa.short_code.as_ref() == Some(code))
            {
                return Err(AppError::Constraint(format!(
                    "Duplicate entry '{}' for key 'short_code'",
                    code
                )));
            }
        }
        let sa = ServiceAddress {
            id: ServiceAddressId(tables.next_id()),
            customer_id: record.customer_id(),
            service_address_account_number: input.service_address_account_number.clone(),
            address1: input.address1.clone(),
            address2: input.address2.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            postal_code: input.postal_code.clone(),
            country: input.country.clone(),
            phone: input.phone.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
            notes: input.notes.clone(),
            routing_zone: input.routing_zone.clone(),
            product_rate: input.product_rate,
            tax_rate: input.tax_rate,
            management_rate: input.management_rate,
            current_balance: None,
            short_code: input.short_code.clone(),
            coordinates_locked: input.coordinates_locked,
        };
        tables.service_addresses.push(sa.clone());
        Ok(sa)
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateServiceAddressInput,
    ) -> Result<Option<ServiceAddress>> {
        predicate.expect_kind(ResourceKind::ServiceAddress)?;
        let mut tables = self.store.tables.write().await;
        let position = tables
            .service_addresses
            .iter()
            .position(|sa| sa_matches(&tables, predicate, sa));
        let Some(index) = position else {
            return Ok(None);
        };
        let sa = &mut tables.service_addresses[index];
        set(
            &mut sa.service_address_account_number,
            &input.service_address_account_number,
        );
        set(&mut sa.address1, &input.address1);
        set_opt(&mut sa.address2, &input.address2);
        set(&mut sa.city, &input.city);
        set(&mut sa.state, &input.state);
        set(&mut sa.postal_code, &input.postal_code);
        set_opt(&mut sa.country, &input.country);
        set_opt(&mut sa.phone, &input.phone);
        set_opt(&mut sa.latitude, &input.latitude);
        set_opt(&mut sa.longitude, &input.longitude);
        set_opt(&mut sa.notes, &input.notes);
        set_opt(&mut sa.routing_zone, &input.routing_zone);
        set_opt(&mut sa.product_rate, &input.product_rate);
        set_opt(&mut sa.tax_rate, &input.tax_rate);
        set_opt(&mut sa.management_rate, &input.management_rate);
        set_opt(&mut sa.short_code, &input.short_code);
        set_opt(&mut sa.coordinates_locked, &input.coordinates_locked);
        Ok(Some(sa.clone()))
    }
}

pub struct TestTankRepository {
    store: Arc<TestStore>,
}

impl TestTankRepository {
    pub fn new(store: Arc<TestStore>) -> Self {
        Self { store }
    }
}

fn tank_matches(tables: &Tables, predicate: &ScopedPredicate, tank: &Tank) -> bool {
    tables
        .tank_lineage(tank)
        .is_some_and(|lineage| predicate.matches(&lineage))
}

#[async_trait]
impl TankRepository for TestTankRepository {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Tank>> {
        predicate.expect_kind(ResourceKind::Tank)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .tanks
            .iter()
            .find(|t| tank_matches(&tables, predicate, t))
            .cloned())
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Tank>> {
        predicate.expect_kind(ResourceKind::Tank)?;
        let tables = self.store.tables.read().await;
        let rows = tables
            .tanks
            .iter()
            .filter(|t| tank_matches(&tables, predicate, t))
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Tank)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .tanks
            .iter()
            .filter(|t| tank_matches(&tables, predicate, t))
            .count() as i64)
    }

    async fn insert(&self, record: &NewTank) -> Result<Tank> {
        let mut tables = self.store.tables.write().await;
        let input = record.fields();
        let tank = Tank {
            id: TankId(tables.next_id()),
            service_address_id: record.service_address_id(),
            capacity: input.capacity,
            notes: input.notes.clone(),
            usage_billing: input.usage_billing.unwrap_or(false),
            tank_type: input.tank_type.clone(),
            tank_manufacturer: input.tank_manufacturer.clone(),
            serial_number: input.serial_number.clone(),
            manufacture_date: input.manufacture_date,
            install_date: input.install_date,
            last_inspection_date: input.last_inspection_date,
            next_inspection_date: input.next_inspection_date,
            network_id: None,
            receiver_time: None,
            sensor_value: None,
            days_to_empty: None,
        };
        tables.tanks.push(tank.clone());
        Ok(tank)
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateTankInput,
    ) -> Result<Option<Tank>> {
        predicate.expect_kind(ResourceKind::Tank)?;
        let mut tables = self.store.tables.write().await;
        let position = tables
            .tanks
            .iter()
            .position(|t| tank_matches(&tables, predicate, t));
        let Some(index) = position else {
            return Ok(None);
        };
        let t = &mut tables.tanks[index];
        set_opt(&mut t.capacity, &input.capacity);
        set_opt(&mut t.notes, &input.notes);
        set(&mut t.usage_billing, &input.usage_billing);
        set_opt(&mut t.tank_type, &input.tank_type);
        set_opt(&mut t.tank_manufacturer, &input.tank_manufacturer);
        set_opt(&mut t.serial_number, &input.serial_number);
        set_opt(&mut t.manufacture_date, &input.manufacture_date);
        set_opt(&mut t.install_date, &input.install_date);
        set_opt(&mut t.last_inspection_date, &input.last_inspection_date);
        set_opt(&mut t.next_inspection_date, &input.next_inspection_date);
        Ok(Some(t.clone()))
    }
}

pub struct TestMeterRepository {
    store: Arc<TestStore>,
}

impl TestMeterRepository {
    pub fn new(store: Arc<TestStore>) -> Self {
        Self { store }
    }
}

fn meter_matches(tables: &Tables, predicate: &ScopedPredicate, meter: &Meter) -> bool {
    tables
        .meter_lineage(meter)
        .is_some_and(|lineage| predicate.matches(&lineage))
}

#[async_trait]
impl MeterRepository for TestMeterRepository {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Meter>> {
        predicate.expect_kind(ResourceKind::Meter)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .meters
            .iter()
            .find(|m| meter_matches(&tables, predicate, m))
            .cloned())
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Meter>> {
        predicate.expect_kind(ResourceKind::Meter)?;
        let tables = self.store.tables.read().await;
        let rows = tables
            .meters
            .iter()
            .filter(|m| meter_matches(&tables, predicate, m))
            .collect();
        Ok(page(rows, offset, limit))
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Meter)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .meters
            .iter()
            .filter(|m| meter_matches(&tables, predicate, m))
            .count() as i64)
    }

    async fn insert(&self, record: &NewMeter) -> Result<Meter> {
        let mut tables = self.store.tables.write().await;
        let input = record.fields();
        let meter = Meter {
            id: MeterId(tables.next_id()),
            service_address_id: record.service_address_id(),
            meter_current_read: input.meter_current_read.clone(),
            meter_model: input.meter_model.clone(),
            meter_multiplier: input.meter_multiplier,
            meter_pulse_per_rev: input.meter_pulse_per_rev,
            meter_date_installed: input.meter_date_installed,
            meter_serial_number: input.meter_serial_number.clone(),
            network_id: None,
            receiver_time: None,
            sensor_value: None,
            meter_notes: input.meter_notes.clone(),
        };
        tables.meters.push(meter.clone());
        Ok(meter)
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateMeterInput,
    ) -> Result<Option<Meter>> {
        predicate.expect_kind(ResourceKind::Meter)?;
        let mut tables = self.store.tables.write().await;
        let position = tables
            .meters
            .iter()
            .position(|m| meter_matches(&tables, predicate, m));
        let Some(index) = position else {
            return Ok(None);
        };
        let m = &mut tables.meters[index];
        set_opt(&mut m.meter_current_read, &input.meter_current_read);
        set_opt(&mut m.meter_model, &input.meter_model);
        set(&mut m.meter_multiplier, &input.meter_multiplier);
        set(&mut m.meter_pulse_per_rev, &input.meter_pulse_per_rev);
        set_opt(&mut m.meter_date_installed, &input.meter_date_installed);
        set_opt(&mut m.meter_serial_number, &input.meter_serial_number);
        set_opt(&mut m.meter_notes, &input.meter_notes);
        Ok(Some(m.clone()))
    }
}

pub struct TestRadioRepository {
    store: Arc<TestStore>,
}

impl TestRadioRepository {
    pub fn new(store: Arc<TestStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RadioRepository for TestRadioRepository {
    async fn find_one(&self, predicate: &ScopedPredicate) -> Result<Option<Radio>> {
        predicate.expect_kind(ResourceKind::Radio)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .radios
            .iter()
            .find(|r| predicate.matches(&Lineage::radio(r)))
            .cloned())
    }

    async fn find_many(
        &self,
        predicate: &ScopedPredicate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Radio>> {
        predicate.expect_kind(ResourceKind::Radio)?;
        let tables = self.store.tables.read().await;
        let mut rows: Vec<&Radio> = tables
            .radios
            .iter()
            .filter(|r| predicate.matches(&Lineage::radio(r)))
            .collect();
        rows.sort_by_key(|r| r.dealer_radio_id);
        Ok(page(rows, offset, limit))
    }

    async fn count(&self, predicate: &ScopedPredicate) -> Result<i64> {
        predicate.expect_kind(ResourceKind::Radio)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .radios
            .iter()
            .filter(|r| predicate.matches(&Lineage::radio(r)))
            .count() as i64)
    }

    async fn update(
        &self,
        predicate: &ScopedPredicate,
        input: &UpdateRadioInput,
    ) -> Result<Option<Radio>> {
        predicate.expect_kind(ResourceKind::Radio)?;
        let mut tables = self.store.tables.write().await;
        let Some(radio) = tables
            .radios
            .iter_mut()
            .find(|r| predicate.matches(&Lineage::radio(r)))
        else {
            return Ok(None);
        };
        set_opt(&mut radio.notes, &input.notes);
        set(&mut radio.active, &input.active);
        Ok(Some(radio.clone()))
    }
}

/// Revocation store kept in process memory
#[derive(Clone, Default)]
pub struct TestCache {
    revoked: Arc<RwLock<HashSet<String>>>,
    unavailable: Arc<AtomicBool>,
}

impl TestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoked_count(&self) -> usize {
        self.revoked.read().await.len()
    }

    /// Make every store operation fail as if Redis were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AppError::RepositoryUnavailable(
                "session store unreachable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheOperations for TestCache {
    async fn ping(&self) -> Result<()> {
        self.check_available()
    }

    async fn revoke_session(&self, session_id: &str, _ttl: Duration) -> Result<()> {
        self.check_available()?;
        self.revoked.write().await.insert(session_id.to_string());
        Ok(())
    }

    async fn is_session_revoked(&self, session_id: &str) -> Result<bool> {
        self.check_available()?;
        Ok(self.revoked.read().await.contains(session_id))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn test_user(id: i64, username: &str, active: bool) -> User {
    User {
        id: UserId(id),
        username: username.to_string(),
        email: format!("{}@owl.test", username),
        first_name: String::new(),
        last_name: String::new(),
        password: test_password_hash().to_string(),
        is_active: active,
        is_staff: false,
        is_superuser: false,
        last_login: None,
        date_joined: None,
    }
}

pub fn test_dealer(id: DealerId, name: &str) -> Dealer {
    Dealer {
        id,
        dealer_name: name.to_string(),
        address1: "100 Depot Rd".to_string(),
        address2: None,
        city: "Des Moines".to_string(),
        state: "IA".to_string(),
        postal_code: "50309".to_string(),
        country: Some("US".to_string()),
        email: format!("office@{}.test", name.to_lowercase().replace(' ', "-")),
        phone: None,
        timezone: Some("America/Chicago".to_string()),
        website_url: None,
        start_of_billing_cycle: 1,
        logo_image: None,
        color_navbar_top: None,
        color_navbar_bottom: None,
    }
}

fn test_customer(id: CustomerId, dealer_id: DealerId, name: &str) -> Customer {
    Customer {
        id,
        dealer_id,
        account_id: None,
        customer_name: name.to_string(),
        customer_number: None,
        address1: "1 Farm Ln".to_string(),
        address2: None,
        city: "Ames".to_string(),
        state: "IA".to_string(),
        postal_code: "50010".to_string(),
        country: None,
        email: None,
        phone: None,
        latitude: None,
        longitude: None,
        active: true,
    }
}

fn test_service_address(
    id: ServiceAddressId,
    customer_id: CustomerId,
    short_code: &str,
) -> ServiceAddress {
    ServiceAddress {
        id,
        customer_id,
        service_address_account_number: format!("ACCT-{}", id),
        address1: "1 Farm Ln".to_string(),
        address2: None,
        city: "Ames".to_string(),
        state: "IA".to_string(),
        postal_code: "50010".to_string(),
        country: None,
        phone: None,
        latitude: None,
        longitude: None,
        notes: None,
        routing_zone: None,
        product_rate: Some(2.15),
        tax_rate: None,
        management_rate: None,
        current_balance: Some(0.0),
        short_code: Some(short_code.to_string()),
        coordinates_locked: Some(false),
    }
}

fn test_tank(id: TankId, service_address_id: ServiceAddressId) -> Tank {
    Tank {
        id,
        service_address_id,
        capacity: Some(500),
        notes: None,
        usage_billing: false,
        tank_type: Some("above ground".to_string()),
        tank_manufacturer: None,
        serial_number: Some(format!("SN-{}", id)),
        manufacture_date: None,
        install_date: None,
        last_inspection_date: None,
        next_inspection_date: None,
        network_id: None,
        receiver_time: None,
        sensor_value: Some(61.5),
        days_to_empty: Some(40),
    }
}

fn test_meter(id: MeterId, service_address_id: ServiceAddressId) -> Meter {
    Meter {
        id,
        service_address_id,
        meter_current_read: Some("00120".to_string()),
        meter_model: None,
        meter_multiplier: 1,
        meter_pulse_per_rev: 1,
        meter_date_installed: None,
        meter_serial_number: Some(format!("M-{}", id)),
        network_id: None,
        receiver_time: None,
        sensor_value: None,
        meter_notes: None,
    }
}

fn test_radio(id: RadioId, dealer_id: DealerId, dealer_radio_id: i64) -> Radio {
    Radio {
        id,
        dealer_id,
        dealer_radio_id,
        network_id: format!("NET-{}", id),
        radio_type: Some("LTE-M".to_string()),
        firmware_version: None,
        battery_voltage: Some(3.6),
        receiver_time: None,
        tank_id: None,
        meter_id: None,
        notes: None,
        active: true,
    }
}

/// One side of the two-dealer fixture
#[derive(Debug, Clone, Copy)]
pub struct DealerSeed {
    pub dealer: DealerId,
    pub user: UserId,
    pub customer: CustomerId,
    pub service_address: ServiceAddressId,
    pub tank: TankId,
    pub meter: MeterId,
    pub radio: RadioId,
}

/// Two dealers with one full ownership chain each, plus users without a
/// dealer, linked to both dealers, and deactivated.
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub a: DealerSeed,
    pub b: DealerSeed,
    pub unlinked_user: UserId,
    pub ambiguous_user: UserId,
    pub inactive_user: UserId,
}

/// Both dealers number their first radio 100.
pub const SHARED_DEALER_RADIO_ID: i64 = 100;

fn seed_dealer(
    tables: &mut Tables,
    username: &str,
    dealer_name: &str,
    short_code: &str,
) -> DealerSeed {
    let dealer = DealerId(tables.next_id());
    tables.dealers.push(test_dealer(dealer, dealer_name));

    let user = UserId(tables.next_id());
    tables.users.push(test_user(user.get(), username, true));
    tables.dealer_links.push((user, dealer));

    let customer = CustomerId(tables.next_id());
    tables
        .customers
        .push(test_customer(customer, dealer, &format!("{} Farms", dealer_name)));

    let service_address = ServiceAddressId(tables.next_id());
    tables
        .service_addresses
        .push(test_service_address(service_address, customer, short_code));

    let tank = TankId(tables.next_id());
    tables.tanks.push(test_tank(tank, service_address));

    let meter = MeterId(tables.next_id());
    tables.meters.push(test_meter(meter, service_address));

    let radio = RadioId(tables.next_id());
    tables
        .radios
        .push(test_radio(radio, dealer, SHARED_DEALER_RADIO_ID));

    DealerSeed {
        dealer,
        user,
        customer,
        service_address,
        tank,
        meter,
        radio,
    }
}

pub async fn seed_two_dealers(store: &TestStore) -> Seed {
    let mut tables = store.tables.write().await;
    let a = seed_dealer(&mut tables, "alice", "North Propane", "NP-001");
    let b = seed_dealer(&mut tables, "bob", "South Gas", "SG-001");

    let unlinked_user = UserId(tables.next_id());
    tables
        .users
        .push(test_user(unlinked_user.get(), "carol", true));

    let ambiguous_user = UserId(tables.next_id());
    tables
        .users
        .push(test_user(ambiguous_user.get(), "dave", true));
    tables.dealer_links.push((ambiguous_user, a.dealer));
    tables.dealer_links.push((ambiguous_user, b.dealer));

    let inactive_user = UserId(tables.next_id());
    tables
        .users
        .push(test_user(inactive_user.get(), "erin", false));
    tables.dealer_links.push((inactive_user, a.dealer));

    Seed {
        a,
        b,
        unlinked_user,
        ambiguous_user,
        inactive_user,
    }
}
