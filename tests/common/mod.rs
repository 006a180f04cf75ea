//! Shared test fixture: in-memory SQLite with the real migrations applied,
//! plus in-memory fakes for the three remote APIs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use wholesale_sync::clients::sendcloud::{
    CarrierApi, CreatedParcel, ParcelRequest, RemoteShippingMethod,
};
use wholesale_sync::clients::snelstart::{
    BookingPayload, CreatedBooking, LedgerApi, RelationPayload, RemoteCountry,
    RemoteLedgerAccount, RemoteRelation, RemoteTaxRate,
};
use wholesale_sync::clients::uphance::SourceApi;
use wholesale_sync::entities::{cached_shipping_methods, tax_mappings};
use wholesale_sync::error::ApiError;
use wholesale_sync::models::source;

pub async fn setup_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("failed to open in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("migrations failed");
    db
}

pub async fn seed_tax_mapping(db: &DatabaseConnection, tax_amount: f64, name: &str) {
    tax_mappings::ActiveModel {
        tax_amount: Set(tax_amount),
        name: Set(name.to_string()),
        ledger_account_id: Set("acct-products".to_string()),
        shipping_ledger_account_id: Set("acct-shipping".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to seed tax mapping");
}

pub async fn seed_shipping_method(
    db: &DatabaseConnection,
    remote_id: i64,
    name: &str,
) -> cached_shipping_methods::Model {
    cached_shipping_methods::ActiveModel {
        remote_id: Set(remote_id),
        name: Set(name.to_string()),
        carrier: Set("postnl".to_string()),
        min_weight: Set(0.001),
        max_weight: Set(30.0),
        price: Set(6.25),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to seed shipping method")
}

fn unavailable(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!("{} not available in this test", what),
    }
}

// ---------------------------------------------------------------------------
// Source system fake

#[derive(Default)]
pub struct FakeSource {
    pub customers: Mutex<HashMap<i32, source::Customer>>,
    pub orders: Mutex<Vec<source::Order>>,
}

impl FakeSource {
    pub fn with_customer(customer: source::Customer) -> Self {
        let fake = Self::default();
        fake.customers
            .lock()
            .unwrap()
            .insert(customer.id, customer);
        fake
    }
}

#[async_trait]
impl SourceApi for FakeSource {
    async fn get_invoice(&self, _id: i32) -> Result<source::Invoice, ApiError> {
        Err(unavailable("invoice"))
    }

    async fn get_credit_note(&self, _id: i32) -> Result<source::CreditNote, ApiError> {
        Err(unavailable("credit note"))
    }

    async fn get_pick_ticket(&self, _id: i32) -> Result<source::PickTicket, ApiError> {
        Err(unavailable("pick ticket"))
    }

    async fn get_customer(&self, id: i32) -> Result<source::Customer, ApiError> {
        self.customers
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| unavailable("customer"))
    }

    async fn get_orders_by_number(
        &self,
        order_number: i64,
    ) -> Result<Vec<source::Order>, ApiError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.order_number == order_number)
            .cloned()
            .collect())
    }

    async fn list_customers(&self, _page: u32) -> Result<source::Page<source::Customer>, ApiError> {
        let mut customers: Vec<source::Customer> =
            self.customers.lock().unwrap().values().cloned().collect();
        customers.sort_by_key(|c| c.id);
        Ok(source::Page {
            objects: customers,
            next_page: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Ledger system fake

#[derive(Default)]
pub struct FakeLedger {
    pub search_results: Mutex<Vec<RemoteRelation>>,
    pub created_bookings: Mutex<Vec<BookingPayload>>,
    pub updated_bookings: Mutex<Vec<String>>,
    pub deleted_bookings: Mutex<Vec<String>>,
    pub created_relations: Mutex<Vec<RelationPayload>>,
    pub tax_rates: Mutex<Vec<RemoteTaxRate>>,
    pub fail_bookings: AtomicBool,
    pub fail_lists: AtomicBool,
    counter: AtomicU32,
}

impl FakeLedger {
    pub fn set_fail_bookings(&self, fail: bool) {
        self.fail_bookings.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn set_search_results(&self, relations: Vec<RemoteRelation>) {
        *self.search_results.lock().unwrap() = relations;
    }

    pub fn set_tax_rates(&self, rates: Vec<RemoteTaxRate>) {
        *self.tax_rates.lock().unwrap() = rates;
    }

    fn next(&self) -> u32 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub fn remote_relation(id: &str, name: &str) -> RemoteRelation {
    RemoteRelation {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
    }
}

pub fn remote_tax_rate(id: &str, name: &str, percentage: f64) -> RemoteTaxRate {
    RemoteTaxRate {
        id: id.to_string(),
        name: name.to_string(),
        percentage,
        valid_from: Utc::now().naive_utc(),
        valid_until: None,
    }
}

#[async_trait]
impl LedgerApi for FakeLedger {
    async fn create_booking(&self, payload: &BookingPayload) -> Result<CreatedBooking, ApiError> {
        if self.fail_bookings.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "booking rejected".to_string(),
            });
        }
        self.created_bookings.lock().unwrap().push(payload.clone());
        Ok(CreatedBooking {
            id: format!("booking-{}", self.next()),
        })
    }

    async fn update_booking(&self, id: &str, _payload: &BookingPayload) -> Result<(), ApiError> {
        if self.fail_bookings.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "booking rejected".to_string(),
            });
        }
        self.updated_bookings.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn delete_booking(&self, id: &str) -> Result<(), ApiError> {
        if self.fail_bookings.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "booking rejected".to_string(),
            });
        }
        self.deleted_bookings.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn search_relations(&self, _name: &str) -> Result<Vec<RemoteRelation>, ApiError> {
        Ok(self.search_results.lock().unwrap().clone())
    }

    async fn create_relation(&self, payload: &RelationPayload) -> Result<RemoteRelation, ApiError> {
        self.created_relations.lock().unwrap().push(payload.clone());
        Ok(RemoteRelation {
            id: format!("relation-{}", self.next()),
            name: payload.name.clone(),
            email: payload.email.clone(),
        })
    }

    async fn update_relation(
        &self,
        id: &str,
        payload: &RelationPayload,
    ) -> Result<RemoteRelation, ApiError> {
        Ok(RemoteRelation {
            id: id.to_string(),
            name: payload.name.clone(),
            email: payload.email.clone(),
        })
    }

    async fn list_tax_rates(&self) -> Result<Vec<RemoteTaxRate>, ApiError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                body: "list unavailable".to_string(),
            });
        }
        Ok(self.tax_rates.lock().unwrap().clone())
    }

    async fn list_accounts(&self) -> Result<Vec<RemoteLedgerAccount>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_countries(&self) -> Result<Vec<RemoteCountry>, ApiError> {
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Carrier system fake

#[derive(Default)]
pub struct FakeCarrier {
    pub created_parcels: Mutex<Vec<ParcelRequest>>,
    pub updated_parcels: Mutex<Vec<ParcelRequest>>,
    pub cancelled_parcels: Mutex<Vec<String>>,
    pub shipping_methods: Mutex<Vec<RemoteShippingMethod>>,
    pub fail_parcels: AtomicBool,
    counter: AtomicU32,
}

impl FakeCarrier {
    pub fn set_fail_parcels(&self, fail: bool) {
        self.fail_parcels.store(fail, Ordering::SeqCst);
    }

    pub fn set_shipping_methods(&self, methods: Vec<RemoteShippingMethod>) {
        *self.shipping_methods.lock().unwrap() = methods;
    }
}

#[async_trait]
impl CarrierApi for FakeCarrier {
    async fn create_parcel(&self, payload: &ParcelRequest) -> Result<CreatedParcel, ApiError> {
        if self.fail_parcels.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "parcel rejected".to_string(),
            });
        }
        self.created_parcels.lock().unwrap().push(payload.clone());
        let id = self.counter.fetch_add(1, Ordering::SeqCst) as i64 + 9000;
        Ok(CreatedParcel { id })
    }

    async fn update_parcel(&self, payload: &ParcelRequest) -> Result<(), ApiError> {
        if self.fail_parcels.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "parcel rejected".to_string(),
            });
        }
        self.updated_parcels.lock().unwrap().push(payload.clone());
        Ok(())
    }

    async fn cancel_parcel(&self, id: &str) -> Result<(), ApiError> {
        self.cancelled_parcels.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn list_shipping_methods(&self) -> Result<Vec<RemoteShippingMethod>, ApiError> {
        Ok(self.shipping_methods.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Sample documents

pub fn sample_customer(id: i32) -> source::Customer {
    source::Customer {
        id,
        name: "Acme Fashion BV".to_string(),
        country: Some("NL".to_string()),
        city: Some("Amsterdam".to_string()),
        vat_number: Some("NL 8043.21.823.B01".to_string()),
        people: vec![source::Person {
            id: 1,
            first_name: "Pat".to_string(),
            last_name: "Billing".to_string(),
            email: Some("billing@acme.example".to_string()),
            phone_1: None,
            buyer: false,
            shipping: false,
            billing: true,
        }],
        addresses: Vec::new(),
    }
}

pub fn sample_line_item() -> source::LineItem {
    source::LineItem {
        id: 1,
        product_id: 100,
        product_name: "Jacket".to_string(),
        color: Some("Navy".to_string()),
        tax_level: dec!(21),
        unit_price: dec!(10.00),
        weight: Some(400.0),
        weight_unit: Some("g".to_string()),
        line_quantities: vec![source::LineQuantity {
            id: 1,
            size: Some("M".to_string()),
            quantity: 2,
            sku_id: 500,
        }],
    }
}

pub fn sample_invoice(id: i32, company_id: i32) -> source::Invoice {
    source::Invoice {
        id,
        invoice_number: 2026000 + id as i64,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
        items_total: dec!(20.00),
        items_tax: dec!(4.20),
        grand_total: dec!(24.20),
        shipping_cost: dec!(0),
        shipping_tax: dec!(0),
        currency: Some("EUR".to_string()),
        payment_terms: Some("30 days".to_string()),
        order_number: "SO-1001".to_string(),
        customer_name: "Acme Fashion BV".to_string(),
        company_id,
        line_items: vec![sample_line_item()],
    }
}

pub fn sample_credit_note(id: i32, order_number: i64) -> source::CreditNote {
    source::CreditNote {
        id,
        credit_note_number: 900000 + id as i64,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
        items_total: dec!(20.00),
        items_tax: dec!(4.20),
        grand_total: dec!(24.20),
        freeform_amount: None,
        freeform_description: None,
        freeform_tax: None,
        order_number,
        line_items: vec![sample_line_item()],
    }
}

pub fn sample_pick_ticket(id: i32, status: &str) -> source::PickTicket {
    source::PickTicket {
        id,
        shipment_number: 77,
        order_id: Some(42),
        sale_id: 11,
        order_number: 1001,
        customer_id: 5,
        customer_name: "Acme Fashion BV".to_string(),
        contact_name: Some("Pat Billing".to_string()),
        contact_email: Some("billing@acme.example".to_string()),
        contact_phone: Some("+31 6 1234 5678".to_string()),
        address: source::Address {
            line_1: Some("Main Street 1".to_string()),
            line_2: None,
            line_3: None,
            city: Some("Amsterdam".to_string()),
            state: None,
            country: "NL".to_string(),
            postcode: Some("1011AB".to_string()),
        },
        dimensions: Some("30x40x20".to_string()),
        gross_weight: Some(800.0),
        gross_weight_unit: "g".to_string(),
        status: status.to_string(),
        grand_total: dec!(24.20),
        currency: Some("EUR".to_string()),
        line_items: vec![sample_line_item()],
    }
}
