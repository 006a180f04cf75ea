//! Source-system document shapes
//!
//! These mirror the wholesale ERP's JSON payloads as delivered by webhooks
//! and the list/detail endpoints. Monetary fields deserialize straight into
//! `Decimal` so no binary-float arithmetic happens downstream.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i32,
    pub invoice_number: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items_total: Decimal,
    pub items_tax: Decimal,
    pub grand_total: Decimal,
    pub shipping_cost: Decimal,
    pub shipping_tax: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    pub order_number: String,
    pub customer_name: String,
    pub company_id: i32,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditNote {
    pub id: i32,
    pub credit_note_number: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items_total: Decimal,
    pub items_tax: Decimal,
    pub grand_total: Decimal,
    #[serde(default)]
    pub freeform_amount: Option<Decimal>,
    #[serde(default)]
    pub freeform_description: Option<String>,
    #[serde(default)]
    pub freeform_tax: Option<Decimal>,
    pub order_number: i64,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickTicket {
    pub id: i32,
    pub shipment_number: i32,
    #[serde(default)]
    pub order_id: Option<i32>,
    pub sale_id: i32,
    pub order_number: i64,
    pub customer_id: i32,
    pub customer_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    pub address: Address,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub gross_weight: Option<f64>,
    pub gross_weight_unit: String,
    pub status: String,
    pub grand_total: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub tax_level: Decimal,
    pub unit_price: Decimal,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub weight_unit: Option<String>,
    pub line_quantities: Vec<LineQuantity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineQuantity {
    pub id: i64,
    #[serde(default)]
    pub size: Option<String>,
    pub quantity: i64,
    pub sku_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line_1: Option<String>,
    #[serde(default)]
    pub line_2: Option<String>,
    #[serde(default)]
    pub line_3: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
    #[serde(default)]
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub vat_number: Option<String>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub addresses: Vec<CustomerAddress>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_1: Option<String>,
    #[serde(default)]
    pub buyer: bool,
    #[serde(default)]
    pub shipping: bool,
    #[serde(default)]
    pub billing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAddress {
    pub id: i64,
    #[serde(default)]
    pub line_1: Option<String>,
    #[serde(default)]
    pub line_2: Option<String>,
    #[serde(default)]
    pub line_3: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub default_for_shipping: bool,
    #[serde(default)]
    pub default_for_billing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub company_id: i32,
    pub order_number: i64,
}

/// One page of a paginated source-system list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub objects: Vec<T>,
    pub next_page: Option<u32>,
}
