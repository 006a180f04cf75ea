//! Pick ticket synchronization
//!
//! A shipped pick ticket becomes a parcel announcement at the carrier. The
//! converter normalizes weights to kilograms, parses the packed dimensions
//! string, sanitizes the contact phone number, and selects the shipping
//! method for the destination country (operator mapping first, then the
//! configured default). Creation is gated on the ticket being shipped.

use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::clients::sendcloud::{
    CarrierApi, ParcelItem, ParcelItemProperties, ParcelPayload, ParcelRequest, ShipmentRef,
};
use crate::entities::mutations::{EntityKind, Method, Trigger};
use crate::entities::{cached_shipping_methods, country_mappings, prelude::*};
use crate::error::SyncError;
use crate::models::source;
use crate::services::{bookings, linkage, mutations, record_failure, SyncOutcome};

const GRAMS_PER_KG: f64 = 1000.0;
const KG_PER_OUNCE: f64 = 0.028_349_52;
const KG_PER_POUND: f64 = 0.453_592_4;
/// The carrier rejects a zero weight.
const MIN_WEIGHT_KG: f64 = 0.001;

/// Countries for which the carrier requires a state/province code.
const COUNTRIES_WITH_STATE: [&str; 3] = ["US", "IT", "CA"];

/// Parcels are announced without requesting a label; the warehouse does that
/// manually once the box is actually packed.
const CUSTOMS_SHIPPING_TYPE_COMMERCIAL_GOODS: i32 = 2;

lazy_static! {
    static ref DIMENSIONS_RE: Regex =
        Regex::new(r"(?i)^\s*(?P<width>\d+)\s*x\s*(?P<length>\d+)\s*x\s*(?P<height>\d+)\s*$")
            .unwrap();
}

pub fn convert_weight_to_kg(weight: f64, unit: &str) -> f64 {
    let kg = match unit.to_lowercase().as_str() {
        "g" | "gr" | "grams" => weight / GRAMS_PER_KG,
        "oz" | "ounces" => weight * KG_PER_OUNCE,
        "lb" | "lbs" | "pounds" => weight * KG_PER_POUND,
        _ => weight,
    };
    kg.max(MIN_WEIGHT_KG)
}

fn format_weight(kg: f64) -> String {
    format!("{:.3}", kg)
}

/// Parse a packed "W x L x H" dimension string (centimeters).
pub fn convert_dimensions(dimensions: &str) -> Option<(i32, i32, i32)> {
    let captures = DIMENSIONS_RE.captures(dimensions)?;
    let width = captures.name("width")?.as_str().parse().ok()?;
    let length = captures.name("length")?.as_str().parse().ok()?;
    let height = captures.name("height")?.as_str().parse().ok()?;
    Some((width, length, height))
}

/// Keep only digits; the carrier rejects phone numbers over 20 characters,
/// in which case the number is dropped rather than failing the parcel.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || digits.len() > 20 {
        None
    } else {
        Some(digits)
    }
}

/// First non-empty line becomes the address; any remaining lines are joined
/// into the second address field.
pub fn split_address_lines(address: &source::Address) -> Result<(String, String), SyncError> {
    let lines: Vec<&str> = [&address.line_1, &address.line_2, &address.line_3]
        .into_iter()
        .filter_map(|l| l.as_deref())
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    match lines.split_first() {
        Some((first, rest)) => Ok((first.to_string(), rest.join(" - "))),
        None => Err(SyncError::EmptyAddress),
    }
}

fn state_for(country: &str, state: Option<&str>) -> Option<String> {
    if COUNTRIES_WITH_STATE.contains(&country.to_uppercase().as_str()) {
        state.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
    } else {
        None
    }
}

fn build_parcel_items(line_items: &[source::LineItem]) -> Vec<ParcelItem> {
    let mut items = Vec::new();
    for line_item in line_items {
        let unit_weight_kg = convert_weight_to_kg(
            line_item.weight.unwrap_or(0.0),
            line_item.weight_unit.as_deref().unwrap_or("g"),
        );
        for quantity in &line_item.line_quantities {
            if quantity.quantity <= 0 {
                continue;
            }
            items.push(ParcelItem {
                description: line_item.product_name.clone(),
                quantity: quantity.quantity,
                sku: quantity.sku_id.to_string(),
                weight: format_weight(unit_weight_kg),
                value: bookings::format_amount(line_item.unit_price),
                product_id: line_item.product_id.to_string(),
                properties: ParcelItemProperties {
                    color: line_item.color.clone().unwrap_or_default(),
                    size: quantity.size.clone().unwrap_or_default(),
                },
            });
        }
    }
    items
}

fn total_weight_kg(pick_ticket: &source::PickTicket) -> f64 {
    if let Some(gross) = pick_ticket.gross_weight {
        return convert_weight_to_kg(gross, &pick_ticket.gross_weight_unit);
    }
    let summed: f64 = pick_ticket
        .line_items
        .iter()
        .map(|item| {
            let quantity: i64 = item.line_quantities.iter().map(|q| q.quantity).sum();
            convert_weight_to_kg(
                item.weight.unwrap_or(0.0),
                item.weight_unit.as_deref().unwrap_or("g"),
            ) * quantity as f64
        })
        .sum();
    summed.max(MIN_WEIGHT_KG)
}

/// Pick the shipping method for a destination: an operator country mapping
/// wins, otherwise the configured default method by name.
pub async fn select_shipping_method(
    db: &DatabaseConnection,
    country_code: &str,
    default_method: Option<&str>,
) -> Result<cached_shipping_methods::Model, SyncError> {
    let mapping = CountryMappings::find()
        .filter(country_mappings::Column::CountryCode.eq(country_code.to_uppercase()))
        .one(db)
        .await?;
    if let Some(mapping) = mapping {
        if let Some(method_id) = mapping.shipping_method_id {
            if let Some(method) = CachedShippingMethods::find_by_id(method_id).one(db).await? {
                return Ok(method);
            }
        }
    }

    let Some(default_name) = default_method else {
        return Err(SyncError::MissingShippingMethod);
    };
    CachedShippingMethods::find()
        .filter(cached_shipping_methods::Column::Name.eq(default_name))
        .one(db)
        .await?
        .ok_or_else(|| SyncError::UnknownShippingMethod(default_name.to_string()))
}

pub async fn build_parcel_payload(
    db: &DatabaseConnection,
    pick_ticket: &source::PickTicket,
    default_method: Option<&str>,
) -> Result<ParcelRequest, SyncError> {
    let (address, address_2) = split_address_lines(&pick_ticket.address)?;
    let country = pick_ticket.address.country.to_uppercase();
    let method = select_shipping_method(db, &country, default_method).await?;

    let dimensions = pick_ticket
        .dimensions
        .as_deref()
        .and_then(convert_dimensions);

    let company_name: String = pick_ticket.customer_name.chars().take(50).collect();

    Ok(ParcelRequest {
        parcel: ParcelPayload {
            id: None,
            name: pick_ticket
                .contact_name
                .clone()
                .unwrap_or_else(|| pick_ticket.customer_name.clone()),
            company_name,
            email: pick_ticket.contact_email.clone(),
            telephone: pick_ticket
                .contact_phone
                .as_deref()
                .and_then(normalize_phone),
            address,
            address_2,
            order_number: pick_ticket.order_number.to_string(),
            city: pick_ticket.address.city.clone().unwrap_or_default(),
            country: country.clone(),
            postal_code: pick_ticket.address.postcode.clone().unwrap_or_default(),
            country_state: state_for(&country, pick_ticket.address.state.as_deref()),
            parcel_items: build_parcel_items(&pick_ticket.line_items),
            weight: format_weight(total_weight_kg(pick_ticket)),
            length: dimensions.map(|(_, l, _)| l),
            width: dimensions.map(|(w, _, _)| w),
            height: dimensions.map(|(_, _, h)| h),
            total_order_value: bookings::format_amount(pick_ticket.grand_total),
            total_order_value_currency: pick_ticket.currency.clone(),
            customs_shipping_type: CUSTOMS_SHIPPING_TYPE_COMMERCIAL_GOODS,
            is_return: false,
            shipment: ShipmentRef {
                id: method.remote_id,
                name: method.name,
            },
            request_label: false,
        },
    })
}

fn is_shipped(pick_ticket: &source::PickTicket) -> bool {
    pick_ticket.status.eq_ignore_ascii_case("shipped")
}

pub async fn try_create_pick_ticket(
    db: &DatabaseConnection,
    carrier: &impl CarrierApi,
    pick_ticket: &source::PickTicket,
    default_method: Option<&str>,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_pick_ticket(db, pick_ticket).await?;

    if !is_shipped(pick_ticket) {
        return record_failure(
            db,
            EntityKind::PickTicket,
            entity.id,
            Method::Create,
            trigger,
            format!(
                "Pick ticket {} is not in shipped status (status: {})",
                pick_ticket.id, pick_ticket.status
            ),
        )
        .await;
    }

    let payload = match build_parcel_payload(db, pick_ticket, default_method).await {
        Ok(payload) => payload,
        Err(e) => {
            return record_failure(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Create,
                trigger,
                format!(
                    "A synchronization error occurred for pick ticket {}: {}",
                    pick_ticket.id, e
                ),
            )
            .await;
        }
    };

    match carrier.create_parcel(&payload).await {
        Ok(parcel) => {
            if !linkage::set_pick_ticket_remote_id(db, entity.id, &parcel.id.to_string()).await? {
                tracing::warn!(
                    "Pick ticket {} was linked concurrently; keeping the stored remote id",
                    pick_ticket.id
                );
            }
            mutations::record(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Create,
                trigger,
                true,
                None,
            )
            .await?;
            tracing::info!("Successfully synchronized pick ticket {}", pick_ticket.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Create,
                trigger,
                format!(
                    "An error occurred while announcing a parcel for pick ticket {}: {}",
                    pick_ticket.id, e
                ),
            )
            .await
        }
    }
}

pub async fn try_update_pick_ticket(
    db: &DatabaseConnection,
    carrier: &impl CarrierApi,
    pick_ticket: &source::PickTicket,
    default_method: Option<&str>,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_pick_ticket(db, pick_ticket).await?;
    let entity = linkage::refresh_pick_ticket_display(db, entity, pick_ticket).await?;

    let Some(remote_id) = entity.remote_id.clone() else {
        return record_failure(
            db,
            EntityKind::PickTicket,
            entity.id,
            Method::Update,
            trigger,
            format!(
                "Unable to update pick ticket {} because it has no remote id",
                pick_ticket.id
            ),
        )
        .await;
    };
    let Ok(parcel_id) = remote_id.parse::<i64>() else {
        return record_failure(
            db,
            EntityKind::PickTicket,
            entity.id,
            Method::Update,
            trigger,
            format!(
                "Stored remote id '{}' for pick ticket {} is not a parcel id",
                remote_id, pick_ticket.id
            ),
        )
        .await;
    };

    let mut payload = match build_parcel_payload(db, pick_ticket, default_method).await {
        Ok(payload) => payload,
        Err(e) => {
            return record_failure(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Update,
                trigger,
                format!(
                    "A synchronization error occurred for pick ticket {}: {}",
                    pick_ticket.id, e
                ),
            )
            .await;
        }
    };
    payload.parcel.id = Some(parcel_id);

    match carrier.update_parcel(&payload).await {
        Ok(()) => {
            mutations::record(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Update,
                trigger,
                true,
                None,
            )
            .await?;
            tracing::info!("Successfully updated pick ticket {}", pick_ticket.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Update,
                trigger,
                format!(
                    "An error occurred while updating the parcel for pick ticket {}: {}",
                    pick_ticket.id, e
                ),
            )
            .await
        }
    }
}

/// Cancel the remote parcel; the stored remote id stays in place.
pub async fn try_delete_pick_ticket(
    db: &DatabaseConnection,
    carrier: &impl CarrierApi,
    pick_ticket: &source::PickTicket,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    let entity = linkage::get_or_create_pick_ticket(db, pick_ticket).await?;

    let Some(remote_id) = entity.remote_id.clone() else {
        return record_failure(
            db,
            EntityKind::PickTicket,
            entity.id,
            Method::Delete,
            trigger,
            format!(
                "Unable to cancel the parcel for pick ticket {} because it has no remote id",
                pick_ticket.id
            ),
        )
        .await;
    };

    match carrier.cancel_parcel(&remote_id).await {
        Ok(()) => {
            mutations::record(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Delete,
                trigger,
                true,
                None,
            )
            .await?;
            tracing::info!("Successfully cancelled parcel for pick ticket {}", pick_ticket.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => {
            record_failure(
                db,
                EntityKind::PickTicket,
                entity.id,
                Method::Delete,
                trigger,
                format!(
                    "An error occurred while cancelling the parcel for pick ticket {}: {}",
                    pick_ticket.id, e
                ),
            )
            .await
        }
    }
}
