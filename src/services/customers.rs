//! Customer to ledger relation synchronization
//!
//! A customer with a stored remote id is updated in place. Without one, the
//! ledger is searched by exact (normalized) name: no match creates a new
//! relation, a single match is adopted, and multiple matches are a hard
//! failure that leaves the linkage row unlinked for an operator to resolve.
//! Every invocation writes exactly one mutation record for the customer;
//! document flows that embed this call record their own mutation on top.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::clients::snelstart::{
    CountryRef, LedgerApi, RelationAddress, RelationPayload, RemoteRelation,
};
use crate::entities::mutations::{EntityKind, Method, Trigger};
use crate::entities::{cached_countries, country_mappings, customers, prelude::*};
use crate::error::SyncError;
use crate::models::source;
use crate::services::{linkage, mutations, SyncOutcome};

/// The ledger caps relation names at 50 characters.
const MAX_RELATION_NAME_LEN: usize = 50;

pub fn normalize_relation_name(name: &str) -> String {
    name.trim().chars().take(MAX_RELATION_NAME_LEN).collect()
}

/// Strip formatting characters from a VAT number and make sure it carries the
/// country prefix the ledger expects. Empty input normalizes to `None`.
pub fn normalize_tax_number(vat_number: Option<&str>, country_code: Option<&str>) -> Option<String> {
    let stripped: String = vat_number?
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-'))
        .collect();
    if stripped.is_empty() {
        return None;
    }

    match country_code.map(str::to_uppercase).filter(|c| !c.is_empty()) {
        Some(prefix) if !stripped.to_uppercase().starts_with(&prefix) => {
            Some(format!("{}{}", prefix, stripped))
        }
        _ => Some(stripped),
    }
}

/// The billing contact, falling back to the first listed person.
pub fn billing_contact(people: &[source::Person]) -> Option<&source::Person> {
    people.iter().find(|p| p.billing).or_else(|| people.first())
}

fn billing_address(addresses: &[source::CustomerAddress]) -> Option<&source::CustomerAddress> {
    addresses
        .iter()
        .find(|a| a.default_for_billing)
        .or_else(|| addresses.first())
}

/// Resolve a two-letter country code to a cached ledger country id. An
/// operator mapping takes precedence; otherwise the code must match exactly
/// one cached country or no country is attached at all.
async fn resolve_ledger_country(
    db: &DatabaseConnection,
    country_code: &str,
) -> Result<Option<String>, DbErr> {
    let code = country_code.trim().to_uppercase();
    if code.is_empty() {
        return Ok(None);
    }

    let mapping = CountryMappings::find()
        .filter(country_mappings::Column::CountryCode.eq(&code))
        .one(db)
        .await?;
    if let Some(mapping) = mapping {
        if let Some(ledger_country_id) = mapping.ledger_country_id {
            if let Some(country) = CachedCountries::find_by_id(ledger_country_id).one(db).await? {
                return Ok(Some(country.remote_id));
            }
        }
    }

    let matches = CachedCountries::find()
        .filter(cached_countries::Column::CountryCode.eq(&code))
        .all(db)
        .await?;
    match matches.as_slice() {
        [country] => Ok(Some(country.remote_id.clone())),
        _ => Ok(None),
    }
}

async fn convert_relation_address(
    db: &DatabaseConnection,
    customer: &source::Customer,
) -> Result<Option<RelationAddress>, DbErr> {
    let Some(address) = billing_address(&customer.addresses) else {
        return Ok(None);
    };
    let Some(country_code) = address.country.as_deref().or(customer.country.as_deref()) else {
        return Ok(None);
    };
    let Some(country_id) = resolve_ledger_country(db, country_code).await? else {
        return Ok(None);
    };

    let contact_person = billing_contact(&customer.people)
        .map(|p| format!("{} {}", p.first_name, p.last_name))
        .unwrap_or_else(|| customer.name.clone());

    Ok(Some(RelationAddress {
        contact_person,
        street: address.line_1.clone(),
        postcode: address.postcode.clone(),
        city: address.city.clone().or_else(|| customer.city.clone()),
        country: CountryRef { id: country_id },
    }))
}

pub async fn build_relation_payload(
    db: &DatabaseConnection,
    customer: &source::Customer,
) -> Result<RelationPayload, SyncError> {
    let address = convert_relation_address(db, customer).await?;
    let country_code = customer
        .country
        .as_deref()
        .or_else(|| billing_address(&customer.addresses).and_then(|a| a.country.as_deref()));

    Ok(RelationPayload {
        relation_kinds: vec!["Klant".to_string()],
        name: normalize_relation_name(&customer.name),
        address,
        tax_number: normalize_tax_number(customer.vat_number.as_deref(), country_code),
        email: billing_contact(&customer.people).and_then(|p| p.email.clone()),
    })
}

/// Synchronize one customer to the ledger and return the remote relation.
/// Writes exactly one mutation record, whichever branch is taken.
pub async fn match_or_create_relation(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
    customer: &source::Customer,
    trigger: Trigger,
) -> Result<RemoteRelation, SyncError> {
    let entity = linkage::get_or_create_customer(db, customer).await?;
    let method = if entity.remote_id.is_some() {
        Method::Update
    } else {
        Method::Create
    };

    let result = synchronize_relation(db, ledger, customer, &entity).await;
    match &result {
        Ok(_) => {
            mutations::record(db, EntityKind::Customer, entity.id, method, trigger, true, None)
                .await?;
        }
        Err(e) => {
            mutations::record(
                db,
                EntityKind::Customer,
                entity.id,
                method,
                trigger,
                false,
                Some(e.to_string()),
            )
            .await?;
        }
    }
    result
}

async fn synchronize_relation(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
    customer: &source::Customer,
    entity: &customers::Model,
) -> Result<RemoteRelation, SyncError> {
    let payload = build_relation_payload(db, customer).await?;

    if let Some(remote_id) = &entity.remote_id {
        let relation = ledger.update_relation(remote_id, &payload).await.map_err(|e| {
            SyncError::api(
                format!(
                    "An error occurred while updating the relation for customer {}",
                    customer.id
                ),
                e,
            )
        })?;
        linkage::refresh_customer_names(db, entity.clone(), &customer.name, Some(&relation.name))
            .await?;
        return Ok(relation);
    }

    let matches = ledger.search_relations(&payload.name).await.map_err(|e| {
        SyncError::api(
            format!(
                "An error occurred while searching relations for customer {}",
                customer.id
            ),
            e,
        )
    })?;

    match matches.len() {
        0 => {
            let relation = ledger.create_relation(&payload).await.map_err(|e| {
                SyncError::api(
                    format!(
                        "An error occurred while creating the relation for customer {}",
                        customer.id
                    ),
                    e,
                )
            })?;
            adopt_relation(db, entity, customer, &relation).await?;
            Ok(relation)
        }
        1 => {
            let relation = matches.into_iter().next().ok_or_else(|| {
                SyncError::Other("relation match disappeared".to_string())
            })?;

            // A remote relation may only back one local customer.
            let claimed = Customers::find()
                .filter(customers::Column::RemoteId.eq(&relation.id))
                .one(db)
                .await?;
            if claimed.map(|c| c.id != entity.id).unwrap_or(false) {
                return Err(SyncError::RemoteIdAlreadyClaimed(relation.id));
            }

            adopt_relation(db, entity, customer, &relation).await?;
            Ok(relation)
        }
        _ => Err(SyncError::AmbiguousCustomerMatch(payload.name)),
    }
}

async fn adopt_relation(
    db: &DatabaseConnection,
    entity: &customers::Model,
    customer: &source::Customer,
    relation: &RemoteRelation,
) -> Result<(), SyncError> {
    if !linkage::set_customer_remote_id(db, entity.id, &relation.id).await? {
        tracing::warn!(
            "Customer {} was linked concurrently; keeping the stored remote id",
            customer.id
        );
    }
    linkage::refresh_customer_names(db, entity.clone(), &customer.name, Some(&relation.name))
        .await?;
    Ok(())
}

/// Standalone customer synchronization (webhooks and the manual command).
/// Business failures become a failed outcome; the mutation record has
/// already been written by `match_or_create_relation`.
pub async fn try_synchronize_customer(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
    customer: &source::Customer,
    trigger: Trigger,
) -> Result<SyncOutcome, DbErr> {
    match match_or_create_relation(db, ledger, customer, trigger).await {
        Ok(_) => {
            tracing::info!("Successfully synchronized customer {}", customer.id);
            Ok(SyncOutcome::Synchronized)
        }
        Err(e) => Ok(SyncOutcome::Failed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_relation_name_to_fifty_chars() {
        let long = "A".repeat(80);
        assert_eq!(normalize_relation_name(&long).len(), 50);
        assert_eq!(normalize_relation_name("  Acme BV  "), "Acme BV");
    }

    #[test]
    fn normalizes_tax_numbers() {
        assert_eq!(
            normalize_tax_number(Some("NL 8043.21.823.B01"), Some("NL")),
            Some("NL804321823B01".to_string())
        );
        // Prefix is added when missing.
        assert_eq!(
            normalize_tax_number(Some("8043-21-823-B01"), Some("nl")),
            Some("NL804321823B01".to_string())
        );
        assert_eq!(normalize_tax_number(Some(" .-"), Some("NL")), None);
        assert_eq!(normalize_tax_number(None, Some("NL")), None);
        // No country code: number passes through stripped.
        assert_eq!(
            normalize_tax_number(Some("123 456"), None),
            Some("123456".to_string())
        );
    }

    #[test]
    fn prefers_billing_contact() {
        let people = vec![
            source::Person {
                id: 1,
                first_name: "Sam".to_string(),
                last_name: "Buyer".to_string(),
                email: Some("buyer@example.com".to_string()),
                phone_1: None,
                buyer: true,
                shipping: false,
                billing: false,
            },
            source::Person {
                id: 2,
                first_name: "Pat".to_string(),
                last_name: "Billing".to_string(),
                email: Some("billing@example.com".to_string()),
                phone_1: None,
                buyer: false,
                shipping: false,
                billing: true,
            },
        ];

        assert_eq!(billing_contact(&people).map(|p| p.id), Some(2));
        assert_eq!(billing_contact(&people[..1]).map(|p| p.id), Some(1));
        assert!(billing_contact(&[]).is_none());
    }
}
