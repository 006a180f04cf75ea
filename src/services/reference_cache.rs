//! Reference data cache refresh
//!
//! Each refresh fetches the complete remote list first (a fetch failure
//! leaves the cache untouched), upserts local rows keyed by remote_id, and
//! finally deletes every local row missing from this fetch: the remote list
//! is authoritative and complete.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use crate::clients::{CarrierApi, LedgerApi};
use crate::entities::{
    cached_carrier_countries, cached_countries, cached_ledger_accounts, cached_shipping_methods,
    cached_tax_rates, prelude::*, shipping_method_countries,
};
use crate::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshCounts {
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
}

pub async fn refresh_tax_rates(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
) -> Result<RefreshCounts, SyncError> {
    let fetched = ledger
        .list_tax_rates()
        .await
        .map_err(|e| SyncError::api("An error occurred while retrieving tax rates", e))?;

    tracing::info!("Refreshing {} cached tax rates", fetched.len());

    let mut touched = Vec::with_capacity(fetched.len());
    let mut created = 0;
    let mut updated = 0;

    for rate in fetched {
        let existing = CachedTaxRates::find()
            .filter(cached_tax_rates::Column::RemoteId.eq(&rate.id))
            .one(db)
            .await?;

        match existing {
            Some(row) => {
                let id = row.id;
                let mut active = row.into_active_model();
                active.name = Set(rate.name);
                active.percentage = Set(rate.percentage);
                active.valid_from = Set(rate.valid_from);
                active.valid_until = Set(rate.valid_until);
                active.update(db).await?;
                updated += 1;
                touched.push(id);
            }
            None => {
                let inserted = cached_tax_rates::ActiveModel {
                    remote_id: Set(rate.id),
                    name: Set(rate.name),
                    percentage: Set(rate.percentage),
                    valid_from: Set(rate.valid_from),
                    valid_until: Set(rate.valid_until),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                created += 1;
                touched.push(inserted.id);
            }
        }
    }

    let deleted = CachedTaxRates::delete_many()
        .filter(cached_tax_rates::Column::Id.is_not_in(touched))
        .exec(db)
        .await?
        .rows_affected;

    Ok(RefreshCounts {
        created,
        updated,
        deleted,
    })
}

pub async fn refresh_ledger_accounts(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
) -> Result<RefreshCounts, SyncError> {
    let fetched = ledger
        .list_accounts()
        .await
        .map_err(|e| SyncError::api("An error occurred while retrieving ledger accounts", e))?;

    tracing::info!("Refreshing {} cached ledger accounts", fetched.len());

    let mut touched = Vec::with_capacity(fetched.len());
    let mut created = 0;
    let mut updated = 0;

    for account in fetched {
        let existing = CachedLedgerAccounts::find()
            .filter(cached_ledger_accounts::Column::RemoteId.eq(&account.id))
            .one(db)
            .await?;

        match existing {
            Some(row) => {
                let id = row.id;
                let mut active = row.into_active_model();
                active.description = Set(account.description);
                active.number = Set(account.number);
                active.account_kind = Set(account.account_kind);
                active.vat_code = Set(account.vat_code);
                active.inactive = Set(account.inactive);
                active.modified_at = Set(account.modified_at);
                active.update(db).await?;
                updated += 1;
                touched.push(id);
            }
            None => {
                let inserted = cached_ledger_accounts::ActiveModel {
                    remote_id: Set(account.id),
                    description: Set(account.description),
                    number: Set(account.number),
                    account_kind: Set(account.account_kind),
                    vat_code: Set(account.vat_code),
                    inactive: Set(account.inactive),
                    modified_at: Set(account.modified_at),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                created += 1;
                touched.push(inserted.id);
            }
        }
    }

    let deleted = CachedLedgerAccounts::delete_many()
        .filter(cached_ledger_accounts::Column::Id.is_not_in(touched))
        .exec(db)
        .await?
        .rows_affected;

    Ok(RefreshCounts {
        created,
        updated,
        deleted,
    })
}

pub async fn refresh_countries(
    db: &DatabaseConnection,
    ledger: &impl LedgerApi,
) -> Result<RefreshCounts, SyncError> {
    let fetched = ledger
        .list_countries()
        .await
        .map_err(|e| SyncError::api("An error occurred while retrieving countries", e))?;

    tracing::info!("Refreshing {} cached countries", fetched.len());

    let mut touched = Vec::with_capacity(fetched.len());
    let mut created = 0;
    let mut updated = 0;

    for country in fetched {
        let existing = CachedCountries::find()
            .filter(cached_countries::Column::RemoteId.eq(&country.id))
            .one(db)
            .await?;

        match existing {
            Some(row) => {
                let id = row.id;
                let mut active = row.into_active_model();
                active.name = Set(country.name);
                active.country_code = Set(country.country_code);
                active.iso_code = Set(country.iso_code);
                active.update(db).await?;
                updated += 1;
                touched.push(id);
            }
            None => {
                let inserted = cached_countries::ActiveModel {
                    remote_id: Set(country.id),
                    name: Set(country.name),
                    country_code: Set(country.country_code),
                    iso_code: Set(country.iso_code),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                created += 1;
                touched.push(inserted.id);
            }
        }
    }

    let deleted = CachedCountries::delete_many()
        .filter(cached_countries::Column::Id.is_not_in(touched))
        .exec(db)
        .await?
        .rows_affected;

    Ok(RefreshCounts {
        created,
        updated,
        deleted,
    })
}

/// Refresh shipping methods together with the carrier countries they serve.
/// Counts refer to shipping methods; the country mirror and the join table
/// are rebuilt as a side effect.
pub async fn refresh_shipping_methods(
    db: &DatabaseConnection,
    carrier: &impl CarrierApi,
) -> Result<RefreshCounts, SyncError> {
    let fetched = carrier
        .list_shipping_methods()
        .await
        .map_err(|e| SyncError::api("An error occurred while retrieving shipping methods", e))?;

    tracing::info!("Refreshing {} cached shipping methods", fetched.len());

    let mut touched_methods = Vec::with_capacity(fetched.len());
    let mut touched_countries: Vec<i32> = Vec::new();
    let mut created = 0;
    let mut updated = 0;

    for method in fetched {
        let mut serviceable = Vec::with_capacity(method.countries.len());
        for country in &method.countries {
            let local_id = upsert_carrier_country(db, country).await?;
            serviceable.push(local_id);
            if !touched_countries.contains(&local_id) {
                touched_countries.push(local_id);
            }
        }

        let existing = CachedShippingMethods::find()
            .filter(cached_shipping_methods::Column::RemoteId.eq(method.id))
            .one(db)
            .await?;

        let local_method_id = match existing {
            Some(row) => {
                let id = row.id;
                let mut active = row.into_active_model();
                active.name = Set(method.name);
                active.carrier = Set(method.carrier);
                active.min_weight = Set(method.min_weight);
                active.max_weight = Set(method.max_weight);
                active.price = Set(method.price);
                active.update(db).await?;
                updated += 1;
                id
            }
            None => {
                let inserted = cached_shipping_methods::ActiveModel {
                    remote_id: Set(method.id),
                    name: Set(method.name),
                    carrier: Set(method.carrier),
                    min_weight: Set(method.min_weight),
                    max_weight: Set(method.max_weight),
                    price: Set(method.price),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                created += 1;
                inserted.id
            }
        };
        touched_methods.push(local_method_id);

        // Rebuild the serviceable-country set for this method.
        ShippingMethodCountries::delete_many()
            .filter(shipping_method_countries::Column::ShippingMethodId.eq(local_method_id))
            .exec(db)
            .await?;
        for country_id in serviceable {
            shipping_method_countries::ActiveModel {
                shipping_method_id: Set(local_method_id),
                carrier_country_id: Set(country_id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
    }

    let deleted = CachedShippingMethods::delete_many()
        .filter(cached_shipping_methods::Column::Id.is_not_in(touched_methods))
        .exec(db)
        .await?
        .rows_affected;

    CachedCarrierCountries::delete_many()
        .filter(cached_carrier_countries::Column::Id.is_not_in(touched_countries))
        .exec(db)
        .await?;

    Ok(RefreshCounts {
        created,
        updated,
        deleted,
    })
}

async fn upsert_carrier_country(
    db: &DatabaseConnection,
    country: &crate::clients::sendcloud::RemoteCarrierCountry,
) -> Result<i32, SyncError> {
    let existing = CachedCarrierCountries::find()
        .filter(cached_carrier_countries::Column::RemoteId.eq(country.id))
        .one(db)
        .await?;

    match existing {
        Some(row) => {
            let id = row.id;
            let mut active = row.into_active_model();
            active.name = Set(country.name.clone());
            active.iso_2 = Set(country.iso_2.clone());
            active.iso_3 = Set(country.iso_3.clone());
            active.price = Set(country.price);
            active.update(db).await?;
            Ok(id)
        }
        None => {
            let inserted = cached_carrier_countries::ActiveModel {
                remote_id: Set(country.id),
                name: Set(country.name.clone()),
                iso_2: Set(country.iso_2.clone()),
                iso_3: Set(country.iso_3.clone()),
                price: Set(country.price),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(inserted.id)
        }
    }
}
