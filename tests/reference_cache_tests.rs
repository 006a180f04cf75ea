mod common;

use sea_orm::EntityTrait;

use common::{remote_tax_rate, setup_db, FakeCarrier, FakeLedger};
use wholesale_sync::clients::sendcloud::{RemoteCarrierCountry, RemoteShippingMethod};
use wholesale_sync::entities::prelude::{
    CachedCarrierCountries, CachedShippingMethods, CachedTaxRates, ShippingMethodCountries,
};
use wholesale_sync::services::reference_cache;

#[tokio::test]
async fn tax_rate_refresh_tombstones_omitted_rows() {
    let db = setup_db().await;
    let ledger = FakeLedger::default();

    ledger.set_tax_rates(vec![
        remote_tax_rate("rate-a", "VerkopenHoog", 21.0),
        remote_tax_rate("rate-b", "VerkopenLaag", 9.0),
        remote_tax_rate("rate-c", "VerkopenNul", 0.0),
    ]);
    let counts = reference_cache::refresh_tax_rates(&db, &ledger).await.unwrap();
    assert_eq!((counts.created, counts.updated, counts.deleted), (3, 0, 0));

    // rate-b disappears from the remote list: it must be deleted locally.
    ledger.set_tax_rates(vec![
        remote_tax_rate("rate-a", "VerkopenHoog", 21.0),
        remote_tax_rate("rate-c", "VerkopenNul", 0.0),
    ]);
    let counts = reference_cache::refresh_tax_rates(&db, &ledger).await.unwrap();
    assert_eq!((counts.created, counts.updated, counts.deleted), (0, 2, 1));

    let remaining = CachedTaxRates::find().all(&db).await.unwrap();
    let mut remote_ids: Vec<&str> = remaining.iter().map(|r| r.remote_id.as_str()).collect();
    remote_ids.sort();
    assert_eq!(remote_ids, vec!["rate-a", "rate-c"]);
}

#[tokio::test]
async fn failed_fetch_leaves_cache_untouched() {
    let db = setup_db().await;
    let ledger = FakeLedger::default();

    ledger.set_tax_rates(vec![remote_tax_rate("rate-a", "VerkopenHoog", 21.0)]);
    reference_cache::refresh_tax_rates(&db, &ledger).await.unwrap();

    // The fetch fails before any row is written or deleted.
    ledger.set_fail_lists(true);
    assert!(reference_cache::refresh_tax_rates(&db, &ledger).await.is_err());
    assert_eq!(CachedTaxRates::find().all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn shipping_method_refresh_rebuilds_serviceable_countries() {
    let db = setup_db().await;
    let carrier = FakeCarrier::default();

    let nl = RemoteCarrierCountry {
        id: 1,
        name: "Netherlands".to_string(),
        iso_2: "NL".to_string(),
        iso_3: "NLD".to_string(),
        price: 6.25,
    };
    let de = RemoteCarrierCountry {
        id: 2,
        name: "Germany".to_string(),
        iso_2: "DE".to_string(),
        iso_3: "DEU".to_string(),
        price: 8.50,
    };

    carrier.set_shipping_methods(vec![RemoteShippingMethod {
        id: 10,
        name: "Standard".to_string(),
        carrier: "postnl".to_string(),
        min_weight: 0.001,
        max_weight: 30.0,
        price: 6.25,
        countries: vec![nl.clone(), de.clone()],
    }]);
    let counts = reference_cache::refresh_shipping_methods(&db, &carrier)
        .await
        .unwrap();
    assert_eq!((counts.created, counts.updated, counts.deleted), (1, 0, 0));
    assert_eq!(
        ShippingMethodCountries::find().all(&db).await.unwrap().len(),
        2
    );

    // Germany drops out of the serviceable set; the join row and the
    // orphaned country mirror must go with it.
    carrier.set_shipping_methods(vec![RemoteShippingMethod {
        id: 10,
        name: "Standard".to_string(),
        carrier: "postnl".to_string(),
        min_weight: 0.001,
        max_weight: 30.0,
        price: 6.25,
        countries: vec![nl],
    }]);
    let counts = reference_cache::refresh_shipping_methods(&db, &carrier)
        .await
        .unwrap();
    assert_eq!((counts.created, counts.updated, counts.deleted), (0, 1, 0));

    assert_eq!(CachedShippingMethods::find().all(&db).await.unwrap().len(), 1);
    assert_eq!(
        ShippingMethodCountries::find().all(&db).await.unwrap().len(),
        1
    );
    let countries = CachedCarrierCountries::find().all(&db).await.unwrap();
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].iso_2, "NL");
}
