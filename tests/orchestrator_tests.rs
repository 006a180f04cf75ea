mod common;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use common::{
    remote_relation, sample_credit_note, sample_customer, sample_invoice, sample_pick_ticket,
    seed_shipping_method, seed_tax_mapping, setup_db, FakeCarrier, FakeLedger, FakeSource,
};
use wholesale_sync::entities::mutations::{self, EntityKind, Method, Trigger};
use wholesale_sync::entities::prelude::{Customers, Invoices, Mutations, PickTickets};
use wholesale_sync::entities::{customers, invoices, pick_tickets};
use wholesale_sync::models::source::Order;
use wholesale_sync::services::{credit_notes, customers as customer_sync, invoices as invoice_sync};
use wholesale_sync::services::{pick_tickets as pick_ticket_sync, SyncOutcome};

async fn mutations_for(db: &DatabaseConnection, kind: EntityKind) -> Vec<mutations::Model> {
    Mutations::find()
        .filter(mutations::Column::EntityKind.eq(kind))
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn invoice_create_success_links_and_records() {
    let db = setup_db().await;
    seed_tax_mapping(&db, 21.0, "VerkopenHoog").await;
    let source = FakeSource::with_customer(sample_customer(5));
    let ledger = FakeLedger::default();
    let invoice = sample_invoice(1, 5);

    let outcome =
        invoice_sync::try_create_invoice(&db, &source, &ledger, &invoice, Trigger::Webhook)
            .await
            .unwrap();
    assert_eq!(outcome, SyncOutcome::Synchronized);

    // The booking payload carries the aggregated amounts.
    let bookings = ledger.created_bookings.lock().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].invoice_amount, "24.20");
    assert_eq!(bookings[0].payment_term_days, 30);
    assert_eq!(bookings[0].booking_lines.len(), 1);
    assert_eq!(bookings[0].booking_lines[0].amount, "20.00");
    assert_eq!(bookings[0].tax_lines.len(), 1);
    assert_eq!(bookings[0].tax_lines[0].tax_amount, "4.20");
    drop(bookings);

    let stored = Invoices::find()
        .filter(invoices::Column::SourceId.eq(1))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.remote_id.as_deref().unwrap_or("").starts_with("booking-"));

    // One mutation for the customer, one for the invoice, both successful.
    let invoice_mutations = mutations_for(&db, EntityKind::Invoice).await;
    assert_eq!(invoice_mutations.len(), 1);
    assert!(invoice_mutations[0].success);
    assert_eq!(invoice_mutations[0].method, Method::Create);
    let customer_mutations = mutations_for(&db, EntityKind::Customer).await;
    assert_eq!(customer_mutations.len(), 1);
    assert!(customer_mutations[0].success);
}

#[tokio::test]
async fn failed_invoice_create_is_retry_safe() {
    let db = setup_db().await;
    seed_tax_mapping(&db, 21.0, "VerkopenHoog").await;
    let source = FakeSource::with_customer(sample_customer(5));
    let ledger = FakeLedger::default();
    let invoice = sample_invoice(1, 5);

    ledger.set_fail_bookings(true);
    let outcome =
        invoice_sync::try_create_invoice(&db, &source, &ledger, &invoice, Trigger::Webhook)
            .await
            .unwrap();
    assert!(matches!(outcome, SyncOutcome::Failed(_)));

    // The remote id stays unset so a retry goes down the create path again.
    let stored = Invoices::find()
        .filter(invoices::Column::SourceId.eq(1))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.remote_id.is_none());
    let invoice_mutations = mutations_for(&db, EntityKind::Invoice).await;
    assert_eq!(invoice_mutations.len(), 1);
    assert!(!invoice_mutations[0].success);

    ledger.set_fail_bookings(false);
    let outcome =
        invoice_sync::try_create_invoice(&db, &source, &ledger, &invoice, Trigger::Webhook)
            .await
            .unwrap();
    assert_eq!(outcome, SyncOutcome::Synchronized);

    let all = Invoices::find().all(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].remote_id.is_some());
    assert_eq!(mutations_for(&db, EntityKind::Invoice).await.len(), 2);
}

#[tokio::test]
async fn missing_tax_mapping_records_converter_failure() {
    let db = setup_db().await;
    // No tax mapping seeded.
    let source = FakeSource::with_customer(sample_customer(5));
    let ledger = FakeLedger::default();
    let invoice = sample_invoice(1, 5);

    let outcome =
        invoice_sync::try_create_invoice(&db, &source, &ledger, &invoice, Trigger::Manual)
            .await
            .unwrap();
    let SyncOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(message.contains("tax mapping"));
    assert!(ledger.created_bookings.lock().unwrap().is_empty());

    let invoice_mutations = mutations_for(&db, EntityKind::Invoice).await;
    assert_eq!(invoice_mutations.len(), 1);
    assert!(!invoice_mutations[0].success);
}

#[tokio::test]
async fn update_without_remote_id_fails_before_converting() {
    let db = setup_db().await;
    seed_tax_mapping(&db, 21.0, "VerkopenHoog").await;
    let source = FakeSource::with_customer(sample_customer(5));
    let ledger = FakeLedger::default();
    let invoice = sample_invoice(1, 5);

    let outcome =
        invoice_sync::try_update_invoice(&db, &source, &ledger, &invoice, Trigger::Webhook)
            .await
            .unwrap();
    let SyncOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(message.contains("no remote id"));

    // Early exit: the customer was never synchronized.
    assert!(ledger.created_relations.lock().unwrap().is_empty());
    assert!(ledger.updated_bookings.lock().unwrap().is_empty());
    let invoice_mutations = mutations_for(&db, EntityKind::Invoice).await;
    assert_eq!(invoice_mutations.len(), 1);
    assert_eq!(invoice_mutations[0].method, Method::Update);
    assert!(!invoice_mutations[0].success);
}

#[tokio::test]
async fn delete_keeps_the_stored_remote_id() {
    let db = setup_db().await;
    seed_tax_mapping(&db, 21.0, "VerkopenHoog").await;
    let source = FakeSource::with_customer(sample_customer(5));
    let ledger = FakeLedger::default();
    let invoice = sample_invoice(1, 5);

    invoice_sync::try_create_invoice(&db, &source, &ledger, &invoice, Trigger::Webhook)
        .await
        .unwrap();
    let outcome = invoice_sync::try_delete_invoice(&db, &ledger, &invoice, Trigger::Webhook)
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Synchronized);

    let stored = Invoices::find()
        .filter(invoices::Column::SourceId.eq(1))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    // Deletion removes the remote booking but keeps the linkage.
    assert!(stored.remote_id.is_some());
    assert_eq!(
        ledger.deleted_bookings.lock().unwrap().as_slice(),
        &[stored.remote_id.unwrap()]
    );
}

#[tokio::test]
async fn single_relation_match_is_adopted() {
    let db = setup_db().await;
    let ledger = FakeLedger::default();
    ledger.set_search_results(vec![remote_relation("relation-77", "Acme Fashion BV")]);
    let customer = sample_customer(5);

    let outcome =
        customer_sync::try_synchronize_customer(&db, &ledger, &customer, Trigger::Manual)
            .await
            .unwrap();
    assert_eq!(outcome, SyncOutcome::Synchronized);

    // Adopted, not created.
    assert!(ledger.created_relations.lock().unwrap().is_empty());
    let stored = Customers::find()
        .filter(customers::Column::SourceId.eq(5))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.remote_id.as_deref(), Some("relation-77"));
}

#[tokio::test]
async fn ambiguous_relation_match_is_fatal() {
    let db = setup_db().await;
    let ledger = FakeLedger::default();
    ledger.set_search_results(vec![
        remote_relation("relation-1", "Acme Fashion BV"),
        remote_relation("relation-2", "Acme Fashion BV"),
    ]);
    let customer = sample_customer(5);

    let outcome =
        customer_sync::try_synchronize_customer(&db, &ledger, &customer, Trigger::Manual)
            .await
            .unwrap();
    let SyncOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(message.contains("multiple"));

    // No link is made and an operator can see why.
    let stored = Customers::find()
        .filter(customers::Column::SourceId.eq(5))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.remote_id.is_none());
    let customer_mutations = mutations_for(&db, EntityKind::Customer).await;
    assert_eq!(customer_mutations.len(), 1);
    assert!(!customer_mutations[0].success);
}

#[tokio::test]
async fn relation_already_claimed_by_another_customer_is_fatal() {
    let db = setup_db().await;
    let ledger = FakeLedger::default();
    ledger.set_search_results(vec![remote_relation("relation-77", "Acme Fashion BV")]);

    // First customer adopts the match.
    let first = sample_customer(5);
    customer_sync::try_synchronize_customer(&db, &ledger, &first, Trigger::Manual)
        .await
        .unwrap();

    // A different customer resolving to the same remote relation must fail.
    let mut second = sample_customer(6);
    second.name = "Acme Fashion BV".to_string();
    let outcome =
        customer_sync::try_synchronize_customer(&db, &ledger, &second, Trigger::Manual)
            .await
            .unwrap();
    let SyncOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(message.contains("already linked"));

    let stored = Customers::find()
        .filter(customers::Column::SourceId.eq(6))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.remote_id.is_none());
}

#[tokio::test]
async fn credit_note_booking_is_sign_inverted() {
    let db = setup_db().await;
    seed_tax_mapping(&db, 21.0, "VerkopenHoog").await;
    let source = FakeSource::with_customer(sample_customer(5));
    source.orders.lock().unwrap().push(Order {
        id: 900,
        company_id: 5,
        order_number: 1001,
    });
    let ledger = FakeLedger::default();
    let credit_note = sample_credit_note(3, 1001);

    let outcome = credit_notes::try_create_credit_note(
        &db,
        &source,
        &ledger,
        &credit_note,
        Trigger::Webhook,
    )
    .await
    .unwrap();
    assert_eq!(outcome, SyncOutcome::Synchronized);

    let bookings = ledger.created_bookings.lock().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].invoice_amount, "-24.20");
    assert_eq!(bookings[0].booking_lines[0].amount, "-20.00");
    assert_eq!(bookings[0].payment_term_days, 0);
    // Inverted tax totals are negative, so no tax lines survive.
    assert!(bookings[0].tax_lines.is_empty());
}

#[tokio::test]
async fn unshipped_pick_ticket_is_not_announced() {
    let db = setup_db().await;
    let carrier = FakeCarrier::default();
    let pick_ticket = sample_pick_ticket(8, "open");

    let outcome = pick_ticket_sync::try_create_pick_ticket(
        &db,
        &carrier,
        &pick_ticket,
        Some("Standard"),
        Trigger::Webhook,
    )
    .await
    .unwrap();
    let SyncOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(message.contains("not in shipped status"));
    assert!(carrier.created_parcels.lock().unwrap().is_empty());

    let ticket_mutations = mutations_for(&db, EntityKind::PickTicket).await;
    assert_eq!(ticket_mutations.len(), 1);
    assert!(!ticket_mutations[0].success);
}

#[tokio::test]
async fn shipped_pick_ticket_becomes_a_parcel() {
    let db = setup_db().await;
    seed_shipping_method(&db, 10, "Standard").await;
    let carrier = FakeCarrier::default();
    let pick_ticket = sample_pick_ticket(8, "Shipped");

    let outcome = pick_ticket_sync::try_create_pick_ticket(
        &db,
        &carrier,
        &pick_ticket,
        Some("Standard"),
        Trigger::Webhook,
    )
    .await
    .unwrap();
    assert_eq!(outcome, SyncOutcome::Synchronized);

    let parcels = carrier.created_parcels.lock().unwrap();
    assert_eq!(parcels.len(), 1);
    let parcel = &parcels[0].parcel;
    assert_eq!(parcel.weight, "0.800");
    assert_eq!((parcel.width, parcel.length, parcel.height), (Some(30), Some(40), Some(20)));
    assert_eq!(parcel.telephone.as_deref(), Some("31612345678"));
    assert_eq!(parcel.country, "NL");
    assert!(parcel.country_state.is_none());
    assert_eq!(parcel.shipment.id, 10);
    assert_eq!(parcel.parcel_items.len(), 1);
    assert_eq!(parcel.request_label, false);
    drop(parcels);

    let stored = PickTickets::find()
        .filter(pick_tickets::Column::SourceId.eq(8))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.remote_id.as_deref(), Some("9000"));
}

#[tokio::test]
async fn missing_shipping_method_fails_the_parcel() {
    let db = setup_db().await;
    let carrier = FakeCarrier::default();
    let pick_ticket = sample_pick_ticket(8, "shipped");

    // No country mapping and no default configured.
    let outcome = pick_ticket_sync::try_create_pick_ticket(
        &db,
        &carrier,
        &pick_ticket,
        None,
        Trigger::Manual,
    )
    .await
    .unwrap();
    let SyncOutcome::Failed(message) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(message.contains("shipping method"));
    assert!(carrier.created_parcels.lock().unwrap().is_empty());
}
