mod common;

use sea_orm::EntityTrait;

use common::{sample_invoice, setup_db};
use wholesale_sync::entities::prelude::Invoices;
use wholesale_sync::services::linkage;

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let db = setup_db().await;
    let invoice = sample_invoice(1, 5);

    let first = linkage::get_or_create_invoice(&db, &invoice).await.unwrap();
    let second = linkage::get_or_create_invoice(&db, &invoice).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(Invoices::find().all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn remote_id_is_set_at_most_once() {
    let db = setup_db().await;
    let invoice = sample_invoice(1, 5);
    let entity = linkage::get_or_create_invoice(&db, &invoice).await.unwrap();

    assert!(linkage::set_invoice_remote_id(&db, entity.id, "booking-1")
        .await
        .unwrap());
    // A second write loses and must not overwrite the stored id.
    assert!(!linkage::set_invoice_remote_id(&db, entity.id, "booking-2")
        .await
        .unwrap());

    let stored = Invoices::find_by_id(entity.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.remote_id.as_deref(), Some("booking-1"));
}

#[tokio::test]
async fn separate_source_ids_get_separate_rows() {
    let db = setup_db().await;

    let a = linkage::get_or_create_invoice(&db, &sample_invoice(1, 5))
        .await
        .unwrap();
    let b = linkage::get_or_create_invoice(&db, &sample_invoice(2, 5))
        .await
        .unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(Invoices::find().all(&db).await.unwrap().len(), 2);
}
