use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One linkage table per source document kind. `source_id` is the
        // identifier in the source system, `remote_id` the identifier in the
        // downstream system (null until first successful create or match).
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Customers::SourceId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Customers::RemoteId)
                            .string_len(100)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::SourceName).string_len(255).null())
                    .col(ColumnDef::new(Customers::RemoteName).string_len(255).null())
                    .col(ColumnDef::new(Customers::Created).timestamp().not_null())
                    .col(ColumnDef::new(Customers::Updated).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Invoices::SourceId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Invoices::RemoteId)
                            .string_len(100)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Invoices::InvoiceNumber).string_len(100).null())
                    .col(ColumnDef::new(Invoices::InvoiceTotal).double().null())
                    .col(ColumnDef::new(Invoices::Created).timestamp().not_null())
                    .col(ColumnDef::new(Invoices::Updated).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditNotes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreditNotes::SourceId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CreditNotes::RemoteId)
                            .string_len(100)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CreditNotes::CreditNoteNumber)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(CreditNotes::CreditNoteTotal).double().null())
                    .col(ColumnDef::new(CreditNotes::Created).timestamp().not_null())
                    .col(ColumnDef::new(CreditNotes::Updated).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PickTickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PickTickets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PickTickets::SourceId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PickTickets::RemoteId)
                            .string_len(100)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PickTickets::ShipmentNumber).integer().null())
                    .col(ColumnDef::new(PickTickets::OrderId).integer().null())
                    .col(ColumnDef::new(PickTickets::SaleId).integer().null())
                    .col(ColumnDef::new(PickTickets::Created).timestamp().not_null())
                    .col(ColumnDef::new(PickTickets::Updated).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PickTickets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditNotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    SourceId,
    RemoteId,
    SourceName,
    RemoteName,
    Created,
    Updated,
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    SourceId,
    RemoteId,
    InvoiceNumber,
    InvoiceTotal,
    Created,
    Updated,
}

#[derive(Iden)]
enum CreditNotes {
    Table,
    Id,
    SourceId,
    RemoteId,
    CreditNoteNumber,
    CreditNoteTotal,
    Created,
    Updated,
}

#[derive(Iden)]
enum PickTickets {
    Table,
    Id,
    SourceId,
    RemoteId,
    ShipmentNumber,
    OrderId,
    SaleId,
    Created,
    Updated,
}
