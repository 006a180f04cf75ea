use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Operator-curated mapping from a source tax percentage to the ledger
        // tax category plus the ledger accounts for product and shipping
        // lines. Read-only to the synchronization flow.
        manager
            .create_table(
                Table::create()
                    .table(TaxMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TaxMappings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TaxMappings::TaxAmount)
                            .double()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TaxMappings::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(TaxMappings::LedgerAccountId)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaxMappings::ShippingLedgerAccountId)
                            .string_len(100)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Per source country code: an optional shipping-method override for
        // pick tickets and an optional ledger-country override for addresses
        // whose code does not match automatically.
        manager
            .create_table(
                Table::create()
                    .table(CountryMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CountryMappings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CountryMappings::CountryCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CountryMappings::ShippingMethodId)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(CountryMappings::LedgerCountryId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_country_mappings_shipping_method")
                            .from(CountryMappings::Table, CountryMappings::ShippingMethodId)
                            .to(CachedShippingMethods::Table, CachedShippingMethods::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_country_mappings_ledger_country")
                            .from(CountryMappings::Table, CountryMappings::LedgerCountryId)
                            .to(CachedCountries::Table, CachedCountries::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CountryMappings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaxMappings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TaxMappings {
    Table,
    Id,
    TaxAmount,
    Name,
    LedgerAccountId,
    ShippingLedgerAccountId,
}

#[derive(Iden)]
enum CountryMappings {
    Table,
    Id,
    CountryCode,
    ShippingMethodId,
    LedgerCountryId,
}

#[derive(Iden)]
enum CachedShippingMethods {
    Table,
    Id,
}

#[derive(Iden)]
enum CachedCountries {
    Table,
    Id,
}
