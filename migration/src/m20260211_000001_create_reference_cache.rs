use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Local mirrors of slowly-changing remote lookup tables. Each is
        // bulk-refreshed: upsert by remote_id, then delete rows missing from
        // the latest fetch.
        manager
            .create_table(
                Table::create()
                    .table(CachedTaxRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedTaxRates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CachedTaxRates::RemoteId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CachedTaxRates::Name).string_len(100).not_null())
                    .col(ColumnDef::new(CachedTaxRates::Percentage).double().not_null())
                    .col(ColumnDef::new(CachedTaxRates::ValidFrom).timestamp().not_null())
                    .col(ColumnDef::new(CachedTaxRates::ValidUntil).timestamp().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CachedLedgerAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedLedgerAccounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CachedLedgerAccounts::RemoteId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CachedLedgerAccounts::Description)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CachedLedgerAccounts::Number).integer().not_null())
                    .col(
                        ColumnDef::new(CachedLedgerAccounts::AccountKind)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CachedLedgerAccounts::VatCode)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CachedLedgerAccounts::Inactive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CachedLedgerAccounts::ModifiedAt)
                            .timestamp()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CachedCountries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedCountries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CachedCountries::RemoteId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CachedCountries::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(CachedCountries::CountryCode)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CachedCountries::IsoCode).string_len(10).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CachedShippingMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedShippingMethods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CachedShippingMethods::RemoteId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CachedShippingMethods::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CachedShippingMethods::Carrier)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CachedShippingMethods::MinWeight)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CachedShippingMethods::MaxWeight)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CachedShippingMethods::Price).double().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CachedCarrierCountries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedCarrierCountries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CachedCarrierCountries::RemoteId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CachedCarrierCountries::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CachedCarrierCountries::Iso2)
                            .string_len(2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CachedCarrierCountries::Iso3)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CachedCarrierCountries::Price).double().not_null())
                    .to_owned(),
            )
            .await?;

        // Which countries a shipping method serves.
        manager
            .create_table(
                Table::create()
                    .table(ShippingMethodCountries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShippingMethodCountries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ShippingMethodCountries::ShippingMethodId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ShippingMethodCountries::CarrierCountryId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_smc_shipping_method")
                            .from(
                                ShippingMethodCountries::Table,
                                ShippingMethodCountries::ShippingMethodId,
                            )
                            .to(CachedShippingMethods::Table, CachedShippingMethods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_smc_carrier_country")
                            .from(
                                ShippingMethodCountries::Table,
                                ShippingMethodCountries::CarrierCountryId,
                            )
                            .to(CachedCarrierCountries::Table, CachedCarrierCountries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_smc_method_country")
                    .table(ShippingMethodCountries::Table)
                    .col(ShippingMethodCountries::ShippingMethodId)
                    .col(ShippingMethodCountries::CarrierCountryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShippingMethodCountries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CachedCarrierCountries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CachedShippingMethods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CachedCountries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CachedLedgerAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CachedTaxRates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CachedTaxRates {
    Table,
    Id,
    RemoteId,
    Name,
    Percentage,
    ValidFrom,
    ValidUntil,
}

#[derive(Iden)]
enum CachedLedgerAccounts {
    Table,
    Id,
    RemoteId,
    Description,
    Number,
    AccountKind,
    VatCode,
    Inactive,
    ModifiedAt,
}

#[derive(Iden)]
enum CachedCountries {
    Table,
    Id,
    RemoteId,
    Name,
    CountryCode,
    IsoCode,
}

#[derive(Iden)]
enum CachedShippingMethods {
    Table,
    Id,
    RemoteId,
    Name,
    Carrier,
    MinWeight,
    MaxWeight,
    Price,
}

#[derive(Iden)]
enum CachedCarrierCountries {
    Table,
    Id,
    RemoteId,
    Name,
    #[iden = "iso_2"]
    Iso2,
    #[iden = "iso_3"]
    Iso3,
    Price,
}

#[derive(Iden)]
enum ShippingMethodCountries {
    Table,
    Id,
    ShippingMethodId,
    CarrierCountryId,
}
