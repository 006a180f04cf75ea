use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only audit log. One row per synchronization attempt,
        // referencing a linked entity by (entity_kind, entity_id).
        manager
            .create_table(
                Table::create()
                    .table(Mutations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mutations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mutations::Created).timestamp().not_null())
                    .col(ColumnDef::new(Mutations::Method).integer().not_null())
                    .col(ColumnDef::new(Mutations::Trigger).integer().not_null())
                    .col(
                        ColumnDef::new(Mutations::EntityKind)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Mutations::EntityId).integer().not_null())
                    .col(ColumnDef::new(Mutations::Success).boolean().not_null())
                    .col(ColumnDef::new(Mutations::Message).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mutations_entity")
                    .table(Mutations::Table)
                    .col(Mutations::EntityKind)
                    .col(Mutations::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mutations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Mutations {
    Table,
    Id,
    Created,
    Method,
    Trigger,
    EntityKind,
    EntityId,
    Success,
    Message,
}
