pub use sea_orm_migration::prelude::*;

mod m20260210_000001_create_linked_entities;
mod m20260210_000002_create_mutations;
mod m20260211_000001_create_reference_cache;
mod m20260211_000002_create_operator_mappings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260210_000001_create_linked_entities::Migration),
            Box::new(m20260210_000002_create_mutations::Migration),
            Box::new(m20260211_000001_create_reference_cache::Migration),
            Box::new(m20260211_000002_create_operator_mappings::Migration),
        ]
    }
}
