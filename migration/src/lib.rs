pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_people_table;
mod m20240301_000002_create_access_token_table;
mod m20240315_000003_create_group_tables;
mod m20240402_000004_create_resource_permission_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_people_table::Migration),
            Box::new(m20240301_000002_create_access_token_table::Migration),
            Box::new(m20240315_000003_create_group_tables::Migration),
            Box::new(m20240402_000004_create_resource_permission_table::Migration),
        ]
    }
}
