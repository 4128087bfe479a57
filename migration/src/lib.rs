pub use sea_orm_migration::prelude::*;

mod m20250412_091530_create_user_table;
mod m20250412_093010_create_donation_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250412_091530_create_user_table::Migration),
            Box::new(m20250412_093010_create_donation_table::Migration),
        ]
    }
}
