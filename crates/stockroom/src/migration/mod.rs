//! Database migrations for the stockroom schema.
//!
//! Production deployments apply these through an external runner; the test
//! suites call [`Migrator`] directly against in-memory SQLite.

pub use sea_orm_migration::prelude::*;

mod m20250118_000001_create_schema;

/// The migrator that runs all migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250118_000001_create_schema::Migration)]
    }

    fn migration_table_name() -> SeaRc<dyn Iden> {
        SeaRc::new(Alias::new("stockroom_migrations"))
    }
}
