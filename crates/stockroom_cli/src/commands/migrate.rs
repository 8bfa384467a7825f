//! `stockroom migrate` - run schema migrations.

use sea_orm_migration::MigratorTrait;

use stockroom::config::Settings;
use stockroom::migration::Migrator;

use crate::MigrateAction;

pub async fn run(settings: &Settings, action: MigrateAction) -> anyhow::Result<()> {
    let db = stockroom::db::connect(&settings.database_url).await?;

    match action {
        MigrateAction::Up => {
            Migrator::up(&db, None).await?;
            println!("Migrations applied");
        }
        MigrateAction::Down => {
            Migrator::down(&db, Some(1)).await?;
            println!("Rolled back last migration");
        }
        MigrateAction::Status => {
            Migrator::status(&db).await?;
        }
        MigrateAction::Fresh => {
            Migrator::fresh(&db).await?;
            println!("Schema recreated from scratch");
        }
    }

    Ok(())
}
