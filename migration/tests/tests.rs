use pal_migration::{Migrator, MigratorTrait};
use pal_test_context::PalContext;
use test_context::test_context;
use test_log::test;

#[test_context(PalContext)]
#[test(tokio::test)]
async fn test_migrations(ctx: &PalContext) -> Result<(), anyhow::Error> {
    let db = &ctx.db;

    // the context already applied all migrations
    let migrations = Migrator::get_applied_migrations(db).await?;
    assert_eq!(migrations.len(), Migrator::migrations().len());

    db.refresh().await?;

    let reapplied = Migrator::get_applied_migrations(db).await?;
    assert_eq!(reapplied.len(), Migrator::migrations().len());

    Ok(())
}
