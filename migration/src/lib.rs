pub use sea_orm_migration::prelude::*;

mod m0000010_create_asset_register;
mod m0000020_create_ship_project;
mod m0000030_create_project_children;
mod m0000040_create_cover_sheet;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_asset_register::Migration),
            Box::new(m0000020_create_ship_project::Migration),
            Box::new(m0000030_create_project_children::Migration),
            Box::new(m0000040_create_cover_sheet::Migration),
        ]
    }
}
