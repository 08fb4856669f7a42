use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Location names are unique, ignoring case, as long as the location is active. Expressed as
/// raw SQL, as the partial expression index is not covered by the schema builder.
const LOCATION_NAME_INDEX: &str =
    "CREATE UNIQUE INDEX location_active_name_key ON location (lower(name)) WHERE active";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .col(
                        ColumnDef::new(Location::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Location::Name).string().not_null())
                    .col(ColumnDef::new(Location::Code).string())
                    .col(
                        ColumnDef::new(Location::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Location::Note).text())
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(LOCATION_NAME_INDEX)
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Asset::Table)
                    .col(
                        ColumnDef::new(Asset::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Asset::Name).string().not_null())
                    .col(ColumnDef::new(Asset::Code).string().not_null())
                    .col(ColumnDef::new(Asset::LocationId).integer())
                    .col(
                        ColumnDef::new(Asset::Condition)
                            .string_len(16)
                            .not_null()
                            .default("good"),
                    )
                    .col(ColumnDef::new(Asset::PurchaseDate).date())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_location")
                            .from(Asset::Table, Asset::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Asset::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Location {
    Table,
    Id,
    Name,
    Code,
    Active,
    Note,
}

#[derive(DeriveIden)]
enum Asset {
    Table,
    Id,
    Name,
    Code,
    LocationId,
    Condition,
    PurchaseDate,
}
