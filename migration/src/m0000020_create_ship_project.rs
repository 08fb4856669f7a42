use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShipClass::Table)
                    .col(
                        ColumnDef::new(ShipClass::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ShipClass::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ShipClass::Note).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .col(
                        ColumnDef::new(Project::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Project::ShipName).string().not_null())
                    .col(ColumnDef::new(Project::ProjectNumber).string().not_null())
                    .col(ColumnDef::new(Project::ShipClassId).integer().not_null())
                    .col(ColumnDef::new(Project::OwnerDelegate).string().not_null())
                    .col(
                        ColumnDef::new(Project::TestType)
                            .string_len(8)
                            .not_null()
                            .default("hat"),
                    )
                    .col(ColumnDef::new(Project::Symbol).blob())
                    .col(
                        ColumnDef::new(Project::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_ship_class")
                            .from(Project::Table, Project::ShipClassId)
                            .to(ShipClass::Table, ShipClass::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShipClass::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShipClass {
    Table,
    Id,
    Name,
    Note,
}

#[derive(DeriveIden)]
pub enum Project {
    Table,
    Id,
    ShipName,
    ProjectNumber,
    ShipClassId,
    OwnerDelegate,
    TestType,
    Symbol,
    CreatedAt,
}
