use crate::m0000020_create_ship_project::Project;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CoverSheet::Table)
                    .col(
                        ColumnDef::new(CoverSheet::ProjectId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CoverSheet::FileName).string().not_null())
                    .col(ColumnDef::new(CoverSheet::MimeType).string().not_null())
                    .col(ColumnDef::new(CoverSheet::Content).blob().not_null())
                    .col(
                        ColumnDef::new(CoverSheet::GeneratedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cover_sheet_project")
                            .from(CoverSheet::Table, CoverSheet::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoverSheet::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CoverSheet {
    Table,
    ProjectId,
    FileName,
    MimeType,
    Content,
    GeneratedAt,
}
