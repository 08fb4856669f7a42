use crate::m0000020_create_ship_project::Project;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Every child row belongs to exactly one project, and goes away with it.
fn project_reference(name: &str, table: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from_tbl(table)
        .from_col(Alias::new("project_id"))
        .to(Project::Table, Project::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestLocation::Table)
                    .col(
                        ColumnDef::new(TestLocation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestLocation::ProjectId).integer().not_null())
                    .col(ColumnDef::new(TestLocation::Name).string().not_null())
                    .col(ColumnDef::new(TestLocation::TestSite).string().not_null())
                    .col(
                        ColumnDef::new(TestLocation::SignClass)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TestLocation::Note).text())
                    .col(
                        ColumnDef::new(TestLocation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut project_reference(
                        "fk_test_location_project",
                        TestLocation::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SupportingDocument::Table)
                    .col(
                        ColumnDef::new(SupportingDocument::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SupportingDocument::ProjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupportingDocument::DesignReference)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupportingDocument::MakerDocument)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SupportingDocument::Remarks).text())
                    .col(
                        ColumnDef::new(SupportingDocument::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut project_reference(
                        "fk_supporting_document_project",
                        SupportingDocument::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReviewApproval::Table)
                    .col(
                        ColumnDef::new(ReviewApproval::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewApproval::ProjectId).integer().not_null())
                    .col(
                        ColumnDef::new(ReviewApproval::InternalReviewStatus)
                            .string_len(8)
                            .not_null()
                            .default("no"),
                    )
                    .col(
                        ColumnDef::new(ReviewApproval::ClassOwnerReviewStatus)
                            .string_len(8)
                            .not_null()
                            .default("no"),
                    )
                    .col(
                        ColumnDef::new(ReviewApproval::ShipyardSigned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ReviewApproval::ClassSigned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ReviewApproval::OwnerDelegateSigned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ReviewApproval::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(&mut project_reference(
                        "fk_review_approval_project",
                        ReviewApproval::Table,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_location_project")
                    .table(TestLocation::Table)
                    .col(TestLocation::ProjectId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_supporting_document_project")
                    .table(SupportingDocument::Table)
                    .col(SupportingDocument::ProjectId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_review_approval_project")
                    .table(ReviewApproval::Table)
                    .col(ReviewApproval::ProjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewApproval::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SupportingDocument::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TestLocation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestLocation {
    Table,
    Id,
    ProjectId,
    Name,
    TestSite,
    SignClass,
    Note,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SupportingDocument {
    Table,
    Id,
    ProjectId,
    DesignReference,
    MakerDocument,
    Remarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ReviewApproval {
    Table,
    Id,
    ProjectId,
    InternalReviewStatus,
    ClassOwnerReviewStatus,
    ShipyardSigned,
    ClassSigned,
    OwnerDelegateSigned,
    CreatedAt,
}
