use crate::{Error, project::service::load_details, report::ReportService};
use pal_common::db::Database;
use pal_entity::cover_sheet;
use sea_orm::{ActiveValue::Set, EntityTrait};
use sea_query::OnConflict;
use time::OffsetDateTime;
use tracing::instrument;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Keeps the stored cover sheet of each project in line with its data.
#[derive(Clone, Debug)]
pub struct CoverSheetService {
    db: Database,
    report: ReportService,
}

impl CoverSheetService {
    pub fn new(db: Database, report: ReportService) -> Self {
        Self { db, report }
    }

    /// Re-render and store the cover sheet of a project.
    ///
    /// Failures are logged and otherwise ignored, leaving the previous cover sheet in place.
    pub async fn refresh(&self, project_id: i32) {
        if let Err(err) = self.regenerate(project_id).await {
            log::warn!("Failed to regenerate the cover sheet of project {project_id}: {err}");
        }
    }

    #[instrument(skip(self), err(level = tracing::Level::INFO))]
    pub async fn regenerate(&self, project_id: i32) -> Result<(), Error> {
        let Some(details) = load_details(&self.db, project_id).await? else {
            log::debug!("project {project_id} is gone, not rendering a cover sheet");
            return Ok(());
        };

        let pdf = self.report.generate_cover_sheet_pdf(&details).await?;

        cover_sheet::Entity::insert(cover_sheet::ActiveModel {
            project_id: Set(project_id),
            file_name: Set(pdf.file_name),
            mime_type: Set(PDF_MIME_TYPE.to_string()),
            content: Set(pdf.content),
            generated_at: Set(OffsetDateTime::now_utc()),
        })
        .on_conflict(
            OnConflict::column(cover_sheet::Column::ProjectId)
                .update_columns([
                    cover_sheet::Column::FileName,
                    cover_sheet::Column::MimeType,
                    cover_sheet::Column::Content,
                    cover_sheet::Column::GeneratedAt,
                ])
                .to_owned(),
        )
        .exec(&self.db)
        .await?;

        log::info!("regenerated cover sheet of project {project_id}");

        Ok(())
    }

    /// The last stored cover sheet of a project.
    pub async fn fetch(&self, project_id: i32) -> Result<Option<cover_sheet::Model>, Error> {
        Ok(cover_sheet::Entity::find_by_id(project_id)
            .one(&self.db)
            .await?)
    }
}
