//! Producing cover sheet PDFs through an external report server.

mod jasper;

#[cfg(test)]
mod test;

pub use jasper::JasperRenderer;

use crate::{
    Error,
    cover_sheet::{CoverSheetData, assemble},
    project::{model::ProjectDetails, service::load_details},
};
use pal_common::db::Database;
use std::{collections::BTreeMap, fmt::Debug, sync::Arc, time::Duration};
use tracing::instrument;
use url::Url;

pub const PROJECT_NOT_SELECTED: &str = "Project has not been selected.";
pub const PROJECT_NOT_FOUND: &str = "Project not found or not accessible.";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, clap::Args)]
#[command(next_help_heading = "Cover sheet renderer")]
#[group(id = "renderer")]
pub struct RendererConfig {
    /// The base URL of the report server. Without one, cover sheets can't be rendered.
    #[arg(id = "jasper-url", long, env = "JASPER_URL")]
    pub url: Option<Url>,

    #[arg(
        id = "jasper-username",
        long,
        env = "JASPER_USERNAME",
        default_value = "jasperadmin"
    )]
    pub username: String,

    #[arg(id = "jasper-password", long, env = "JASPER_PASSWORD")]
    pub password: Option<String>,

    /// The repository path of the cover sheet report
    #[arg(
        id = "jasper-report-path",
        long,
        env = "JASPER_REPORT_PATH",
        default_value = "/reports/pal/cover_sheet"
    )]
    pub report_path: String,

    /// Timeout of a single render request
    #[arg(
        id = "jasper-timeout",
        long,
        env = "JASPER_TIMEOUT",
        default_value = "30s"
    )]
    pub timeout: humantime::Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: "jasperadmin".into(),
            password: None,
            report_path: "/reports/pal/cover_sheet".into(),
            timeout: DEFAULT_TIMEOUT.into(),
        }
    }
}

impl RendererConfig {
    /// Create the renderer described by this configuration.
    pub fn into_renderer(self) -> anyhow::Result<Arc<dyn CoverSheetRenderer>> {
        Ok(match self.url.clone() {
            Some(url) => {
                log::info!("Rendering cover sheets through: {url}");
                Arc::new(JasperRenderer::new(url, self)?)
            }
            None => {
                log::warn!("No report server configured, cover sheets will not be rendered");
                Arc::new(Unconfigured)
            }
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("rendering failed: {0}")]
pub struct RenderError(pub String);

impl From<reqwest::Error> for RenderError {
    fn from(value: reqwest::Error) -> Self {
        Self(value.to_string())
    }
}

/// Turns cover sheet parameters into a PDF document.
#[async_trait::async_trait]
pub trait CoverSheetRenderer: Debug + Send + Sync {
    async fn render_cover_sheet(
        &self,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Used when no report server is configured, always fails.
#[derive(Debug)]
pub struct Unconfigured;

#[async_trait::async_trait]
impl CoverSheetRenderer for Unconfigured {
    async fn render_cover_sheet(
        &self,
        _parameters: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, RenderError> {
        Err(RenderError("no report server configured".into()))
    }
}

/// A rendered cover sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverSheetPdf {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct ReportService {
    db: Database,
    renderer: Arc<dyn CoverSheetRenderer>,
}

impl ReportService {
    pub fn new(db: Database, renderer: Arc<dyn CoverSheetRenderer>) -> Self {
        Self { db, renderer }
    }

    /// Render the cover sheet of a project, as selected by the user.
    #[instrument(skip(self), err(level = tracing::Level::INFO))]
    pub async fn generate_cover_sheet_pdf_by_id(
        &self,
        project_id: Option<i32>,
    ) -> Result<CoverSheetPdf, Error> {
        let project_id = project_id.ok_or_else(|| Error::BadRequest(PROJECT_NOT_SELECTED.into()))?;
        let details = load_details(&self.db, project_id)
            .await?
            .ok_or_else(|| Error::NotFound(PROJECT_NOT_FOUND.into()))?;

        self.generate_cover_sheet_pdf(&details).await
    }

    pub async fn generate_cover_sheet_pdf(
        &self,
        details: &ProjectDetails,
    ) -> Result<CoverSheetPdf, Error> {
        let data = assemble(details);
        let content = self.render(&data).await?;

        Ok(CoverSheetPdf {
            file_name: download_file_name(details),
            content,
        })
    }

    async fn render(&self, data: &CoverSheetData) -> Result<Vec<u8>, RenderError> {
        self.renderer
            .render_cover_sheet(&data.to_parameters())
            .await
    }
}

/// The file name offered for download, derived from the project number.
pub fn download_file_name(details: &ProjectDetails) -> String {
    let number = details.project.project_number.trim();
    if number.is_empty() {
        format!("Cover Sheet Jasper - {}.pdf", details.project.id)
    } else {
        format!("Cover Sheet Jasper - {number}.pdf")
    }
}
