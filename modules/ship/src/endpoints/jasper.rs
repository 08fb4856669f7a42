use super::view::{Banner, SelectOption, html, location, redirect};
use crate::{
    Error,
    cover_sheet::{PDF_MIME_TYPE, PLACEHOLDER, assemble},
    project::{model::ProjectDetails, service::ProjectService},
    report::ReportService,
};
use actix_web::{
    HttpResponse, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web,
};
use askama::Template;
use pal_common::form::parse_id;
use serde::Deserialize;

const PAGE: &str = "/tptr/jasper-cover";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct JasperQuery {
    project_id: Option<String>,
    status: Option<String>,
    error: Option<String>,
}

/// Pick a project and preview what its cover sheet will show
#[get("/tptr/jasper-cover")]
pub async fn page(
    projects: web::Data<ProjectService>,
    web::Query(query): web::Query<JasperQuery>,
) -> Result<HttpResponse, Error> {
    let summaries = projects.list().await?;

    let requested = parse_id(query.project_id.as_deref())
        .filter(|id| summaries.iter().any(|summary| summary.id == *id));
    let selected = requested.or_else(|| summaries.first().map(|summary| summary.id));

    let details = match selected {
        Some(id) => projects.fetch_details(id).await?,
        None => None,
    };

    let banner = match query.status.as_deref() {
        Some("invalid_project") => Some(Banner::warning(
            "The project is not valid or has not been selected.",
        )),
        Some("download_error") => Some(Banner::danger(format!(
            "Failed to create the PDF: {}",
            query
                .error
                .as_deref()
                .unwrap_or("an error occurred while creating the PDF.")
        ))),
        _ => None,
    };

    let page = JasperCoverPage {
        options: summaries
            .into_iter()
            .map(|summary| {
                SelectOption::new(
                    summary.id,
                    format!("{} - {}", summary.project_number, summary.ship_name),
                    Some(summary.id) == selected,
                )
            })
            .collect(),
        preview: Preview::new(details.as_ref()),
        banner,
    };

    html(&page)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DownloadForm {
    project_id: Option<String>,
}

/// Render and download the cover sheet of a project
#[post("/tptr/jasper-cover/download")]
pub async fn download(
    reports: web::Data<ReportService>,
    web::Form(form): web::Form<DownloadForm>,
) -> Result<HttpResponse, Error> {
    let invalid = || redirect(format!("{PAGE}?status=invalid_project"));

    let Some(project_id) = parse_id(form.project_id.as_deref()) else {
        return Ok(invalid());
    };

    match reports.generate_cover_sheet_pdf_by_id(Some(project_id)).await {
        Ok(pdf) => Ok(HttpResponse::Ok()
            .content_type(PDF_MIME_TYPE)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(pdf.file_name)],
            })
            .body(pdf.content)),
        Err(Error::NotFound(_)) => Ok(invalid()),
        Err(err) => {
            log::warn!("Failed to render the cover sheet of project {project_id}: {err}");
            Ok(redirect(location(
                PAGE,
                [
                    ("status", "download_error".to_string()),
                    ("project_id", project_id.to_string()),
                    ("error", err.to_string()),
                ],
            )))
        }
    }
}

struct Preview {
    project_name: String,
    project_no: String,
    owner: String,
    class_name: String,
    drawing_document_name: String,
}

impl Preview {
    fn new(details: Option<&ProjectDetails>) -> Self {
        let data = details.map(assemble).unwrap_or_default();
        let value = |key: &str| data.get(key).unwrap_or(PLACEHOLDER).to_string();

        Self {
            project_name: value("project_name"),
            project_no: value("project_no"),
            owner: value("owner"),
            class_name: value("class_name"),
            drawing_document_name: value("drawing_document_name"),
        }
    }
}

#[derive(Template)]
#[template(path = "jasper_cover.html")]
struct JasperCoverPage {
    options: Vec<SelectOption>,
    preview: Preview,
    banner: Option<Banner>,
}
