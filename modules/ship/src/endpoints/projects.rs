use super::view::{Banner, SelectOption, html, redirect};
use crate::{
    Error,
    class::ShipClassService,
    cover_sheet::CoverSheetService,
    project::{
        model::{ProjectDataValues, ProjectSummary},
        service::ProjectService,
    },
};
use actix_web::{
    HttpResponse, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web,
};
use askama::Template;
use pal_common::form::{parse_id, trimmed};
use pal_entity::project::TestType;
use serde::Deserialize;

const PAGE: &str = "/tptr/ship-projects";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    status: Option<String>,
    edit: Option<String>,
}

/// List projects, with a form to create or edit one
#[get("/tptr/ship-projects")]
pub async fn list(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    web::Query(query): web::Query<ProjectsQuery>,
) -> Result<HttpResponse, Error> {
    let editing = match parse_id(query.edit.as_deref()) {
        Some(id) => projects.fetch(id).await?,
        None => None,
    };
    let values = editing
        .as_ref()
        .map(ProjectDataValues::from)
        .unwrap_or_default();

    let page = ProjectsPage::new(&projects, &classes, values)
        .await?
        .status(query.status.as_deref());
    html(&page)
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProjectForm {
    ship_name: Option<String>,
    project_number: Option<String>,
    ship_class_id: Option<String>,
    owner_delegate: Option<String>,
    test_type: Option<String>,
}

impl ProjectForm {
    fn values(&self, project_id: Option<i32>) -> ProjectDataValues {
        ProjectDataValues {
            project_id,
            ship_name: trimmed(self.ship_name.as_deref()),
            project_number: trimmed(self.project_number.as_deref()),
            ship_class_id: parse_id(self.ship_class_id.as_deref()),
            owner_delegate: trimmed(self.owner_delegate.as_deref()),
            test_type: trimmed(self.test_type.as_deref()),
            has_symbol: false,
        }
    }
}

/// Create a project
#[post("/tptr/ship-projects/create")]
pub async fn create(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    web::Form(form): web::Form<ProjectForm>,
) -> Result<HttpResponse, Error> {
    let values = form.values(None);
    match projects.validate(&values).await? {
        Ok(input) => {
            projects.create(input, None).await?;
            Ok(redirect(format!("{PAGE}?status=created")))
        }
        Err(message) => {
            let page = ProjectsPage::new(&projects, &classes, values)
                .await?
                .error(message);
            html(&page)
        }
    }
}

/// Update a project
#[post("/tptr/ship-projects/{id}/update")]
pub async fn update(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    id: web::Path<i32>,
    web::Form(form): web::Form<ProjectForm>,
) -> Result<HttpResponse, Error> {
    let id = id.into_inner();
    if projects.fetch(id).await?.is_none() {
        return Ok(redirect(format!("{PAGE}?status=not_found")));
    }

    let values = form.values(Some(id));
    match projects.validate(&values).await? {
        Ok(input) => Ok(match projects.update(id, input, None).await? {
            Some(_) => redirect(format!("{PAGE}?status=updated")),
            None => redirect(format!("{PAGE}?status=not_found")),
        }),
        Err(message) => {
            let page = ProjectsPage::new(&projects, &classes, values)
                .await?
                .error(message);
            html(&page)
        }
    }
}

/// Delete a project, with all its data
#[post("/tptr/ship-projects/{id}/delete")]
pub async fn delete(
    projects: web::Data<ProjectService>,
    id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    Ok(match projects.delete(id.into_inner()).await? {
        true => redirect(format!("{PAGE}?status=deleted")),
        false => redirect(format!("{PAGE}?status=not_found")),
    })
}

/// Download the last generated cover sheet of a project
#[get("/tptr/projects/{id}/cover-sheet")]
pub async fn cover_sheet(
    cover_sheets: web::Data<CoverSheetService>,
    id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let Some(sheet) = cover_sheets.fetch(id.into_inner()).await? else {
        return Err(Error::NotFound(
            "No cover sheet has been generated for this project.".into(),
        ));
    };

    Ok(HttpResponse::Ok()
        .content_type(sheet.mime_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(sheet.file_name)],
        })
        .body(sheet.content))
}

struct ProjectRow {
    id: i32,
    ship_name: String,
    project_number: String,
    class_name: String,
    owner_delegate: String,
    test_type: &'static str,
}

impl From<ProjectSummary> for ProjectRow {
    fn from(value: ProjectSummary) -> Self {
        Self {
            id: value.id,
            ship_name: value.ship_name,
            project_number: value.project_number,
            class_name: value.class_name.unwrap_or_else(|| "-".into()),
            owner_delegate: value.owner_delegate,
            test_type: value.test_type.label(),
        }
    }
}

#[derive(Template)]
#[template(path = "projects.html")]
struct ProjectsPage {
    projects: Vec<ProjectRow>,
    values: ProjectDataValues,
    action: String,
    classes: Vec<SelectOption>,
    test_types: Vec<SelectOption>,
    banner: Option<Banner>,
    error: Option<String>,
}

impl ProjectsPage {
    async fn new(
        projects: &ProjectService,
        classes: &ShipClassService,
        values: ProjectDataValues,
    ) -> Result<Self, Error> {
        let action = match values.project_id {
            Some(id) => format!("{PAGE}/{id}/update"),
            None => format!("{PAGE}/create"),
        };
        let selected_type = TestType::parse(&values.test_type);

        Ok(Self {
            projects: projects
                .list()
                .await?
                .into_iter()
                .map(ProjectRow::from)
                .collect(),
            classes: classes
                .list()
                .await?
                .into_iter()
                .map(|class| {
                    SelectOption::new(class.id, class.name, Some(class.id) == values.ship_class_id)
                })
                .collect(),
            test_types: [TestType::Hat, TestType::Sat]
                .into_iter()
                .map(|t| SelectOption::new(t.as_str(), t.label(), Some(t) == selected_type))
                .collect(),
            values,
            action,
            banner: None,
            error: None,
        })
    }

    fn status(mut self, status: Option<&str>) -> Self {
        self.banner = match status {
            Some("created") => Some(Banner::success("Project created.")),
            Some("updated") => Some(Banner::success("Project updated.")),
            Some("deleted") => Some(Banner::success("Project deleted.")),
            Some("not_found") => Some(Banner::warning("Project not found.")),
            _ => None,
        };
        self
    }

    fn error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    fn editing(&self) -> bool {
        self.values.project_id.is_some()
    }
}
