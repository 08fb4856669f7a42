use super::view::{Banner, SelectOption, html, redirect};
use crate::{
    Error,
    class::ShipClassService,
    project::{
        model::{
            ProjectDataValues, ProjectDetails, ProjectSummary, ReviewValues,
            SupportingDocumentValues, TestLocationValues,
        },
        service::ProjectService,
    },
    wizard::{
        Step, WizardStatus,
        form::{PROJECT_UNAVAILABLE, WizardForm, build_form},
        guard::{guard, max_available_step},
        submit::{
            Submission, submit_project_data, submit_review, submit_supporting_documents,
            submit_test_location,
        },
    },
};
use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use actix_web::{HttpResponse, get, post, web};
use askama::Template;
use pal_common::form::{checkbox, parse_id, trimmed};
use pal_entity::project::TestType;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WizardQuery {
    pub step: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<String>,
}

/// Show a step of the cover sheet wizard
#[get("/tptr/cover-wizard")]
pub async fn page(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    web::Query(query): web::Query<WizardQuery>,
) -> Result<HttpResponse, Error> {
    let requested = Step::from_query(query.step.as_deref());
    let project = match parse_id(query.project_id.as_deref()) {
        Some(id) => projects.fetch_details(id).await?,
        None => None,
    };

    let (step, warning) = guard(requested, project.as_ref().map(|p| &p.progress));
    let form = build_form(step, project.as_ref(), None);
    let status = query.status.as_deref().and_then(WizardStatus::parse);

    let page = WizardPage::new(&projects, &classes, step, project, form)
        .await?
        .status(status)
        .warning(warning);

    html(&page)
}

/// Step 1 is posted as multipart, to carry the optional project symbol.
#[derive(MultipartForm)]
pub struct ProjectDataUpload {
    project_id: Option<Text<String>>,
    ship_name: Option<Text<String>>,
    project_number: Option<Text<String>>,
    ship_class_id: Option<Text<String>>,
    owner_delegate: Option<Text<String>>,
    test_type: Option<Text<String>>,
    symbol: Option<Bytes>,
}

fn text(value: &Option<Text<String>>) -> Option<&str> {
    value.as_ref().map(|value| value.0.as_str())
}

impl ProjectDataUpload {
    fn values(&self) -> ProjectDataValues {
        ProjectDataValues {
            project_id: parse_id(text(&self.project_id)),
            ship_name: trimmed(text(&self.ship_name)),
            project_number: trimmed(text(&self.project_number)),
            ship_class_id: parse_id(text(&self.ship_class_id)),
            owner_delegate: trimmed(text(&self.owner_delegate)),
            test_type: trimmed(text(&self.test_type)),
            has_symbol: false,
        }
    }

    /// The uploaded symbol, an upload without content counts as no upload.
    fn symbol(self) -> Option<Vec<u8>> {
        self.symbol
            .map(|file| file.data.to_vec())
            .filter(|data| !data.is_empty())
    }
}

/// Save ship & project data
#[post("/tptr/cover-wizard/step1/save")]
pub async fn save_project_data(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    MultipartForm(upload): MultipartForm<ProjectDataUpload>,
) -> Result<HttpResponse, Error> {
    let values = upload.values();
    let submission = submit_project_data(&projects, values, upload.symbol()).await?;
    respond(&projects, &classes, submission).await
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TestLocationForm {
    project_id: Option<String>,
    test_site: Option<String>,
    sign_class: Option<String>,
    note: Option<String>,
}

/// Add a test location
#[post("/tptr/cover-wizard/step2/save")]
pub async fn save_test_location(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    web::Form(form): web::Form<TestLocationForm>,
) -> Result<HttpResponse, Error> {
    let values = TestLocationValues {
        test_site: trimmed(form.test_site.as_deref()),
        sign_class: checkbox(form.sign_class.as_deref()),
        note: trimmed(form.note.as_deref()),
    };
    let project_id = parse_id(form.project_id.as_deref());

    let submission = submit_test_location(&projects, project_id, values).await?;
    respond(&projects, &classes, submission).await
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SupportingDocumentForm {
    project_id: Option<String>,
    design_reference: Option<String>,
    maker_document: Option<String>,
    remarks: Option<String>,
}

/// Add supporting documents
#[post("/tptr/cover-wizard/step3/save")]
pub async fn save_supporting_documents(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    web::Form(form): web::Form<SupportingDocumentForm>,
) -> Result<HttpResponse, Error> {
    let values = SupportingDocumentValues {
        design_reference: trimmed(form.design_reference.as_deref()),
        maker_document: trimmed(form.maker_document.as_deref()),
        remarks: trimmed(form.remarks.as_deref()),
    };
    let project_id = parse_id(form.project_id.as_deref());

    let submission = submit_supporting_documents(&projects, project_id, values).await?;
    respond(&projects, &classes, submission).await
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReviewForm {
    project_id: Option<String>,
    internal_review_status: Option<String>,
    class_owner_review_status: Option<String>,
    shipyard_signed: Option<String>,
    class_signed: Option<String>,
    owner_delegate_signed: Option<String>,
}

/// Record review & approval
#[post("/tptr/cover-wizard/step4/save")]
pub async fn save_review(
    projects: web::Data<ProjectService>,
    classes: web::Data<ShipClassService>,
    web::Form(form): web::Form<ReviewForm>,
) -> Result<HttpResponse, Error> {
    let values = ReviewValues {
        internal_review_status: trimmed(form.internal_review_status.as_deref()),
        class_owner_review_status: trimmed(form.class_owner_review_status.as_deref()),
        shipyard_signed: checkbox(form.shipyard_signed.as_deref()),
        class_signed: checkbox(form.class_signed.as_deref()),
        owner_delegate_signed: checkbox(form.owner_delegate_signed.as_deref()),
    };
    let project_id = parse_id(form.project_id.as_deref());

    let submission = submit_review(&projects, project_id, values).await?;
    respond(&projects, &classes, submission).await
}

async fn respond(
    projects: &ProjectService,
    classes: &ShipClassService,
    submission: Submission,
) -> Result<HttpResponse, Error> {
    match submission {
        Submission::Redirect(target) => Ok(redirect(target.location())),
        Submission::Invalid {
            step,
            project_id,
            message,
            values,
        } => {
            let project = match project_id {
                Some(id) => projects.fetch_details(id).await?,
                None => None,
            };
            let form = build_form(step, project.as_ref(), Some(values));
            let wizard_page = WizardPage::new(projects, classes, step, project, form)
                .await?
                .error(message);
            html(&wizard_page)
        }
    }
}

struct StepLink {
    number: u8,
    title: &'static str,
    /// one of `done`, `active` or `todo`
    state: &'static str,
    href: Option<String>,
}

struct ActiveProject {
    id: i32,
    ship_name: String,
    project_number: String,
    class_name: String,
    test_locations: u64,
    supporting_documents: u64,
    review_approvals: u64,
}

impl From<&ProjectDetails> for ActiveProject {
    fn from(value: &ProjectDetails) -> Self {
        Self {
            id: value.id(),
            ship_name: value.project.ship_name.clone(),
            project_number: value.project.project_number.clone(),
            class_name: value.class_name().unwrap_or("-").to_string(),
            test_locations: value.progress.test_locations,
            supporting_documents: value.progress.supporting_documents,
            review_approvals: value.progress.review_approvals,
        }
    }
}

#[derive(Template)]
#[template(path = "wizard.html")]
struct WizardPage {
    step: u8,
    title: &'static str,
    stepper: Vec<StepLink>,
    project: Option<ActiveProject>,
    resume: Vec<SelectOption>,
    classes: Vec<SelectOption>,
    test_types: Vec<SelectOption>,
    banners: Vec<Banner>,
    error: Option<String>,
    completed: bool,
    form: WizardForm,
    unavailable: &'static str,
}

impl WizardPage {
    async fn new(
        projects: &ProjectService,
        classes: &ShipClassService,
        step: Step,
        project: Option<ProjectDetails>,
        form: WizardForm,
    ) -> Result<Self, Error> {
        let progress = project.as_ref().map(|project| &project.progress);
        let max = max_available_step(progress);
        let project_id = project.as_ref().map(ProjectDetails::id);

        let stepper = Step::ALL
            .into_iter()
            .map(|s| StepLink {
                number: s.number(),
                title: s.title(),
                state: match s.cmp(&step) {
                    std::cmp::Ordering::Less => "done",
                    std::cmp::Ordering::Equal => "active",
                    std::cmp::Ordering::Greater => "todo",
                },
                href: (s <= max).then(|| step_href(s, project_id)),
            })
            .collect();

        let resume = projects
            .list()
            .await?
            .into_iter()
            .map(|summary: ProjectSummary| {
                SelectOption::new(
                    summary.id,
                    format!("{} - {}", summary.project_number, summary.ship_name),
                    Some(summary.id) == project_id,
                )
            })
            .collect();

        let (selected_class, selected_type) = match &form {
            WizardForm::ProjectData(values) => {
                (values.ship_class_id, TestType::parse(&values.test_type))
            }
            _ => (None, None),
        };

        let classes = classes
            .list()
            .await?
            .into_iter()
            .map(|class| SelectOption::new(class.id, class.name, Some(class.id) == selected_class))
            .collect();

        let test_types = [TestType::Hat, TestType::Sat]
            .into_iter()
            .map(|t| SelectOption::new(t.as_str(), t.label(), Some(t) == selected_type))
            .collect();

        Ok(Self {
            step: step.number(),
            title: step.title(),
            stepper,
            project: project.as_ref().map(ActiveProject::from),
            resume,
            classes,
            test_types,
            banners: vec![],
            error: None,
            completed: false,
            form,
            unavailable: PROJECT_UNAVAILABLE,
        })
    }

    fn status(mut self, status: Option<WizardStatus>) -> Self {
        if let Some(status) = status {
            self.banners.push(if status.is_warning() {
                Banner::warning(status.message())
            } else {
                Banner::success(status.message())
            });
            self.completed = status == WizardStatus::Completed;
        }
        self
    }

    fn warning(mut self, warning: Option<&'static str>) -> Self {
        if let Some(warning) = warning {
            self.banners.push(Banner::warning(warning));
        }
        self
    }

    fn error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    fn project_id(&self) -> String {
        self.project
            .as_ref()
            .map(|project| project.id.to_string())
            .unwrap_or_default()
    }
}

fn step_href(step: Step, project_id: Option<i32>) -> String {
    match project_id {
        Some(id) => format!("/tptr/cover-wizard?step={step}&project_id={id}"),
        None => format!("/tptr/cover-wizard?step={step}"),
    }
}
