use super::{Step, WizardRedirect, WizardStatus, form::Submitted};
use crate::{
    Error,
    report::PROJECT_NOT_FOUND,
    project::{
        model::{ProjectDataValues, ReviewValues, SupportingDocumentValues, TestLocationValues},
        service::ProjectService,
    },
};
use pal_entity::project;
use tracing::instrument;

/// The outcome of submitting a wizard step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Continue somewhere else
    Redirect(WizardRedirect),
    /// Show the same step again, nothing was stored
    Invalid {
        step: Step,
        project_id: Option<i32>,
        message: &'static str,
        values: Submitted,
    },
}

impl Submission {
    fn invalid_project() -> Self {
        Self::Redirect(WizardRedirect::new(
            Step::ProjectData,
            None,
            WizardStatus::InvalidProject,
        ))
    }
}

/// Step 1: create the project, or update it when resuming.
#[instrument(skip(service, values, symbol), err)]
pub async fn submit_project_data(
    service: &ProjectService,
    values: ProjectDataValues,
    symbol: Option<Vec<u8>>,
) -> Result<Submission, Error> {
    let project = resolve(service, values.project_id).await?;

    let input = match service.validate(&values).await? {
        Ok(input) => input,
        Err(message) => {
            let project_id = project.as_ref().map(|project| project.id);
            return Ok(Submission::Invalid {
                step: Step::ProjectData,
                project_id,
                message,
                values: Submitted::ProjectData(ProjectDataValues {
                    project_id,
                    ..values
                }),
            });
        }
    };

    let project = match project {
        Some(project) => service
            .update(project.id, input, symbol)
            .await?
            .ok_or_else(|| Error::NotFound(PROJECT_NOT_FOUND.into()))?,
        None => service.create(input, symbol).await?,
    };

    Ok(Submission::Redirect(WizardRedirect::new(
        Step::TestLocation,
        Some(project.id),
        WizardStatus::Step1Saved,
    )))
}

/// Step 2: add a test location to the project.
#[instrument(skip(service, values), err)]
pub async fn submit_test_location(
    service: &ProjectService,
    project_id: Option<i32>,
    values: TestLocationValues,
) -> Result<Submission, Error> {
    let Some(project) = resolve(service, project_id).await? else {
        return Ok(Submission::invalid_project());
    };

    if let Err(message) = values.validate() {
        return Ok(Submission::Invalid {
            step: Step::TestLocation,
            project_id: Some(project.id),
            message,
            values: Submitted::TestLocation(values),
        });
    }

    service.add_test_location(&project, &values).await?;

    Ok(Submission::Redirect(WizardRedirect::new(
        Step::SupportingDocuments,
        Some(project.id),
        WizardStatus::Step2Saved,
    )))
}

/// Step 3: add supporting documents to the project.
#[instrument(skip(service, values), err)]
pub async fn submit_supporting_documents(
    service: &ProjectService,
    project_id: Option<i32>,
    values: SupportingDocumentValues,
) -> Result<Submission, Error> {
    let Some(project) = resolve(service, project_id).await? else {
        return Ok(Submission::invalid_project());
    };

    if let Err(message) = values.validate() {
        return Ok(Submission::Invalid {
            step: Step::SupportingDocuments,
            project_id: Some(project.id),
            message,
            values: Submitted::SupportingDocuments(values),
        });
    }

    service.add_supporting_document(project.id, &values).await?;

    Ok(Submission::Redirect(WizardRedirect::new(
        Step::Review,
        Some(project.id),
        WizardStatus::Step3Saved,
    )))
}

/// Step 4: record a review of the project. The wizard stays on this step.
#[instrument(skip(service, values), err)]
pub async fn submit_review(
    service: &ProjectService,
    project_id: Option<i32>,
    values: ReviewValues,
) -> Result<Submission, Error> {
    let Some(project) = resolve(service, project_id).await? else {
        return Ok(Submission::invalid_project());
    };

    let input = match values.validate() {
        Ok(input) => input,
        Err(message) => {
            return Ok(Submission::Invalid {
                step: Step::Review,
                project_id: Some(project.id),
                message,
                values: Submitted::Review(values.for_echo()),
            });
        }
    };

    service.add_review_approval(project.id, input).await?;

    Ok(Submission::Redirect(WizardRedirect::new(
        Step::Review,
        Some(project.id),
        WizardStatus::Completed,
    )))
}

async fn resolve(
    service: &ProjectService,
    project_id: Option<i32>,
) -> Result<Option<project::Model>, Error> {
    match project_id {
        Some(id) => service.fetch(id).await,
        None => Ok(None),
    }
}
