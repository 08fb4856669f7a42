use super::Step;
use crate::project::model::{
    ProjectDataValues, ProjectDetails, ReviewValues, SupportingDocumentValues, TestLocationValues,
};

pub const PROJECT_UNAVAILABLE: &str = "Project not available, complete step 1 first.";

/// A child step form, bound to the project it adds to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildForm<T> {
    pub project_id: i32,
    pub values: T,
}

/// The form shown for a wizard step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardForm {
    ProjectData(ProjectDataValues),
    TestLocation(ChildForm<TestLocationValues>),
    SupportingDocuments(ChildForm<SupportingDocumentValues>),
    Review(ChildForm<ReviewValues>),
    /// A child step was requested, but there is no project to add to.
    ProjectUnavailable,
}

/// Values posted by the user, echoed back when validation fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submitted {
    ProjectData(ProjectDataValues),
    TestLocation(TestLocationValues),
    SupportingDocuments(SupportingDocumentValues),
    Review(ReviewValues),
}

impl Submitted {
    pub fn step(&self) -> Step {
        match self {
            Self::ProjectData(_) => Step::ProjectData,
            Self::TestLocation(_) => Step::TestLocation,
            Self::SupportingDocuments(_) => Step::SupportingDocuments,
            Self::Review(_) => Step::Review,
        }
    }
}

/// Build the form of a step.
///
/// Values come from what was submitted, then from the project and its current child rows,
/// then from defaults. Submitted values of another step are ignored.
pub fn build_form(
    step: Step,
    project: Option<&ProjectDetails>,
    submitted: Option<Submitted>,
) -> WizardForm {
    let submitted = submitted.filter(|submitted| submitted.step() == step);

    match step {
        Step::ProjectData => WizardForm::ProjectData(match submitted {
            Some(Submitted::ProjectData(values)) => ProjectDataValues {
                project_id: project.map(ProjectDetails::id),
                has_symbol: project.is_some_and(ProjectDetails::has_symbol),
                ..values
            },
            _ => project
                .map(|project| ProjectDataValues::from(&project.project))
                .unwrap_or_default(),
        }),
        Step::TestLocation => child(project, WizardForm::TestLocation, |project| {
            match submitted {
                Some(Submitted::TestLocation(values)) => values,
                _ => project
                    .test_location
                    .as_ref()
                    .map(TestLocationValues::from)
                    .unwrap_or_default(),
            }
        }),
        Step::SupportingDocuments => {
            child(project, WizardForm::SupportingDocuments, |project| {
                match submitted {
                    Some(Submitted::SupportingDocuments(values)) => values,
                    _ => project
                        .supporting_document
                        .as_ref()
                        .map(SupportingDocumentValues::from)
                        .unwrap_or_default(),
                }
            })
        }
        Step::Review => child(project, WizardForm::Review, |project| match submitted {
            Some(Submitted::Review(values)) => values,
            _ => project
                .review_approval()
                .map(ReviewValues::from)
                .unwrap_or_default(),
        }),
    }
}

fn child<T>(
    project: Option<&ProjectDetails>,
    form: fn(ChildForm<T>) -> WizardForm,
    values: impl FnOnce(&ProjectDetails) -> T,
) -> WizardForm {
    match project {
        Some(project) => form(ChildForm {
            project_id: project.id(),
            values: values(project),
        }),
        None => WizardForm::ProjectUnavailable,
    }
}
