use pal_entity::{
    project::{self, TestType},
    review_approval::{self, ReviewStatus},
    ship_class, supporting_document, test_location,
};
use serde::{Deserialize, Serialize};

use crate::wizard::Progress;

/// The outcome of validating user input: either the checked value, or the message to show.
pub type Validation<T> = Result<T, &'static str>;

pub const SHIP_NAME_REQUIRED: &str = "Ship name is required.";
pub const PROJECT_NUMBER_REQUIRED: &str = "Project number is required.";
pub const SHIP_CLASS_REQUIRED: &str = "Ship class must be selected.";
pub const SHIP_CLASS_NOT_FOUND: &str = "Selected ship class was not found.";
pub const OWNER_DELEGATE_REQUIRED: &str = "Owner delegate is required.";
pub const TEST_TYPE_INVALID: &str = "Test type must be HAT or SAT.";
pub const TEST_SITE_REQUIRED: &str = "Test site is required.";
pub const DOCUMENTS_REQUIRED: &str = "Design reference and maker document are required.";
pub const REVIEW_STATUS_INVALID: &str = "Review status must be Yes or No.";

/// A project, together with everything derived from its children.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectDetails {
    pub project: project::Model,
    pub ship_class: Option<ship_class::Model>,
    pub progress: Progress,
    /// the most recent test location, if any
    pub test_location: Option<test_location::Model>,
    /// the most recent supporting document, if any
    pub supporting_document: Option<supporting_document::Model>,
    /// review approvals, most recent first
    pub review_approvals: Vec<review_approval::Model>,
}

impl ProjectDetails {
    pub fn id(&self) -> i32 {
        self.project.id
    }

    pub fn review_approval(&self) -> Option<&review_approval::Model> {
        self.review_approvals.first()
    }

    pub fn has_symbol(&self) -> bool {
        self.project
            .symbol
            .as_ref()
            .is_some_and(|symbol| !symbol.is_empty())
    }

    pub fn class_name(&self) -> Option<&str> {
        self.ship_class.as_ref().map(|class| class.name.as_str())
    }
}

/// A line in a project listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: i32,
    pub ship_name: String,
    pub project_number: String,
    pub ship_class_id: i32,
    pub class_name: Option<String>,
    pub owner_delegate: String,
    pub test_type: TestType,
}

/// Ship and project data, as entered into a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectDataValues {
    pub project_id: Option<i32>,
    pub ship_name: String,
    pub project_number: String,
    pub ship_class_id: Option<i32>,
    pub owner_delegate: String,
    /// the raw test type value, kept as entered so it can be echoed back
    pub test_type: String,
    pub has_symbol: bool,
}

impl Default for ProjectDataValues {
    fn default() -> Self {
        Self {
            project_id: None,
            ship_name: String::new(),
            project_number: String::new(),
            ship_class_id: None,
            owner_delegate: String::new(),
            test_type: TestType::default().as_str().to_string(),
            has_symbol: false,
        }
    }
}

impl From<&project::Model> for ProjectDataValues {
    fn from(value: &project::Model) -> Self {
        Self {
            project_id: Some(value.id),
            ship_name: value.ship_name.clone(),
            project_number: value.project_number.clone(),
            ship_class_id: Some(value.ship_class_id),
            owner_delegate: value.owner_delegate.clone(),
            test_type: value.test_type.as_str().to_string(),
            has_symbol: value.symbol.as_ref().is_some_and(|symbol| !symbol.is_empty()),
        }
    }
}

/// Project data which passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectInput {
    pub ship_name: String,
    pub project_number: String,
    pub ship_class_id: i32,
    pub owner_delegate: String,
    pub test_type: TestType,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestLocationValues {
    pub test_site: String,
    pub sign_class: bool,
    pub note: String,
}

impl TestLocationValues {
    pub fn validate(&self) -> Validation<()> {
        if self.test_site.trim().is_empty() {
            return Err(TEST_SITE_REQUIRED);
        }
        Ok(())
    }
}

impl From<&test_location::Model> for TestLocationValues {
    fn from(value: &test_location::Model) -> Self {
        Self {
            test_site: value.test_site.clone(),
            sign_class: value.sign_class,
            note: value.note.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupportingDocumentValues {
    pub design_reference: String,
    pub maker_document: String,
    pub remarks: String,
}

impl SupportingDocumentValues {
    pub fn validate(&self) -> Validation<()> {
        if self.design_reference.trim().is_empty() || self.maker_document.trim().is_empty() {
            return Err(DOCUMENTS_REQUIRED);
        }
        Ok(())
    }
}

impl From<&supporting_document::Model> for SupportingDocumentValues {
    fn from(value: &supporting_document::Model) -> Self {
        Self {
            design_reference: value.design_reference.clone(),
            maker_document: value.maker_document.clone(),
            remarks: value.remarks.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewValues {
    pub internal_review_status: String,
    pub class_owner_review_status: String,
    pub shipyard_signed: bool,
    pub class_signed: bool,
    pub owner_delegate_signed: bool,
}

impl Default for ReviewValues {
    fn default() -> Self {
        Self {
            internal_review_status: ReviewStatus::default().as_str().to_string(),
            class_owner_review_status: ReviewStatus::default().as_str().to_string(),
            shipyard_signed: false,
            class_signed: false,
            owner_delegate_signed: false,
        }
    }
}

impl ReviewValues {
    pub fn validate(&self) -> Validation<ReviewInput> {
        let (Some(internal), Some(class_owner)) = (
            ReviewStatus::parse(&self.internal_review_status),
            ReviewStatus::parse(&self.class_owner_review_status),
        ) else {
            return Err(REVIEW_STATUS_INVALID);
        };

        Ok(ReviewInput {
            internal_review_status: internal,
            class_owner_review_status: class_owner,
            shipyard_signed: self.shipyard_signed,
            class_signed: self.class_signed,
            owner_delegate_signed: self.owner_delegate_signed,
        })
    }

    /// Blank statuses are shown as "no" when the form comes back with an error.
    pub fn for_echo(mut self) -> Self {
        for status in [
            &mut self.internal_review_status,
            &mut self.class_owner_review_status,
        ] {
            if status.trim().is_empty() {
                *status = ReviewStatus::No.as_str().to_string();
            }
        }
        self
    }
}

impl From<&review_approval::Model> for ReviewValues {
    fn from(value: &review_approval::Model) -> Self {
        Self {
            internal_review_status: value.internal_review_status.as_str().to_string(),
            class_owner_review_status: value.class_owner_review_status.as_str().to_string(),
            shipyard_signed: value.shipyard_signed,
            class_signed: value.class_signed,
            owner_delegate_signed: value.owner_delegate_signed,
        }
    }
}

/// Review data which passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewInput {
    pub internal_review_status: ReviewStatus,
    pub class_owner_review_status: ReviewStatus,
    pub shipyard_signed: bool,
    pub class_signed: bool,
    pub owner_delegate_signed: bool,
}

/// Name a test location after its site and the project number.
pub fn test_location_name(test_site: &str, project_number: &str) -> String {
    match (test_site.trim(), project_number.trim()) {
        ("", _) => "Test location".to_string(),
        (site, "") => site.to_string(),
        (site, number) => format!("{site} - {number}"),
    }
}
