//! The four step cover sheet wizard.
//!
//! Steps are walked through query parameters: `step`, `project_id` and an optional `status`
//! token, which only drives the banner shown on top of the page.

pub mod form;
pub mod guard;
pub mod submit;


use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    ProjectData = 1,
    TestLocation = 2,
    SupportingDocuments = 3,
    Review = 4,
}

impl Step {
    pub const ALL: [Self; 4] = [
        Self::ProjectData,
        Self::TestLocation,
        Self::SupportingDocuments,
        Self::Review,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    /// Interpret the `step` query parameter. Anything but a number in `1..=4` is step 1.
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .filter(|value| !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|value| value.parse::<u8>().ok())
            .and_then(Self::from_number)
            .unwrap_or(Self::ProjectData)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ProjectData => "Ship & project data",
            Self::TestLocation => "Test location & class",
            Self::SupportingDocuments => "Supporting documents",
            Self::Review => "Review & approval",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// The status token carried over a redirect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WizardStatus {
    Step1Saved,
    Step2Saved,
    Step3Saved,
    Completed,
    InvalidProject,
}

impl WizardStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Step1Saved => "step1_saved",
            Self::Step2Saved => "step2_saved",
            Self::Step3Saved => "step3_saved",
            Self::Completed => "completed",
            Self::InvalidProject => "invalid_project",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "step1_saved" => Some(Self::Step1Saved),
            "step2_saved" => Some(Self::Step2Saved),
            "step3_saved" => Some(Self::Step3Saved),
            "completed" => Some(Self::Completed),
            "invalid_project" => Some(Self::InvalidProject),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Step1Saved => "Step 1 saved. Continue with the test location.",
            Self::Step2Saved => "Step 2 saved. Continue with the supporting documents.",
            Self::Step3Saved => "Step 3 saved. Continue with review & approval.",
            Self::Completed => "Cover sheet data is complete.",
            Self::InvalidProject => "The project is not valid or has not been selected.",
        }
    }

    pub fn is_warning(self) -> bool {
        matches!(self, Self::InvalidProject)
    }
}

/// How far a project got, counted in child rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub test_locations: u64,
    pub supporting_documents: u64,
    pub review_approvals: u64,
}

/// Where to send the browser after a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardRedirect {
    pub step: Step,
    pub project_id: Option<i32>,
    pub status: WizardStatus,
}

impl WizardRedirect {
    pub fn new(step: Step, project_id: Option<i32>, status: WizardStatus) -> Self {
        Self {
            step,
            project_id,
            status,
        }
    }

    pub fn location(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("step", &self.step.to_string());
        if let Some(id) = self.project_id {
            query.append_pair("project_id", &id.to_string());
        }
        query.append_pair("status", self.status.as_str());
        format!("/tptr/cover-wizard?{}", query.finish())
    }
}
