use super::{Progress, Step};

pub const FINISH_STEP_1: &str = "Finish step 1 (ship & project data) first.";
pub const FINISH_STEP_2: &str = "Finish step 2 (test location & class) first.";
pub const FINISH_STEP_3: &str = "Finish step 3 (supporting documents) first.";

/// Decide which step may actually be shown.
///
/// `progress` is `None` when no project could be resolved. Returns the effective step, and a
/// warning in case the requested step had to be lowered.
pub fn guard(requested: Step, progress: Option<&Progress>) -> (Step, Option<&'static str>) {
    let Some(progress) = progress else {
        return match requested {
            Step::ProjectData => (requested, None),
            _ => (Step::ProjectData, Some(FINISH_STEP_1)),
        };
    };

    if requested > Step::TestLocation && progress.test_locations == 0 {
        return (Step::TestLocation, Some(FINISH_STEP_2));
    }
    if requested > Step::SupportingDocuments && progress.supporting_documents == 0 {
        return (Step::SupportingDocuments, Some(FINISH_STEP_3));
    }

    (requested, None)
}

/// The highest step the stepper may link to.
pub fn max_available_step(progress: Option<&Progress>) -> Step {
    match progress {
        None => Step::ProjectData,
        Some(progress) if progress.test_locations == 0 => Step::TestLocation,
        Some(progress) if progress.supporting_documents == 0 => Step::SupportingDocuments,
        Some(_) => Step::Review,
    }
}
