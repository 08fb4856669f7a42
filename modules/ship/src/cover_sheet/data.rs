use crate::project::model::ProjectDetails;
use pal_entity::review_approval::{self, ReviewStatus};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// The number of rows of the revision table, no matter how many reviews exist.
pub const REVISION_ROWS: usize = 8;

/// Shown for values which are not present.
pub const PLACEHOLDER: &str = "-";

/// The flat projection of a project, handed to the report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverSheetData {
    pub parameters: BTreeMap<String, String>,
    /// always [`REVISION_ROWS`] entries, most recent review first
    pub revisions: Vec<RevisionRow>,
}

/// One line of the revision table. Padding rows have all fields empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevisionRow {
    pub revision: String,
    pub date: String,
    pub internal_review_status: String,
    pub class_owner_review_status: String,
    pub shipyard_signed: String,
    pub class_signed: String,
    pub owner_delegate_signed: String,
}

impl RevisionRow {
    fn from_review(revision: usize, review: &review_approval::Model) -> Self {
        Self {
            revision: revision.to_string(),
            date: date(&review.created_at),
            internal_review_status: status(review.internal_review_status).into(),
            class_owner_review_status: status(review.class_owner_review_status).into(),
            shipyard_signed: yes_no(review.shipyard_signed).into(),
            class_signed: yes_no(review.class_signed).into(),
            owner_delegate_signed: yes_no(review.owner_delegate_signed).into(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("revision", &self.revision),
            ("date", &self.date),
            ("internal_review_status", &self.internal_review_status),
            ("class_owner_review_status", &self.class_owner_review_status),
            ("shipyard_signed", &self.shipyard_signed),
            ("class_signed", &self.class_signed),
            ("owner_delegate_signed", &self.owner_delegate_signed),
        ]
    }
}

impl CoverSheetData {
    /// All values as report parameters, revision rows flattened as `rev<n>_<field>`.
    pub fn to_parameters(&self) -> BTreeMap<String, String> {
        let mut result = self.parameters.clone();
        for (index, row) in self.revisions.iter().enumerate() {
            for (name, value) in row.fields() {
                result.insert(format!("rev{}_{name}", index + 1), value.to_string());
            }
        }
        result
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

/// Project a project and its current child rows into cover sheet data.
///
/// A pure function of its input, calling it twice yields the same data.
pub fn assemble(details: &ProjectDetails) -> CoverSheetData {
    let project = &details.project;
    let location = details.test_location.as_ref();
    let document = details.supporting_document.as_ref();
    let review = details.review_approval();

    let mut parameters = BTreeMap::new();
    let mut put = |key: &str, value: Option<&str>| {
        parameters.insert(key.to_string(), text(value));
    };

    put("project_name", Some(project.ship_name.as_str()));
    put("project_no", Some(project.project_number.as_str()));
    put("owner", Some(project.owner_delegate.as_str()));
    put("class_name", details.class_name());
    put("test_type", Some(project.test_type.label()));
    put("created", Some(date(&project.created_at).as_str()));

    put("test_location", location.map(|l| l.name.as_str()));
    put("test_site", location.map(|l| l.test_site.as_str()));
    put("sign_class", location.map(|l| yes_no(l.sign_class)));
    put("test_location_note", location.and_then(|l| l.note.as_deref()));

    put(
        "drawing_document_name",
        document.map(|d| d.design_reference.as_str()),
    );
    put("maker_document", document.map(|d| d.maker_document.as_str()));
    put("remarks", document.and_then(|d| d.remarks.as_deref()));

    put(
        "internal_review_status",
        review.map(|r| status(r.internal_review_status)),
    );
    put(
        "class_owner_review_status",
        review.map(|r| status(r.class_owner_review_status)),
    );
    put("shipyard_signed", review.map(|r| yes_no(r.shipyard_signed)));
    put("class_signed", review.map(|r| yes_no(r.class_signed)));
    put(
        "owner_delegate_signed",
        review.map(|r| yes_no(r.owner_delegate_signed)),
    );

    put(
        "project_symbol",
        Some(yes_no(
            project.symbol.as_ref().is_some_and(|s| !s.is_empty()),
        )),
    );

    CoverSheetData {
        parameters,
        revisions: revisions(&details.review_approvals),
    }
}

/// Project reviews, most recent first, into the fixed size revision table.
fn revisions(reviews: &[review_approval::Model]) -> Vec<RevisionRow> {
    let total = reviews.len();
    let mut rows: Vec<_> = reviews
        .iter()
        .take(REVISION_ROWS)
        .enumerate()
        .map(|(index, review)| RevisionRow::from_review(total - 1 - index, review))
        .collect();
    rows.resize_with(REVISION_ROWS, RevisionRow::default);
    rows
}

fn text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "YES" } else { "NO" }
}

fn status(value: ReviewStatus) -> &'static str {
    yes_no(value == ReviewStatus::Yes)
}

fn date(value: &OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        u8::from(value.month()),
        value.day()
    )
}
