pub mod asset;
pub mod location;

pub mod project;
pub mod ship_class;

pub mod review_approval;
pub mod supporting_document;
pub mod test_location;

pub mod cover_sheet;
