pub mod class;
pub mod cover_sheet;
pub mod endpoints;
pub mod project;
pub mod report;
pub mod wizard;

mod error;

pub use error::Error;
