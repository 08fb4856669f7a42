mod data;
mod service;


pub use data::*;
pub use service::*;
