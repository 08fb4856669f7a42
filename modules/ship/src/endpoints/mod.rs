mod classes;
mod jasper;
mod projects;
mod view;
mod wizard;

#[cfg(test)]
mod test;

use crate::{
    class::ShipClassService, cover_sheet::CoverSheetService, project::service::ProjectService,
    report::{CoverSheetRenderer, ReportService},
};
use actix_multipart::form::MultipartFormConfig;
use actix_web::web;
use pal_common::db::Database;
use std::sync::Arc;

/// The limit of a step 1 upload, including the project symbol.
pub const UPLOAD_LIMIT: usize = 4 * 1024 * 1024;

/// mount the "ship" module
pub fn configure(
    svc: &mut web::ServiceConfig,
    db: Database,
    renderer: Arc<dyn CoverSheetRenderer>,
) {
    let report = ReportService::new(db.clone(), renderer);
    let cover_sheets = CoverSheetService::new(db.clone(), report.clone());
    let projects = ProjectService::new(db.clone(), cover_sheets.clone());
    let classes = ShipClassService::new(db);

    svc.app_data(web::Data::new(report))
        .app_data(web::Data::new(cover_sheets))
        .app_data(web::Data::new(projects))
        .app_data(web::Data::new(classes))
        .app_data(
            MultipartFormConfig::default()
                .total_limit(UPLOAD_LIMIT)
                .memory_limit(UPLOAD_LIMIT),
        )
        .service(wizard::page)
        .service(wizard::save_project_data)
        .service(wizard::save_test_location)
        .service(wizard::save_supporting_documents)
        .service(wizard::save_review)
        .service(projects::list)
        .service(projects::create)
        .service(projects::update)
        .service(projects::delete)
        .service(projects::cover_sheet)
        .service(jasper::page)
        .service(jasper::download)
        .service(classes::all)
        .service(classes::create)
        .service(classes::delete);
}
