mod assets;
mod view;


use crate::service::{AssetService, LocationService};
use actix_web::web;
use pal_common::db::Database;

/// mount the "asset" module
pub fn configure(svc: &mut web::ServiceConfig, db: Database) {
    let assets = AssetService::new(db.clone());
    let locations = LocationService::new(db);

    svc.app_data(web::Data::new(assets))
        .app_data(web::Data::new(locations))
        .service(assets::theme)
        .service(assets::list)
        .service(assets::submit)
        .service(assets::edit_page)
        .service(assets::edit)
        .service(assets::delete);
}
