use super::configure;
use actix_web::{App, http::StatusCode, test::TestRequest};
use pal_module_ship::report::Unconfigured;
use pal_test_context::{
    PalContext,
    call::{CallService, location},
};
use std::sync::Arc;
use test_context::test_context;
use test_log::test;

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn mounts_all_modules(ctx: &PalContext) -> anyhow::Result<()> {
    let db = ctx.db.clone();
    let app = actix_web::test::init_service(
        App::new().configure(move |svc| configure(svc, db, Arc::new(Unconfigured))),
    )
    .await;

    let response = app
        .call_service(TestRequest::get().uri("/pal/theme").to_request())
        .await;
    assert_eq!(Some("/pal/assets".to_string()), location(&response));

    for uri in [
        "/pal/assets",
        "/tptr/cover-wizard",
        "/tptr/ship-projects",
        "/tptr/jasper-cover",
        "/api/v1/ship-class",
    ] {
        let response = app.call_service(TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(StatusCode::OK, response.status(), "GET {uri}");
    }

    Ok(())
}
