use super::configure;
use crate::{
    class::{NAME_EXISTS, ShipClass},
    project::model::{SHIP_CLASS_NOT_FOUND, SHIP_NAME_REQUIRED, TEST_SITE_REQUIRED},
    report::CoverSheetRenderer,
    test::FakeRenderer,
    wizard::guard::{FINISH_STEP_1, FINISH_STEP_2, FINISH_STEP_3},
};
use actix_http::Request;
use actix_web::{
    App, Error,
    dev::{Service, ServiceResponse},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    test::{TestRequest, init_service, read_body},
};
use pal_common::error::ErrorInformation;
use pal_test_context::{
    PalContext,
    call::{CallService, location},
    multipart::MultipartBody,
};
use serde_json::json;
use std::sync::Arc;
use test_context::test_context;
use test_log::test;

async fn app(
    ctx: &PalContext,
    renderer: Arc<dyn CoverSheetRenderer>,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let db = ctx.db.clone();
    init_service(App::new().configure(move |svc| configure(svc, db, renderer))).await
}

async fn body(response: ServiceResponse) -> String {
    String::from_utf8_lossy(&read_body(response).await).into_owned()
}

/// A message, as it shows up in a page.
fn escaped(message: &str) -> String {
    message.replace('&', "&amp;")
}

/// Extract a query parameter from the location of a redirect.
fn query_value(response: &ServiceResponse, key: &str) -> Option<String> {
    let location = location(response)?;
    let (_, query) = location.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

async fn create_class(app: &impl CallService, name: &str) -> ShipClass {
    let request = TestRequest::post()
        .uri("/api/v1/ship-class")
        .set_json(json!({"name": name}))
        .to_request();
    app.call_and_read_body_json(request).await
}

fn step1_request(class_id: i32, ship_name: &str) -> Request {
    let (content_type, payload) = MultipartBody::new()
        .text("ship_name", ship_name)
        .text("project_number", "W000312")
        .text("ship_class_id", &class_id.to_string())
        .text("owner_delegate", "Satgas")
        .text("test_type", "hat")
        .file("symbol", "", b"")
        .build();

    TestRequest::post()
        .uri("/tptr/cover-wizard/step1/save")
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request()
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn ship_classes(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::default())).await;

    let frigate = create_class(&app, "Frigate").await;
    create_class(&app, "Corvette").await;

    let request = TestRequest::post()
        .uri("/api/v1/ship-class")
        .set_json(json!({"name": "Frigate"}))
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::CONFLICT, response.status());
    let info: ErrorInformation = serde_json::from_slice(&read_body(response).await)?;
    assert_eq!(NAME_EXISTS, info.message);

    let request = TestRequest::get().uri("/api/v1/ship-class").to_request();
    let classes: Vec<ShipClass> = app.call_and_read_body_json(request).await;
    let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(vec!["Corvette", "Frigate"], names);

    let request = TestRequest::delete()
        .uri(&format!("/api/v1/ship-class/{}", frigate.id))
        .to_request();
    assert_eq!(StatusCode::NO_CONTENT, app.call_service(request).await.status());

    Ok(())
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn wizard_guards_steps(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::default())).await;

    let request = TestRequest::get()
        .uri("/tptr/cover-wizard?step=3")
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::OK, response.status());
    let html = body(response).await;
    assert!(html.contains(&escaped(FINISH_STEP_1)));
    assert!(html.contains("Step 1: Ship &amp; project data"));

    let request = TestRequest::get()
        .uri("/tptr/cover-wizard?step=abc&status=invalid_project")
        .to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains("The project is not valid or has not been selected."));
    assert!(html.contains("step1/save"));

    Ok(())
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn wizard_walkthrough(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::default())).await;
    let class = create_class(&app, "Frigate").await;

    // step 1, invalid: the form comes back, escaped
    let response = app
        .call_service(step1_request(class.id + 1, "<KRI Nala>"))
        .await;
    assert_eq!(StatusCode::OK, response.status());
    let html = body(response).await;
    assert!(html.contains(SHIP_CLASS_NOT_FOUND));
    assert!(html.contains("&lt;KRI Nala&gt;"));
    assert!(!html.contains("<KRI Nala>"));

    // step 1, blank ship name: everything else is kept
    let response = app.call_service(step1_request(class.id, "")).await;
    assert_eq!(StatusCode::OK, response.status());
    let html = body(response).await;
    assert!(html.contains(SHIP_NAME_REQUIRED));
    assert!(html.contains(r#"value="W000312""#));
    assert!(html.contains(r#"value="Satgas""#));
    assert!(html.contains(&format!(
        r#"<option value="{}" selected="selected">Frigate</option>"#,
        class.id
    )));
    assert!(html.contains(r#"<option value="hat" selected="selected">HAT</option>"#));

    // step 1, valid
    let response = app
        .call_service(step1_request(class.id, "KRI Nala"))
        .await;
    assert_eq!(StatusCode::SEE_OTHER, response.status());
    assert_eq!(Some("2".into()), query_value(&response, "step"));
    assert_eq!(Some("step1_saved".into()), query_value(&response, "status"));
    let project_id = query_value(&response, "project_id").expect("project id");

    // jumping ahead is guarded
    let request = TestRequest::get()
        .uri(&format!("/tptr/cover-wizard?step=4&project_id={project_id}"))
        .to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains(&escaped(FINISH_STEP_2)));
    assert!(html.contains("step2/save"));

    // step 2
    let request = TestRequest::post()
        .uri("/tptr/cover-wizard/step2/save")
        .set_form([("project_id", project_id.as_str()), ("test_site", " ")])
        .to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains(TEST_SITE_REQUIRED));

    let request = TestRequest::post()
        .uri("/tptr/cover-wizard/step2/save")
        .set_form([
            ("project_id", project_id.as_str()),
            ("test_site", "Dock 3"),
            ("sign_class", "1"),
        ])
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::SEE_OTHER, response.status());
    assert_eq!(Some("step2_saved".into()), query_value(&response, "status"));

    let request = TestRequest::get()
        .uri(&format!("/tptr/cover-wizard?step=4&project_id={project_id}"))
        .to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains(FINISH_STEP_3));

    // step 3
    let request = TestRequest::post()
        .uri("/tptr/cover-wizard/step3/save")
        .set_form([
            ("project_id", project_id.as_str()),
            ("design_reference", "DR-01"),
            ("maker_document", "MK-02"),
        ])
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(Some("4".into()), query_value(&response, "step"));
    assert_eq!(Some("step3_saved".into()), query_value(&response, "status"));

    // step 4
    let request = TestRequest::post()
        .uri("/tptr/cover-wizard/step4/save")
        .set_form([
            ("project_id", project_id.as_str()),
            ("internal_review_status", "yes"),
            ("class_owner_review_status", "no"),
            ("shipyard_signed", "1"),
        ])
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(Some("4".into()), query_value(&response, "step"));
    assert_eq!(Some("completed".into()), query_value(&response, "status"));

    let target = location(&response).expect("location");
    let html = body(app.call_service(TestRequest::get().uri(&target).to_request()).await).await;
    assert!(html.contains("Cover sheet data is complete."));
    assert!(html.contains("final-actions"));
    assert!(html.contains("L: 1 / D: 1 / R: 1"));

    // the stored cover sheet is available
    let request = TestRequest::get()
        .uri(&format!("/tptr/projects/{project_id}/cover-sheet"))
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(
        "application/pdf",
        response.headers().get(CONTENT_TYPE).expect("content type")
    );

    Ok(())
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn child_step_without_project(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::default())).await;

    for (step, field) in [
        ("step2", "test_site"),
        ("step3", "design_reference"),
        ("step4", "internal_review_status"),
    ] {
        let request = TestRequest::post()
            .uri(&format!("/tptr/cover-wizard/{step}/save"))
            .set_form([("project_id", "999"), (field, "x")])
            .to_request();
        let response = app.call_service(request).await;
        assert_eq!(StatusCode::SEE_OTHER, response.status());
        assert_eq!(
            Some("/tptr/cover-wizard?step=1&status=invalid_project".to_string()),
            location(&response)
        );
    }

    Ok(())
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn project_crud(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::default())).await;
    let class = create_class(&app, "Frigate").await;
    let class_id = class.id.to_string();

    let form = |ship_name: &'static str| {
        [
            ("ship_name", ship_name.to_string()),
            ("project_number", "W000777".to_string()),
            ("ship_class_id", class_id.clone()),
            ("owner_delegate", "Satgas".to_string()),
            ("test_type", "sat".to_string()),
        ]
    };

    let request = TestRequest::post()
        .uri("/tptr/ship-projects/create")
        .set_form(form(""))
        .to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains(SHIP_NAME_REQUIRED));

    let request = TestRequest::post()
        .uri("/tptr/ship-projects/create")
        .set_form(form("KRI Nala"))
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(
        Some("/tptr/ship-projects?status=created".to_string()),
        location(&response)
    );

    let request = TestRequest::get()
        .uri("/tptr/ship-projects?status=created")
        .to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains("Project created."));
    assert!(html.contains("W000777"));
    assert!(html.contains("SAT"));

    let request = TestRequest::post()
        .uri("/tptr/ship-projects/4711/update")
        .set_form(form("KRI Nala"))
        .to_request();
    assert_eq!(
        Some("/tptr/ship-projects?status=not_found".to_string()),
        location(&app.call_service(request).await)
    );

    Ok(())
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn project_update_and_delete(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::default())).await;
    let class = create_class(&app, "Frigate").await;

    let response = app
        .call_service(step1_request(class.id, "KRI Nala"))
        .await;
    let project_id = query_value(&response, "project_id").expect("project id");
    let class_id = class.id.to_string();

    let request = TestRequest::post()
        .uri(&format!("/tptr/ship-projects/{project_id}/update"))
        .set_form([
            ("ship_name", "KRI Nala II"),
            ("project_number", "W000312"),
            ("ship_class_id", class_id.as_str()),
            ("owner_delegate", "Satgas"),
            ("test_type", "hat"),
        ])
        .to_request();
    assert_eq!(
        Some("/tptr/ship-projects?status=updated".to_string()),
        location(&app.call_service(request).await)
    );

    let request = TestRequest::get()
        .uri(&format!("/tptr/ship-projects?edit={project_id}"))
        .to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains("Edit project"));
    assert!(html.contains("KRI Nala II"));

    for expected in ["deleted", "not_found"] {
        let request = TestRequest::post()
            .uri(&format!("/tptr/ship-projects/{project_id}/delete"))
            .to_request();
        assert_eq!(
            Some(format!("/tptr/ship-projects?status={expected}")),
            location(&app.call_service(request).await)
        );
    }

    let request = TestRequest::get()
        .uri(&format!("/tptr/projects/{project_id}/cover-sheet"))
        .to_request();
    assert_eq!(StatusCode::NOT_FOUND, app.call_service(request).await.status());

    Ok(())
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn jasper_download(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::default())).await;
    let class = create_class(&app, "Frigate").await;
    let response = app
        .call_service(step1_request(class.id, "KRI Nala"))
        .await;
    let project_id = query_value(&response, "project_id").expect("project id");

    // the newest project is preselected
    let request = TestRequest::get().uri("/tptr/jasper-cover").to_request();
    let html = body(app.call_service(request).await).await;
    assert!(html.contains("KRI Nala"));
    assert!(html.contains("selected=\"selected\""));

    let request = TestRequest::post()
        .uri("/tptr/jasper-cover/download")
        .set_form([("project_id", project_id.as_str())])
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::OK, response.status());
    let disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .expect("content disposition")
        .to_str()?
        .to_string();
    assert!(disposition.contains("Cover Sheet Jasper - W000312.pdf"));
    assert!(body(response).await.starts_with("%PDF"));

    for project_id in ["", "abc", "4711"] {
        let request = TestRequest::post()
            .uri("/tptr/jasper-cover/download")
            .set_form([("project_id", project_id)])
            .to_request();
        assert_eq!(
            Some("/tptr/jasper-cover?status=invalid_project".to_string()),
            location(&app.call_service(request).await)
        );
    }

    Ok(())
}

#[test_context(PalContext)]
#[test(actix_web::test)]
async fn jasper_download_error(ctx: &PalContext) -> anyhow::Result<()> {
    let app = app(ctx, Arc::new(FakeRenderer::failing())).await;
    let class = create_class(&app, "Frigate").await;
    let response = app
        .call_service(step1_request(class.id, "KRI Nala"))
        .await;
    let project_id = query_value(&response, "project_id").expect("project id");

    let request = TestRequest::post()
        .uri("/tptr/jasper-cover/download")
        .set_form([("project_id", project_id.as_str())])
        .to_request();
    let response = app.call_service(request).await;
    assert_eq!(StatusCode::SEE_OTHER, response.status());
    assert_eq!(
        Some("download_error".to_string()),
        query_value(&response, "status")
    );
    assert_eq!(
        Some("rendering failed: connection refused".to_string()),
        query_value(&response, "error")
    );

    let target = location(&response).expect("location");
    let html = body(app.call_service(TestRequest::get().uri(&target).to_request()).await).await;
    assert!(html.contains("Failed to create the PDF: rendering failed: connection refused"));

    Ok(())
}
