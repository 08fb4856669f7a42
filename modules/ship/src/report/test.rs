use super::*;
use crate::test::{FakeRenderer, Services};
use pal_test_context::PalContext;
use std::time::Duration;
use test_context::test_context;
use test_log::test;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{basic_auth, method, path, query_param},
};

const REPORT_PATH: &str = "/jasperserver/rest_v2/reports/reports/pal/cover_sheet.pdf";

fn renderer(server: &MockServer, timeout: Duration) -> JasperRenderer {
    let url = Url::parse(&format!("{}/jasperserver", server.uri())).expect("valid url");
    JasperRenderer::new(
        url.clone(),
        RendererConfig {
            url: Some(url),
            password: Some("secret".into()),
            timeout: timeout.into(),
            ..Default::default()
        },
    )
    .expect("create renderer")
}

fn parameters() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("project_no".to_string(), "W000312".to_string()),
        ("owner".to_string(), "Satgas".to_string()),
    ])
}

#[test(tokio::test)]
async fn renders_pdf() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REPORT_PATH))
        .and(query_param("project_no", "W000312"))
        .and(basic_auth("jasperadmin", "secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.5 report".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pdf = renderer(&server, DEFAULT_TIMEOUT)
        .render_cover_sheet(&parameters())
        .await?;
    assert_eq!(b"%PDF-1.5 report".to_vec(), pdf);

    Ok(())
}

#[test(tokio::test)]
async fn status_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = renderer(&server, DEFAULT_TIMEOUT)
        .render_cover_sheet(&parameters())
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("401"), "unexpected error: {err}");
}

#[test(tokio::test)]
async fn rejects_other_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = renderer(&server, DEFAULT_TIMEOUT)
        .render_cover_sheet(&parameters())
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("not return a PDF"));
}

/// A slow report server is cut off by the timeout, and not retried.
#[test(tokio::test)]
async fn times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF".to_vec())
                .set_delay(Duration::from_secs(5)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = renderer(&server, Duration::from_millis(200))
        .render_cover_sheet(&parameters())
        .await;
    assert!(result.is_err());
}

#[test(tokio::test)]
async fn unconfigured() {
    let renderer = RendererConfig::default()
        .into_renderer()
        .expect("create renderer");
    let result = renderer.render_cover_sheet(&parameters()).await;
    assert!(result.is_err());
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn generate_by_id(ctx: &PalContext) -> anyhow::Result<()> {
    let services = Services::new(&ctx.db, Arc::new(FakeRenderer::default()));
    let class = services.ship_class("Frigate").await;
    let project = services.project(class.id, "W000312").await;

    let result = services.reports.generate_cover_sheet_pdf_by_id(None).await;
    assert!(matches!(result, Err(Error::BadRequest(msg)) if msg == PROJECT_NOT_SELECTED));

    let result = services
        .reports
        .generate_cover_sheet_pdf_by_id(Some(project.id + 1))
        .await;
    assert!(matches!(result, Err(Error::NotFound(msg)) if msg == PROJECT_NOT_FOUND));

    let pdf = services
        .reports
        .generate_cover_sheet_pdf_by_id(Some(project.id))
        .await?;
    assert_eq!("Cover Sheet Jasper - W000312.pdf", pdf.file_name);
    assert_eq!(b"%PDF-1.4 cover sheet W000312".to_vec(), pdf.content);

    Ok(())
}

#[test_context(PalContext)]
#[test(tokio::test)]
async fn render_errors_surface(ctx: &PalContext) -> anyhow::Result<()> {
    let services = Services::new(&ctx.db, Arc::new(FakeRenderer::failing()));
    let class = services.ship_class("Frigate").await;
    let project = services.project(class.id, "W000312").await;

    let result = services
        .reports
        .generate_cover_sheet_pdf_by_id(Some(project.id))
        .await;
    let Err(Error::Render(err)) = result else {
        panic!("expected a render error");
    };
    assert_eq!("rendering failed: connection refused", err.to_string());

    Ok(())
}
