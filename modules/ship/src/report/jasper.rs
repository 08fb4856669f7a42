use super::{CoverSheetRenderer, RenderError, RendererConfig};
use std::collections::BTreeMap;
use url::Url;

/// Renders cover sheets through the REST API of a JasperReports server.
#[derive(Clone, Debug)]
pub struct JasperRenderer {
    client: reqwest::Client,
    report_url: Url,
    username: String,
    password: Option<String>,
}

impl JasperRenderer {
    pub fn new(url: Url, config: RendererConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout.into())
            .build()?;

        Ok(Self {
            client,
            report_url: report_url(&url, &config.report_path)?,
            username: config.username,
            password: config.password,
        })
    }

    pub fn report_url(&self) -> &Url {
        &self.report_url
    }
}

/// Build `<base>/rest_v2/reports/<path>.pdf`.
fn report_url(base: &Url, report_path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let path = report_path.trim().trim_matches('/');
    Url::parse(&format!("{base}/rest_v2/reports/{path}.pdf"))
}

#[async_trait::async_trait]
impl CoverSheetRenderer for JasperRenderer {
    async fn render_cover_sheet(
        &self,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, RenderError> {
        log::debug!("requesting cover sheet from {}", self.report_url);

        let response = self
            .client
            .get(self.report_url.clone())
            .basic_auth(&self.username, self.password.as_ref())
            .query(parameters)
            .send()
            .await?
            .error_for_status()?;

        let content = response.bytes().await?;
        if !content.starts_with(b"%PDF") {
            return Err(RenderError(
                "report server did not return a PDF document".into(),
            ));
        }

        Ok(content.to_vec())
    }
}
