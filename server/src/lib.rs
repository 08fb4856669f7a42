//! The PAL web server, serving the asset register and the ship project tracker.

#[cfg(test)]
mod test;

use actix_web::web;
use pal_common::{
    config::{CreationMode, Database},
    db,
};
use pal_infrastructure::app::http::{HttpServerBuilder, HttpServerConfig};
use pal_module_ship::report::{CoverSheetRenderer, RendererConfig};
use std::{process::ExitCode, sync::Arc};

/// Run the web server
#[derive(clap::Args, Debug)]
pub struct Run {
    /// The database creation mode
    #[arg(long, env, value_enum, default_value_t = CreationMode::Default)]
    pub creation: CreationMode,

    #[command(flatten)]
    pub database: Database,

    #[command(flatten)]
    pub http: HttpServerConfig,

    #[command(flatten)]
    pub renderer: RendererConfig,
}

impl Run {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let db = db::Database::with_creation(&self.database, self.creation).await?;
        log::info!("Connected to database: {}", db.name());

        let renderer = self.renderer.into_renderer()?;

        HttpServerBuilder::try_from(self.http)?
            .configure(move |svc| configure(svc, db.clone(), renderer.clone()))
            .run()
            .await?;

        Ok(ExitCode::SUCCESS)
    }
}

/// Mount all modules.
pub fn configure(
    svc: &mut web::ServiceConfig,
    db: db::Database,
    renderer: Arc<dyn CoverSheetRenderer>,
) {
    pal_module_asset::endpoints::configure(svc, db.clone());
    pal_module_ship::endpoints::configure(svc, db, renderer);
}
