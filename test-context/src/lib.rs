#![allow(clippy::expect_used)]

pub mod call;
pub mod multipart;

use pal_common::{config, config::CreationMode, db::Database};
use std::env;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tracing::instrument;

/// A migrated, throw-away record store for a single test.
#[allow(dead_code)]
pub struct PalContext {
    pub db: Database,
    tempdir: Option<TempDir>,
}

impl AsyncTestContext for PalContext {
    #[instrument]
    async fn setup() -> PalContext {
        if let Ok(url) = env::var("EXTERNAL_TEST_DB_URL") {
            log::warn!("Using external database from 'EXTERNAL_TEST_DB_URL'");
            let config = config::Database {
                url: Some(url),
                ..config::Database::sqlite("unused")
            };
            let db = Database::with_creation(&config, CreationMode::Refresh)
                .await
                .expect("Configuring the database");

            return PalContext { db, tempdir: None };
        }

        let tempdir = tempfile::tempdir().expect("creating a temporary directory");
        let config = config::Database::sqlite(tempdir.path().join("pal.db").display());
        let db = Database::with_creation(&config, CreationMode::Default)
            .await
            .expect("Create a test database");

        PalContext {
            db,
            tempdir: Some(tempdir),
        }
    }
}
