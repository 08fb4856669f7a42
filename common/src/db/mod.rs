use anyhow::Context;
use pal_migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, ExecResult,
    QueryResult, RuntimeErr, Statement, prelude::async_trait,
};
use sqlx::error::{DatabaseError, ErrorKind};
use std::{
    ops::Deref,
    time::Duration,
};
use tracing::instrument;
use url::Url;

use crate::config::CreationMode;

/// The record store handle.
///
/// Services receive a clone of this handle when they get constructed. It is cheap to clone, as
/// it only wraps the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Database {
    /// the database connection
    db: DatabaseConnection,
    /// the database name
    name: String,
}

impl Database {
    #[instrument(err)]
    pub async fn new(database: &crate::config::Database) -> Result<Self, anyhow::Error> {
        let url = database.to_url();

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("connect to {}", strip_password(url.clone()));
        }

        let mut opt = ConnectOptions::new(url);
        opt.max_connections(database.max_conn);
        opt.min_connections(database.min_conn.min(database.max_conn));
        opt.connect_timeout(Duration::from_secs(database.connect_timeout));
        opt.sqlx_logging_level(log::LevelFilter::Trace);

        let db = sea_orm::Database::connect(opt).await?;
        let name = database.name.clone();

        Ok(Self { db, name })
    }

    /// Connect and bring the schema into the state requested by `mode`.
    pub async fn with_creation(
        database: &crate::config::Database,
        mode: CreationMode,
    ) -> Result<Self, anyhow::Error> {
        let db = Self::new(database).await?;
        match mode {
            CreationMode::Default => db.migrate().await?,
            CreationMode::Refresh => db.refresh().await?,
            CreationMode::Skip => log::info!("skipping schema migration"),
        }
        Ok(db)
    }

    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        log::debug!("applying migrations");
        Migrator::up(&self.db, None).await?;
        log::debug!("applied migrations");

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn refresh(&self) -> Result<(), anyhow::Error> {
        log::warn!("refreshing database schema...");
        Migrator::refresh(&self.db).await?;
        log::warn!("refreshing database schema... done!");

        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn close(self) -> anyhow::Result<()> {
        Ok(self.db.close().await?)
    }

    /// Ping the database.
    ///
    /// Intended to be used for health checks.
    #[instrument(skip(self), err)]
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db
            .ping()
            .await
            .context("failed to ping the database")?;
        Ok(())
    }

    /// Get the name of the database
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Deref for Database {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Implementation of the connection trait for our database struct, so that it can be handed
/// to sea-orm directly.
#[async_trait::async_trait]
impl ConnectionTrait for Database {
    fn get_database_backend(&self) -> DbBackend {
        self.db.get_database_backend()
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        self.db.execute(stmt).await
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        self.db.execute_unprepared(sql).await
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        self.db.query_one(stmt).await
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        self.db.query_all(stmt).await
    }

    fn support_returning(&self) -> bool {
        self.db.support_returning()
    }
}

/// A trait to help working with database errors
pub trait DatabaseErrors {
    /// return `true` if the error is a duplicate key error
    fn is_duplicate(&self) -> bool;

    /// return `true` if the error is caused by a foreign key, e.g. a restricted delete
    fn is_foreign_key_violation(&self) -> bool;
}

/// SQLite reports a restricted delete as `SQLITE_CONSTRAINT_TRIGGER`, which sqlx doesn't map to
/// a foreign key violation.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

impl DatabaseErrors for DbErr {
    fn is_duplicate(&self) -> bool {
        database_error(self).is_some_and(|err| matches!(err.kind(), ErrorKind::UniqueViolation))
    }

    fn is_foreign_key_violation(&self) -> bool {
        database_error(self).is_some_and(|err| {
            matches!(err.kind(), ErrorKind::ForeignKeyViolation)
                || (err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER)
                    && err.message().contains("FOREIGN KEY"))
        })
    }
}

fn database_error(err: &DbErr) -> Option<&dyn DatabaseError> {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(sqlx::error::Error::Database(err)))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx::error::Error::Database(err))) => {
            Some(&**err)
        }
        _ => None,
    }
}

/// Remove the password from the URL and replace it with `***`, if present.
///
/// If this is not a URL, or does not contain a password, this is a no-op.
fn strip_password(url: String) -> String {
    match Url::parse(&url) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => url,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// ensure that the password is not present, but not necessarily removing the string itself
    #[test]
    fn url_strip_password() {
        assert_eq!(
            "postgres://pal:***@db:5432/pal",
            strip_password("postgres://pal:pal1234@db:5432/pal".to_string())
        )
    }

    /// if this is not a URL, then it should not panic
    #[test]
    fn url_strip_password_not_a_url() {
        assert_eq!("foo-bar-baz", strip_password("foo-bar-baz".to_string()))
    }

    #[tokio::test]
    async fn sqlite_migrates() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = crate::config::Database::sqlite(dir.path().join("test.db").display());
        let db = Database::with_creation(&config, CreationMode::Default).await?;
        db.ping().await?;
        assert_eq!("sqlite", db.name());
        db.close().await?;
        Ok(())
    }

    /// A restricted delete must be told apart from other failures, on every backend.
    #[tokio::test]
    async fn restricted_delete_is_a_foreign_key_violation() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = crate::config::Database::sqlite(dir.path().join("test.db").display());
        let db = Database::with_creation(&config, CreationMode::Default).await?;

        db.execute_unprepared("INSERT INTO location (id, name, active) VALUES (1, 'Dock 3', true)")
            .await?;
        db.execute_unprepared(
            "INSERT INTO asset (name, code, location_id, condition) VALUES ('Crane', 'A-1', 1, 'good')",
        )
        .await?;

        let err = db
            .execute_unprepared("DELETE FROM location WHERE id = 1")
            .await
            .expect_err("location is in use");
        assert!(err.is_foreign_key_violation(), "{err:?}");
        assert!(!err.is_duplicate());

        let err = db
            .execute_unprepared("INSERT INTO location (name, active) VALUES ('DOCK 3', true)")
            .await
            .expect_err("name is taken");
        assert!(err.is_duplicate(), "{err:?}");
        assert!(!err.is_foreign_key_violation());

        db.close().await?;
        Ok(())
    }
}
