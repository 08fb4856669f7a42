use std::fmt::{Display, Formatter};

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Database")]
#[group(id = "database")]
pub struct Database {
    /// A full connection URL, takes precedence over the individual settings
    #[arg(id = "db-url", long, env = "DB_URL")]
    pub url: Option<String>,
    #[arg(id = "db-user", long, env = "DB_USER", default_value = "pal")]
    pub username: String,
    #[arg(id = "db-password", long, env = "DB_PASSWORD", default_value = "pal")]
    pub password: String,
    #[arg(id = "db-host", long, env = "DB_HOST", default_value = "localhost")]
    pub host: String,
    #[arg(id = "db-port", long, env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,
    #[arg(id = "db-name", long, env = "DB_NAME", default_value = "pal")]
    pub name: String,
    #[arg(id = "db-max-conn", long, env = "DB_MAX_CONN", default_value_t = 75)]
    pub max_conn: u32,
    #[arg(id = "db-min-conn", long, env = "DB_MIN_CONN", default_value_t = 25)]
    pub min_conn: u32,
    /// Connect timeout, in seconds
    #[arg(id = "db-connect-timeout", long, env = "DB_CONNECT_TIMEOUT", default_value_t = 8)]
    pub connect_timeout: u64,
}

impl Database {
    /// Configuration for a SQLite database file, mostly used for local runs and tests.
    pub fn sqlite(path: impl Display) -> Self {
        Self {
            url: Some(format!("sqlite://{path}?mode=rwc")),
            username: String::new(),
            password: String::new(),
            host: String::new(),
            port: 0,
            name: "sqlite".into(),
            max_conn: 5,
            min_conn: 1,
            connect_timeout: 8,
        }
    }

    pub fn to_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.name
            ),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, clap::ValueEnum)]
pub enum CreationMode {
    /// Apply pending migrations
    #[default]
    Default,
    /// Drop all tables and re-apply all migrations
    Refresh,
    /// Don't touch the schema
    Skip,
}

impl Display for CreationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Refresh => write!(f, "refresh"),
            Self::Skip => write!(f, "skip"),
        }
    }
}
