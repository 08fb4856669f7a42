use crate::app::{AppOptions, new_app};
use actix_web::{HttpServer, middleware::Logger, web};
use anyhow::Context;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug, clap::Args)]
#[command(
    rename_all_env = "SCREAMING_SNAKE_CASE",
    next_help_heading = "HTTP endpoint"
)]
#[group(id = "http")]
pub struct HttpServerConfig {
    /// The number of worker threads, defaults to zero, which falls back to the number of cores.
    #[arg(
        id = "http-server-workers",
        long,
        env = "HTTP_SERVER_WORKERS",
        default_value_t = 0
    )]
    pub workers: usize,

    /// The address to listen on
    #[arg(
        id = "http-server-bind-address",
        long,
        env = "HTTP_SERVER_BIND_ADDR",
        default_value = "::1"
    )]
    pub bind_addr: String,

    /// The port to listen on
    #[arg(
        id = "http-server-bind-port",
        short = 'p',
        long,
        env = "HTTP_SERVER_BIND_PORT",
        default_value_t = DEFAULT_PORT
    )]
    pub bind_port: u16,

    /// The overall request limit, in bytes. Bounds form posts and symbol uploads.
    #[arg(
        id = "http-server-request-limit",
        long,
        env = "HTTP_SERVER_REQUEST_LIMIT",
        default_value_t = 4 * 1024 * 1024
    )]
    pub request_limit: usize,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            bind_addr: "::1".into(),
            bind_port: DEFAULT_PORT,
            request_limit: 4 * 1024 * 1024,
        }
    }
}

impl TryFrom<HttpServerConfig> for HttpServerBuilder {
    type Error = anyhow::Error;

    fn try_from(value: HttpServerConfig) -> Result<Self, Self::Error> {
        let addr = SocketAddr::new(
            IpAddr::from_str(&value.bind_addr).context("parse bind address")?,
            value.bind_port,
        );

        Ok(HttpServerBuilder::new()
            .workers(value.workers)
            .bind(addr)
            .request_limit(value.request_limit))
    }
}

pub type ConfiguratorFn = dyn Fn(&mut web::ServiceConfig) + Send + Sync;

pub struct HttpServerBuilder {
    configurator: Option<Arc<ConfiguratorFn>>,
    bind: SocketAddr,
    workers: usize,
    request_limit: Option<usize>,
}

impl Default for HttpServerBuilder {
    fn default() -> Self {
        HttpServerBuilder::new()
    }
}

impl HttpServerBuilder {
    pub fn new() -> Self {
        Self {
            configurator: None,
            bind: SocketAddr::new(IpAddr::from([0, 0, 0, 0, 0, 0, 0, 1]), DEFAULT_PORT),
            workers: 0,
            request_limit: None,
        }
    }

    pub fn configure<F>(mut self, configurator: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Sync + 'static,
    {
        self.configurator = Some(Arc::new(configurator));
        self
    }

    pub fn bind(mut self, addr: impl Into<SocketAddr>) -> Self {
        self.bind = addr.into();
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn request_limit(mut self, request_limit: usize) -> Self {
        self.request_limit = Some(request_limit);
        self
    }

    pub async fn run(self) -> anyhow::Result<()> {
        if let Some(limit) = self.request_limit {
            log::info!("Request limit: {limit} bytes");
        }

        let configurator = self.configurator.clone();
        let request_limit = self.request_limit;

        let mut http = HttpServer::new(move || {
            let mut app = new_app(AppOptions {
                logger: Some(Logger::default()),
                form_limit: request_limit,
            });

            if let Some(limit) = request_limit {
                app = app.app_data(web::PayloadConfig::new(limit));
            }

            app.configure(|svc| {
                if let Some(config) = &configurator {
                    config(svc);
                }
            })
        });

        if self.workers > 0 {
            log::info!("Using {} worker(s)", self.workers);
            http = http.workers(self.workers);
        }

        log::info!("Binding to: {}", self.bind);
        http = http.bind(self.bind)?;

        Ok(http.run().await?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_from_config() {
        let config = HttpServerConfig {
            bind_addr: "127.0.0.1".into(),
            bind_port: 9090,
            ..Default::default()
        };
        let builder = HttpServerBuilder::try_from(config).expect("valid config");
        assert_eq!(SocketAddr::from(([127, 0, 0, 1], 9090)), builder.bind);
        assert_eq!(Some(4 * 1024 * 1024), builder.request_limit);
    }

    #[test]
    fn invalid_bind_address() {
        let config = HttpServerConfig {
            bind_addr: "not-an-address".into(),
            ..Default::default()
        };
        assert!(HttpServerBuilder::try_from(config).is_err());
    }
}
