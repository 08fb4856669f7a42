pub mod http;

use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Logger, NormalizePath, TrailingSlash},
    web,
};

#[derive(Default)]
pub struct AppOptions {
    pub logger: Option<Logger>,
    /// the limit for url-encoded form bodies
    pub form_limit: Option<usize>,
}

/// Build a new HTTP app in a consistent way.
///
/// The order of execution is last added becomes first to be executed, read the middleware
/// from end to start.
pub fn new_app(
    options: AppOptions,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let mut form = web::FormConfig::default();
    if let Some(limit) = options.form_limit {
        form = form.limit(limit);
    }

    App::new()
        .app_data(form)
        .wrap(NormalizePath::new(TrailingSlash::Trim))
        .wrap(actix_web::middleware::Condition::new(
            options.logger.is_some(),
            options.logger.unwrap_or_default(),
        ))
}
