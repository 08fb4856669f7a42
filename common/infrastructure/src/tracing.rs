use std::sync::Once;
use tracing_subscriber::{
    EnvFilter, field::MakeExt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// The filter applied when `RUST_LOG` is not set.
const RUST_LOG: &str = "info,sqlx=warn";

static INIT: Once = Once::new();

/// Set up logging for the process, forwarding `log` records into `tracing`.
///
/// Calling this more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(init_subscriber);
}

fn init_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        eprintln!("RUST_LOG is unset, using default: '{RUST_LOG}'");
        EnvFilter::new(RUST_LOG)
    });

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .map_fmt_fields(|f| f.debug_alt())
                .with_ansi(true)
                .with_level(true)
                .compact(),
        )
        .try_init();

    if let Err(err) = result {
        eprintln!("Error initializing logging: {:?}", err);
    }
}
