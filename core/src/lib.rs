pub mod config;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod model;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(json: bool) {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (plain_layer, json_layer) = if json {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_target(false)),
        )
    } else {
        (Some(tracing_subscriber::fmt::layer().with_target(false)), None)
    };

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(plain_layer)
        .with(json_layer)
        .try_init();
}
