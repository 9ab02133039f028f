//! Tracing subscriber setup shared by the server and import binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber. `RUST_LOG` wins; otherwise leadbook crates and
/// tower_http log at `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("leadbook_server={level},leadbook_common={level},tower_http={level}").into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
