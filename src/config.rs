use std::env;
use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_DATABASE: &str = "shopledger.db";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
/// Local front-end dev servers.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Options for `shopledger serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000)),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    pub fn new(bind: SocketAddr, cors_origins: Vec<String>) -> Self {
        Self { bind, cors_origins }
    }
}

/// Install the global tracing subscriber. `RUST_LOG`, when set, wins over
/// `level`. Calling it twice is harmless.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_directive = format!("shopledger={level},tower_http={level}");
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}
