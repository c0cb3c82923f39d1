//! Gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Environment variable consulted when `--jwt-secret` is not given.
pub const JWT_SECRET_ENV: &str = "AUTHGATE_JWT_SECRET";

/// Authgate gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "authgate-gateway")]
#[command(version, about = "HTTP/JSON authentication gateway")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Path to the credential database directory.
    #[arg(short, long, default_value = "./data")]
    pub data_path: PathBuf,

    /// HMAC signing secret for tokens. Falls back to the
    /// AUTHGATE_JWT_SECRET environment variable.
    #[arg(long)]
    pub jwt_secret: Option<String>,

    /// Token time to live in seconds. 0 disables expiry.
    #[arg(long, default_value_t = 0)]
    pub token_ttl_secs: u64,

    /// Bound (ms) on a single credential-store operation.
    #[arg(long, default_value_t = 5_000)]
    pub store_timeout_ms: u64,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Path to the credential database directory.
    pub data_path: PathBuf,
    /// HMAC signing secret, loaded once at startup.
    pub jwt_secret: String,
    /// Optional token time to live.
    pub token_ttl: Option<Duration>,
    /// Bound on a single credential-store operation.
    pub store_timeout: Duration,
}

impl GatewayConfig {
    /// Build the configuration from parsed arguments.
    ///
    /// The signing secret comes from the `--jwt-secret` flag or the
    /// `AUTHGATE_JWT_SECRET` environment variable; it is required.
    pub fn from_args(args: &Args) -> Result<Self, String> {
        let jwt_secret = match &args.jwt_secret {
            Some(secret) => secret.clone(),
            None => std::env::var(JWT_SECRET_ENV).map_err(|_| {
                format!("no signing secret configured (set --jwt-secret or {JWT_SECRET_ENV})")
            })?,
        };

        let token_ttl = if args.token_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(args.token_ttl_secs))
        };

        Ok(Self {
            listen_addr: args.listen.clone(),
            data_path: args.data_path.clone(),
            jwt_secret,
            token_ttl,
            store_timeout: Duration::from_millis(args.store_timeout_ms),
        })
    }
}
