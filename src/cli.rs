//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::claim::Claim;
use crate::jwt::JwtConfig;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "keyward", about = "Stateless JWT authentication service")]
pub struct Args {
    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long, global = true)]
    pub jwt_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "7291", env = "KEYWARD_PORT")]
        port: u16,

        /// Set the Secure flag on the refresh token cookie (use behind HTTPS)
        #[arg(long)]
        secure_cookies: bool,
    },
    /// Print a non-expiring access token for an internal service
    IssueToken {
        /// Member id carried by the token
        #[arg(long)]
        id: u64,

        /// Role to grant (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Permission to grant (repeatable)
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
}

/// Initialize logging based on the specified format. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging(format: &LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if let Err(e) = check_secret_length(&secret) {
        error!("{}", e);
        return None;
    }

    Some(secret)
}

fn check_secret_length(secret: &str) -> Result<(), String> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(format!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        ));
    }
    Ok(())
}

/// Build ServerConfig from validated arguments. Sign-in stays disabled since
/// the binary ships no member directory.
pub fn build_config(jwt_secret: String, secure_cookies: bool) -> ServerConfig {
    ServerConfig {
        jwt_secret: jwt_secret.into_bytes(),
        secure_cookies,
        members: None,
    }
}

/// Sign a non-expiring token for the given identity.
pub fn issue_service_token(
    jwt_secret: &str,
    id: u64,
    roles: Vec<String>,
    permissions: Vec<String>,
) -> Result<String, String> {
    let jwt = JwtConfig::new(jwt_secret.as_bytes()).map_err(|e| e.to_string())?;
    let claim = Claim::new(id, roles, permissions).map_err(|e| e.to_string())?;
    jwt.issue_non_expiring(&claim).map_err(|e| e.to_string())
}
