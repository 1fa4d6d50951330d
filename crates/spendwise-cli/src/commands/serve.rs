//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendwise_server::session::{SESSION_SECRET_ENV, SESSION_TTL_ENV};
use spendwise_server::{ServerConfig, DEFAULT_SESSION_TTL_HOURS, MAX_SESSION_TTL_HOURS};

use super::open_db;

/// Environment variable with comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "SPENDWISE_ALLOWED_ORIGINS";

/// Build the server configuration from the environment
pub fn server_config_from_env() -> Result<ServerConfig> {
    let session_secret = std::env::var(SESSION_SECRET_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .with_context(|| {
            format!(
                "{} must be set to a long random value for signing session tokens",
                SESSION_SECRET_ENV
            )
        })?;

    let session_ttl_hours = match std::env::var(SESSION_TTL_ENV) {
        Ok(raw) => parse_ttl(&raw)?,
        Err(_) => DEFAULT_SESSION_TTL_HOURS,
    };

    let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
        .map(|raw| parse_origins(&raw))
        .unwrap_or_default();

    Ok(ServerConfig {
        session_secret,
        session_ttl_hours,
        allowed_origins,
    })
}

pub(crate) fn parse_ttl(raw: &str) -> Result<i64> {
    let hours: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of hours", SESSION_TTL_ENV))?;
    if hours <= 0 {
        anyhow::bail!("{} must be positive", SESSION_TTL_ENV);
    }
    if hours > MAX_SESSION_TTL_HOURS {
        anyhow::bail!(
            "{} must be at most {} hours (one year)",
            SESSION_TTL_ENV,
            MAX_SESSION_TTL_HOURS
        );
    }
    Ok(hours)
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    let config = server_config_from_env()?;

    println!("🚀 Starting Spendwise web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!(
        "   🔑 Sessions: signed tokens, valid for {}h",
        config.session_ttl_hours
    );
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    spendwise_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
