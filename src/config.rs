use anyhow::{bail, Result};
use std::env;

/// Process configuration, read from the environment once at startup and
/// shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub channel_secret: String,
    pub channel_access_token: String,
    pub port: u16,
}

impl Config {
    /// Both channel credentials are required; refusing to start without
    /// them beats failing on the first webhook.
    pub fn from_env() -> Result<Self> {
        let channel_secret = match env::var("LINE_CHANNEL_SECRET") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => bail!("LINE_CHANNEL_SECRET environment variable is required"),
        };

        let channel_access_token = match env::var("LINE_CHANNEL_ACCESS_TOKEN") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => bail!("LINE_CHANNEL_ACCESS_TOKEN environment variable is required"),
        };

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        Ok(Config {
            channel_secret,
            channel_access_token,
            port,
        })
    }
}
