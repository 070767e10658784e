use std::env;

use anyhow::{anyhow, bail, Result};

use crate::cors::{CorsPolicy, DEV_ORIGIN};

pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub cors: CorsPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            cors: CorsPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = lookup("SERVER_ADDR").unwrap_or(DEFAULT_SERVER_ADDR.to_string());

        let origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => vec![DEV_ORIGIN.to_string()],
        };

        let mut cors = CorsPolicy::with_origins(origins);
        if let Some(raw) = lookup("CORS_ENFORCE_ORIGIN") {
            cors.enforce_origin = parse_flag(&raw)
                .ok_or_else(|| anyhow!("CORS_ENFORCE_ORIGIN must be true or false, got {:?}", raw))?;
        }

        Ok(Config { server_addr, cors })
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect();
    if origins.iter().any(|origin| origin.contains('*')) {
        bail!("CORS_ALLOWED_ORIGINS cannot contain a wildcard when credentials are allowed");
    }
    if origins.is_empty() {
        bail!("CORS_ALLOWED_ORIGINS is set but lists no origin");
    }
    Ok(origins)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
