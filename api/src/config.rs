use std::env;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Apply the idempotent schema script on startup
    pub bootstrap_schema: bool,
    /// Allow any origin, method and header (CORS)
    pub cors_allow_any: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: match env::var("PORT") {
                Ok(p) => p.parse().with_context(|| format!("Invalid PORT: {}", p))?,
                Err(_) => 8080,
            },
            bootstrap_schema: flag("BOOTSTRAP_SCHEMA", true)?,
            cors_allow_any: flag("CORS_ALLOW_ANY", true)?,
        })
    }
}

fn flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(v) => parse_flag(&v).with_context(|| format!("Invalid {}: {}", name, v)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}
