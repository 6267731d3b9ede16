use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use recovery::EngineConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("PASSHUNTER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let mut engine = EngineConfig::default();
        if let Some(ms) = parse_var::<u64>("PASSHUNTER_TICK_MS")? {
            engine.tick_interval = Duration::from_millis(ms);
        }
        if let Some(p) = parse_var::<f64>("PASSHUNTER_SUCCESS_PROBABILITY")? {
            engine.success_probability = p;
        }
        engine.seed = parse_var::<u64>("PASSHUNTER_SEED")?;
        engine.enforce_timeout = std::env::var("PASSHUNTER_ENFORCE_TIMEOUT")
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        // Fail fast, fail loud
        engine.validate().context("Invalid engine configuration")?;
        if bind_addr.trim().is_empty() {
            bail!("PASSHUNTER_BIND_ADDR must not be empty");
        }

        Ok(Self { bind_addr, engine })
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Malformed env var {key}={raw:?}")),
        Err(_) => Ok(None),
    }
}

fn parse_flag(v: &str) -> bool {
    matches!(v, "1" | "true" | "TRUE" | "yes" | "YES")
}
