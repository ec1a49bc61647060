use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_KEY_PREFIX: &str = "user:";

const STORE_POOL_MAX_OPEN: u32 = 16;
const STORE_POOL_MIN_IDLE: u32 = 8;
const STORE_POOL_EXPIRE_SECONDS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub bind_address: String,
    pub port: u16,
    pub pool_max_open: u32,
    pub pool_min_idle: u32,
    pub pool_expire: Duration,
    pub key_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_url = lookup("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?;

        Ok(Self {
            redis_url,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            pool_max_open: parse_or(&lookup, "STORE_POOL_MAX_OPEN", STORE_POOL_MAX_OPEN)?,
            pool_min_idle: parse_or(&lookup, "STORE_POOL_MIN_IDLE", STORE_POOL_MIN_IDLE)?,
            pool_expire: Duration::from_secs(parse_or(
                &lookup,
                "STORE_POOL_EXPIRE_SECONDS",
                STORE_POOL_EXPIRE_SECONDS,
            )?),
            key_prefix: lookup("USER_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => {
            log::debug!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
