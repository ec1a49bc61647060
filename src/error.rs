use r2d2_redis::r2d2;
use r2d2_redis::redis::RedisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store connection unavailable: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("store command failed: {0}")]
    Redis(#[from] RedisError),

    #[error("store is not responding")]
    Rejected,

    #[error("corrupt {field} field: {source}")]
    Encoding {
        field: &'static str,
        #[source]
        source: bincode::Error,
    },
}

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("stored quantity for {ingredient} is not an integer: {value:?}")]
    InvalidStoredQuantity { ingredient: String, value: String },

    #[error("quantity for {ingredient} is out of range: {descriptor:?}")]
    QuantityOutOfRange {
        ingredient: String,
        descriptor: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("request was cancelled before completion")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
