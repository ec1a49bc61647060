//! Per-user records in Redis.
//!
//! A record lives in one hash at `<prefix><user id>`. Only the
//! `previous_recipes` and `food` fields belong to this service; each holds a
//! bincode blob. Updates use `HSET` on those fields alone so anything else in
//! the hash survives.

use std::collections::{BTreeMap, HashMap};
use std::ops::DerefMut;

use failsafe::backoff::EqualJittered;
use failsafe::failure_policy::{ConsecutiveFailures, OrElse, SuccessRateOverTimeWindow};
use failsafe::{CircuitBreaker, StateMachine};
use r2d2_redis::r2d2;
use r2d2_redis::redis::Commands;
use r2d2_redis::RedisConnectionManager;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::models::{RecordUpdate, UserRecord};

pub type RedisPool = r2d2::Pool<RedisConnectionManager>;

pub type CircuitBreakerType = StateMachine<
    OrElse<SuccessRateOverTimeWindow<EqualJittered>, ConsecutiveFailures<EqualJittered>>,
    (),
>;

pub(crate) const PREVIOUS_RECIPES_FIELD: &str = "previous_recipes";
pub(crate) const FOOD_FIELD: &str = "food";

/// Raw hash fields as read from or written to the store.
pub(crate) type Fields = HashMap<String, Vec<u8>>;

pub(crate) trait ItemStore: Send + Sync {
    /// Full snapshot of the user's record, `None` if nothing is stored yet.
    fn get_item(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    fn update_item(&self, user_id: &str, update: &RecordUpdate) -> Result<(), StoreError>;
}

pub(crate) fn decode_record(fields: &Fields) -> Result<Option<UserRecord>, StoreError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let previous_recipes = match fields.get(PREVIOUS_RECIPES_FIELD) {
        Some(bytes) => decode_field(PREVIOUS_RECIPES_FIELD, bytes)?,
        None => Vec::new(),
    };
    let food = match fields.get(FOOD_FIELD) {
        Some(bytes) => decode_field(FOOD_FIELD, bytes)?,
        None => BTreeMap::new(),
    };

    Ok(Some(UserRecord {
        previous_recipes,
        food,
    }))
}

pub(crate) fn encode_update(
    update: &RecordUpdate,
) -> Result<Vec<(&'static str, Vec<u8>)>, StoreError> {
    let mut fields = vec![(
        PREVIOUS_RECIPES_FIELD,
        encode_field(PREVIOUS_RECIPES_FIELD, &update.previous_recipes)?,
    )];
    if let Some(food) = &update.food {
        fields.push((FOOD_FIELD, encode_field(FOOD_FIELD, food)?));
    }
    Ok(fields)
}

fn decode_field<T: DeserializeOwned>(field: &'static str, bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|source| StoreError::Encoding { field, source })
}

fn encode_field<T: Serialize>(field: &'static str, value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|source| StoreError::Encoding { field, source })
}

pub struct RedisStore {
    pool: RedisPool,
    circuit_breaker: CircuitBreakerType,
    key_prefix: String,
}

impl RedisStore {
    pub fn new(
        pool: RedisPool,
        circuit_breaker: CircuitBreakerType,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            circuit_breaker,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}{}", self.key_prefix, user_id)
    }

    // every store call goes through the breaker; an open breaker rejects without touching redis
    fn guarded<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce() -> Result<R, StoreError>,
    {
        match self.circuit_breaker.call(f) {
            Ok(value) => Ok(value),
            Err(failsafe::Error::Inner(e)) => Err(e),
            Err(failsafe::Error::Rejected) => {
                log::warn!("circuit breaker open, rejecting store call");
                Err(StoreError::Rejected)
            }
        }
    }
}

impl ItemStore for RedisStore {
    fn get_item(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let key = self.key(user_id);
        let fields: Fields = self.guarded(|| {
            let mut redis_conn = self.pool.get()?;
            let redis_conn = redis_conn.deref_mut();
            let fields: Fields = redis_conn.hgetall(&key)?;
            Ok(fields)
        })?;
        decode_record(&fields)
    }

    fn update_item(&self, user_id: &str, update: &RecordUpdate) -> Result<(), StoreError> {
        let key = self.key(user_id);
        let fields = encode_update(update)?;
        self.guarded(|| {
            let mut redis_conn = self.pool.get()?;
            let redis_conn = redis_conn.deref_mut();
            let _: () = redis_conn.hset_multiple(&key, &fields[..])?;
            Ok(())
        })
    }
}
