use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const SUCCESS_MESSAGE: &str = "Successfully invoked the lambda";

/// Per-user state as held in the item store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UserRecord {
    pub previous_recipes: Vec<String>,
    pub food: BTreeMap<String, String>,
}

/// Fields written back for one user. `food: None` leaves the stored
/// inventory untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordUpdate {
    pub previous_recipes: Vec<String>,
    pub food: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Recipe {
    pub recipe_name: String,
    #[serde(default)]
    pub ingredients_and_quantities: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CookedRecipeRequest {
    pub user_id: String,
    pub recipe: Recipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LastRecipesRequest {
    pub user_id: String,
    pub last_recipes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    pub(crate) fn success() -> Self {
        Self {
            status_code: 200,
            body: SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Parses a request that is either the bare JSON object or a proxy envelope
/// whose `body` field carries that object as a string.
pub(crate) fn parse_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value.get("body") {
        Some(Value::String(inner)) => serde_json::from_str(inner),
        _ => serde_json::from_value(value),
    }
}

pub(crate) fn error_message(err: &dyn std::fmt::Display) -> String {
    format!("Error occurred: {err}")
}
