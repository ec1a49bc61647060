//! Fetch, recompute and persist a user's record for one request.
//!
//! There is no locking between fetch and persist: two concurrent requests
//! for the same user can overwrite each other's changes.

use crate::error::UpdateError;
use crate::history;
use crate::inventory;
use crate::models::{CookedRecipeRequest, LastRecipesRequest, RecordUpdate};
use crate::store::ItemStore;

pub(crate) fn record_cooked_recipe<S>(
    store: &S,
    request: &CookedRecipeRequest,
) -> Result<(), UpdateError>
where
    S: ItemStore + ?Sized,
{
    let record = store.get_item(&request.user_id)?.unwrap_or_default();
    log::debug!("fetched record for {}: {:?}", request.user_id, record);

    let previous_recipes =
        history::push_recent(record.previous_recipes, request.recipe.recipe_name.clone());
    let food = inventory::deduct(&record.food, &request.recipe.ingredients_and_quantities)?;
    log::debug!("updated recipes {:?}, food {:?}", previous_recipes, food);

    store.update_item(
        &request.user_id,
        &RecordUpdate {
            previous_recipes,
            food: Some(food),
        },
    )?;
    Ok(())
}

pub(crate) fn record_last_recipes<S>(
    store: &S,
    request: &LastRecipesRequest,
) -> Result<(), UpdateError>
where
    S: ItemStore + ?Sized,
{
    let record = store.get_item(&request.user_id)?.unwrap_or_default();

    let previous_recipes =
        history::push_recent_batch(record.previous_recipes, request.last_recipes.clone());
    log::debug!("updated recipes for {}: {:?}", request.user_id, previous_recipes);

    store.update_item(
        &request.user_id,
        &RecordUpdate {
            previous_recipes,
            food: None,
        },
    )?;
    Ok(())
}
