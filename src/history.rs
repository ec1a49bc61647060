//! Recently cooked recipes, kept as a fixed-size window with the newest entry last.

pub(crate) const RECENT_RECIPES_CAPACITY: usize = 6;

pub(crate) fn push_recent(history: Vec<String>, recipe_name: String) -> Vec<String> {
    push_recent_batch(history, vec![recipe_name])
}

/// Appends every new name, then evicts from the front until the window fits.
pub(crate) fn push_recent_batch(mut history: Vec<String>, recipe_names: Vec<String>) -> Vec<String> {
    history.extend(recipe_names);
    if history.len() > RECENT_RECIPES_CAPACITY {
        let excess = history.len() - RECENT_RECIPES_CAPACITY;
        history.drain(..excess);
    }
    history
}
