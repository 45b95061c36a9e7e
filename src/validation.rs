//! Validation
//!
//! Decides whether a selection can be submitted. Nothing here is cached: callers recompute after
//! every mutation.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{CatalogEntry, IngredientOption},
    selection::SelectionState,
};

/// A top-level selection that has not been made yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingSelection {
    /// No size chosen
    Size,

    /// No side chosen on a combo
    Side,

    /// No drink chosen on a combo
    Drink,
}

impl fmt::Display for MissingSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSelection::Size => f.write_str("size"),
            MissingSelection::Side => f.write_str("side"),
            MissingSelection::Drink => f.write_str("drink"),
        }
    }
}

/// Missing selections, in size, side, drink order.
pub type MissingSelections = SmallVec<[MissingSelection; 3]>;

/// Reasons a selection cannot be submitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more of size, side and drink are unset.
    #[error("{} required selection(s) missing", .0.len())]
    MissingSelections(MissingSelections),

    /// A required ingredient is at zero.
    #[error("Required ingredient not selected: {0}")]
    RequiredIngredient(String),
}

/// Top-level selections still missing. Side and drink only count for combos.
pub fn missing_selections(entry: &CatalogEntry<'_>, state: &SelectionState<'_>) -> MissingSelections {
    let mut missing = MissingSelections::new();

    if state.selected_size().is_none() {
        missing.push(MissingSelection::Size);
    }

    if entry.is_combo {
        if state.selected_side().is_none() {
            missing.push(MissingSelection::Side);
        }

        if state.selected_drink().is_none() {
            missing.push(MissingSelection::Drink);
        }
    }

    missing
}

/// Number of missing top-level selections, for "N required selections" feedback.
///
/// Required ingredients are not counted here; they still block [`is_submittable`].
pub fn missing_count(entry: &CatalogEntry<'_>, state: &SelectionState<'_>) -> usize {
    missing_selections(entry, state).len()
}

/// Required ingredients currently at zero, in catalog order.
pub fn unset_required_ingredients<'e, 'a>(
    entry: &'e CatalogEntry<'a>,
    state: &SelectionState<'_>,
) -> impl Iterator<Item = &'e IngredientOption<'a>> {
    entry
        .ingredients
        .iter()
        .filter(move |ingredient| {
            ingredient.is_required && state.ingredient_quantity(&ingredient.id) == 0
        })
}

/// Check a selection, reporting the first reason it cannot be submitted.
///
/// # Errors
///
/// - [`ValidationError::MissingSelections`]: size, side or drink is unset.
/// - [`ValidationError::RequiredIngredient`]: a required ingredient is at zero.
pub fn validate(entry: &CatalogEntry<'_>, state: &SelectionState<'_>) -> Result<(), ValidationError> {
    let missing = missing_selections(entry, state);

    if !missing.is_empty() {
        return Err(ValidationError::MissingSelections(missing));
    }

    if let Some(ingredient) = unset_required_ingredients(entry, state).next() {
        return Err(ValidationError::RequiredIngredient(ingredient.id.clone()));
    }

    Ok(())
}

/// Whether the selection may be submitted.
pub fn is_submittable(entry: &CatalogEntry<'_>, state: &SelectionState<'_>) -> bool {
    validate(entry, state).is_ok()
}
