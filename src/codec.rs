//! Customization Codec
//!
//! Encodes the ingredient and condiment part of a selection into the blob attached to a cart
//! line, and decodes it again when the line is reopened for editing. Size, side, drink and unit
//! count travel as separate fields on the line and are never part of the blob.
//!
//! The blob is a JSON object:
//!
//! ```json
//! {"condiments":{"ketchup":true},"ingredients":{"cheese":3,"patty":1}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::selection::SelectionState;

/// A blob that could not be decoded.
///
/// Carries the raw input so callers can report it; recovery is always to fall back to the
/// catalog defaults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Malformed customization blob ({reason}): {blob:?}")]
pub struct SerializationError {
    /// The blob as received
    pub blob: String,

    /// Why decoding failed
    pub reason: String,
}

/// Decoded ingredient quantities and condiment toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Customizations {
    /// Ingredient id -> quantity
    #[serde(default)]
    pub ingredients: BTreeMap<String, u32>,

    /// Condiment id -> toggled on
    #[serde(default)]
    pub condiments: BTreeMap<String, bool>,
}

impl Customizations {
    /// Snapshot the customizable part of a selection.
    pub fn from_state(state: &SelectionState<'_>) -> Self {
        Self {
            ingredients: state
                .ingredient_quantities()
                .iter()
                .map(|(id, quantity)| (id.clone(), *quantity))
                .collect(),
            condiments: state
                .condiments()
                .iter()
                .map(|(id, selected)| (id.clone(), *selected))
                .collect(),
        }
    }

    /// Whether there is nothing to restore.
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.condiments.is_empty()
    }
}

/// Encode the ingredient and condiment maps of a selection.
///
/// Keys are emitted in sorted order, so equal selections always produce equal blobs.
pub fn serialize(state: &SelectionState<'_>) -> String {
    encode(&Customizations::from_state(state))
}

/// Encode decoded customizations back into a blob.
pub fn encode(customizations: &Customizations) -> String {
    let ingredients: Map<String, Value> = customizations
        .ingredients
        .iter()
        .map(|(id, quantity)| (id.clone(), Value::from(*quantity)))
        .collect();

    let condiments: Map<String, Value> = customizations
        .condiments
        .iter()
        .map(|(id, selected)| (id.clone(), Value::from(*selected)))
        .collect();

    let mut root = Map::new();
    root.insert("condiments".to_string(), Value::Object(condiments));
    root.insert("ingredients".to_string(), Value::Object(ingredients));

    Value::Object(root).to_string()
}

/// Decode a blob produced by [`serialize`].
///
/// # Errors
///
/// Returns a [`SerializationError`] carrying the raw blob if it is not a JSON object with
/// `ingredients` (id -> non-negative integer) and `condiments` (id -> bool) maps.
pub fn deserialize(blob: &str) -> Result<Customizations, SerializationError> {
    serde_json::from_str(blob).map_err(|err| SerializationError {
        blob: blob.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::catalog::{CatalogEntry, CondimentOption, IngredientOption};

    use super::*;

    fn entry() -> CatalogEntry<'static> {
        let mut entry = CatalogEntry::new("wrap", "Wrap", Money::from_minor(450, GBP), false);

        entry.ingredients = vec![
            IngredientOption {
                id: "chicken".to_string(),
                name: "Chicken".to_string(),
                is_required: true,
                is_default: false,
                max_quantity: 2,
                extra_price: Money::from_minor(120, GBP),
            },
            IngredientOption {
                id: "lettuce".to_string(),
                name: "Lettuce".to_string(),
                is_required: false,
                is_default: true,
                max_quantity: 3,
                extra_price: Money::from_minor(0, GBP),
            },
        ];

        entry.condiments = vec![
            CondimentOption {
                id: "mayo".to_string(),
                name: "Mayo".to_string(),
            },
            CondimentOption {
                id: "chilli".to_string(),
                name: "Chilli".to_string(),
            },
        ];

        entry
    }

    #[test]
    fn serialize_is_sorted_and_stable() {
        let entry = entry();
        let state = SelectionState::new(&entry)
            .set_ingredient_quantity(&entry, "lettuce", 1)
            .toggle_condiment(&entry, "mayo");

        assert_eq!(
            serialize(&state),
            r#"{"condiments":{"mayo":true},"ingredients":{"chicken":1,"lettuce":2}}"#
        );
    }

    #[test]
    fn round_trip_reproduces_maps() -> TestResult {
        let entry = entry();
        let state = SelectionState::new(&entry)
            .set_ingredient_quantity(&entry, "chicken", 1)
            .set_ingredient_quantity(&entry, "lettuce", -1)
            .toggle_condiment(&entry, "chilli")
            .toggle_condiment(&entry, "mayo")
            .toggle_condiment(&entry, "mayo");

        let decoded = deserialize(&serialize(&state))?;

        assert_eq!(decoded, Customizations::from_state(&state));

        let restored = SelectionState::new(&entry).with_customizations(&entry, &decoded);

        assert_eq!(restored.ingredient_quantities(), state.ingredient_quantities());
        assert_eq!(restored.condiments(), state.condiments());

        Ok(())
    }

    #[test]
    fn empty_object_is_no_customizations() -> TestResult {
        let decoded = deserialize("{}")?;

        assert!(decoded.is_empty());

        Ok(())
    }

    #[test]
    fn malformed_blob_carries_raw_input() {
        let result = deserialize("ingredients=cheese:3");

        assert!(matches!(
            result,
            Err(SerializationError { ref blob, .. }) if blob == "ingredients=cheese:3"
        ));
    }

    #[test]
    fn negative_quantity_is_malformed() {
        assert!(deserialize(r#"{"ingredients":{"cheese":-1}}"#).is_err());
    }

    #[test]
    fn unknown_fields_are_malformed() {
        assert!(deserialize(r#"{"size":"large"}"#).is_err());
    }

    #[test]
    fn encode_matches_serialize() {
        let entry = entry();
        let state = SelectionState::new(&entry).toggle_condiment(&entry, "mayo");

        assert_eq!(encode(&Customizations::from_state(&state)), serialize(&state));
    }
}
