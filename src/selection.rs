//! Selection State
//!
//! The user's in-progress choices for a single catalog entry. Every mutation consumes the old
//! state and returns the new one, so a caller never observes a half-applied change.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    catalog::{CatalogEntry, DrinkOption, SideOption, SizeOption},
    codec::Customizations,
};

/// Smallest number of units on a line.
pub const MIN_UNIT_COUNT: u32 = 1;

/// Largest number of units on a line.
pub const MAX_UNIT_COUNT: u32 = 5;

/// In-progress selection for one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState<'a> {
    selected_size: Option<SizeOption<'a>>,
    selected_side: Option<SideOption<'a>>,
    selected_drink: Option<DrinkOption<'a>>,
    ingredient_quantities: FxHashMap<String, u32>,
    condiments: FxHashMap<String, bool>,
    unit_count: u32,
}

impl<'a> SelectionState<'a> {
    /// Create a fresh selection: first size chosen, required and default ingredients at 1,
    /// everything else unset.
    pub fn new(entry: &CatalogEntry<'a>) -> Self {
        let ingredient_quantities = entry
            .ingredients
            .iter()
            .filter(|ingredient| ingredient.initial_quantity() > 0)
            .map(|ingredient| (ingredient.id.clone(), ingredient.initial_quantity()))
            .collect();

        Self {
            selected_size: entry.sizes.first().cloned(),
            selected_side: None,
            selected_drink: None,
            ingredient_quantities,
            condiments: FxHashMap::default(),
            unit_count: MIN_UNIT_COUNT,
        }
    }

    /// Choose a size.
    #[must_use]
    pub fn set_size(self, size: SizeOption<'a>) -> Self {
        Self {
            selected_size: Some(size),
            ..self
        }
    }

    /// Choose a side.
    #[must_use]
    pub fn set_side(self, side: SideOption<'a>) -> Self {
        Self {
            selected_side: Some(side),
            ..self
        }
    }

    /// Choose a drink.
    #[must_use]
    pub fn set_drink(self, drink: DrinkOption<'a>) -> Self {
        Self {
            selected_drink: Some(drink),
            ..self
        }
    }

    /// Step an ingredient's quantity by `delta`, clamped into the ingredient's bounds.
    ///
    /// Ids that are not in the entry's ingredient list leave the state unchanged.
    #[must_use]
    pub fn set_ingredient_quantity(mut self, entry: &CatalogEntry<'a>, id: &str, delta: i32) -> Self {
        let Some(ingredient) = entry.ingredient(id) else {
            debug!(ingredient = id, "ignoring quantity change for unknown ingredient");

            return self;
        };

        let current = i64::from(self.ingredient_quantity(id));
        let requested = current + i64::from(delta);
        let quantity = ingredient.clamp_quantity(requested);

        if i64::from(quantity) != requested {
            debug!(
                ingredient = id,
                requested,
                quantity,
                "clamped ingredient quantity"
            );
        }

        self.ingredient_quantities.insert(ingredient.id.clone(), quantity);

        self
    }

    /// Flip a condiment on or off.
    ///
    /// Ids that are not in the entry's condiment list leave the state unchanged.
    #[must_use]
    pub fn toggle_condiment(mut self, entry: &CatalogEntry<'a>, id: &str) -> Self {
        if entry.condiment(id).is_none() {
            debug!(condiment = id, "ignoring toggle for unknown condiment");

            return self;
        }

        let selected = self.is_condiment_selected(id);
        self.condiments.insert(id.to_string(), !selected);

        self
    }

    /// Set the number of units, clamped to [`MIN_UNIT_COUNT`]..=[`MAX_UNIT_COUNT`].
    #[must_use]
    pub fn set_unit_count(self, unit_count: u32) -> Self {
        let clamped = unit_count.clamp(MIN_UNIT_COUNT, MAX_UNIT_COUNT);

        if clamped != unit_count {
            debug!(requested = unit_count, unit_count = clamped, "clamped unit count");
        }

        Self {
            unit_count: clamped,
            ..self
        }
    }

    /// Replace the ingredient and condiment maps with decoded customizations.
    ///
    /// Quantities are clamped into each ingredient's bounds, ingredients missing from the
    /// customizations fall to their floor, and ids unknown to the entry are dropped.
    #[must_use]
    pub fn with_customizations(
        self,
        entry: &CatalogEntry<'a>,
        customizations: &Customizations,
    ) -> Self {
        let ingredient_quantities = entry
            .ingredients
            .iter()
            .filter_map(|ingredient| {
                let requested = customizations
                    .ingredients
                    .get(&ingredient.id)
                    .copied()
                    .unwrap_or(0);

                let quantity = ingredient.clamp_quantity(i64::from(requested));

                (quantity > 0 || customizations.ingredients.contains_key(&ingredient.id))
                    .then(|| (ingredient.id.clone(), quantity))
            })
            .collect();

        let condiments = entry
            .condiments
            .iter()
            .filter_map(|condiment| {
                customizations
                    .condiments
                    .get(&condiment.id)
                    .map(|selected| (condiment.id.clone(), *selected))
            })
            .collect();

        let dropped = customizations
            .ingredients
            .keys()
            .filter(|id| entry.ingredient(id).is_none())
            .chain(
                customizations
                    .condiments
                    .keys()
                    .filter(|id| entry.condiment(id).is_none()),
            )
            .count();

        if dropped > 0 {
            debug!(dropped, "dropped customizations unknown to the catalog entry");
        }

        Self {
            ingredient_quantities,
            condiments,
            ..self
        }
    }

    /// The chosen size, if any
    pub fn selected_size(&self) -> Option<&SizeOption<'a>> {
        self.selected_size.as_ref()
    }

    /// The chosen side, if any
    pub fn selected_side(&self) -> Option<&SideOption<'a>> {
        self.selected_side.as_ref()
    }

    /// The chosen drink, if any
    pub fn selected_drink(&self) -> Option<&DrinkOption<'a>> {
        self.selected_drink.as_ref()
    }

    /// Quantity of an ingredient; absent ids count as zero.
    pub fn ingredient_quantity(&self, id: &str) -> u32 {
        self.ingredient_quantities.get(id).copied().unwrap_or(0)
    }

    /// The sparse ingredient quantity map
    pub fn ingredient_quantities(&self) -> &FxHashMap<String, u32> {
        &self.ingredient_quantities
    }

    /// Whether a condiment is toggled on.
    pub fn is_condiment_selected(&self, id: &str) -> bool {
        self.condiments.get(id).copied().unwrap_or(false)
    }

    /// The condiment toggle map
    pub fn condiments(&self) -> &FxHashMap<String, bool> {
        &self.condiments
    }

    /// Number of units on the line
    pub const fn unit_count(&self) -> u32 {
        self.unit_count
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};

    use crate::{
        catalog::{CondimentOption, IngredientOption},
        codec::Customizations,
    };

    use super::*;

    fn entry() -> CatalogEntry<'static> {
        let mut entry = CatalogEntry::new("burger", "Burger", Money::from_minor(500, GBP), false);

        entry.sizes = vec![
            SizeOption {
                id: "regular".to_string(),
                name: "Regular".to_string(),
                price_modifier: Money::from_minor(0, GBP),
            },
            SizeOption {
                id: "large".to_string(),
                name: "Large".to_string(),
                price_modifier: Money::from_minor(100, GBP),
            },
        ];

        entry.ingredients = vec![
            IngredientOption {
                id: "patty".to_string(),
                name: "Patty".to_string(),
                is_required: true,
                is_default: false,
                max_quantity: 3,
                extra_price: Money::from_minor(150, GBP),
            },
            IngredientOption {
                id: "cheese".to_string(),
                name: "Cheese".to_string(),
                is_required: false,
                is_default: true,
                max_quantity: 3,
                extra_price: Money::from_minor(50, GBP),
            },
            IngredientOption {
                id: "bacon".to_string(),
                name: "Bacon".to_string(),
                is_required: false,
                is_default: false,
                max_quantity: 2,
                extra_price: Money::from_minor(80, GBP),
            },
        ];

        entry.condiments = vec![CondimentOption {
            id: "ketchup".to_string(),
            name: "Ketchup".to_string(),
        }];

        entry
    }

    #[test]
    fn new_selects_first_size_and_prefills_defaults() {
        let entry = entry();
        let state = SelectionState::new(&entry);

        assert_eq!(state.selected_size().map(|size| size.id.as_str()), Some("regular"));
        assert!(state.selected_side().is_none());
        assert!(state.selected_drink().is_none());
        assert_eq!(state.ingredient_quantity("patty"), 1);
        assert_eq!(state.ingredient_quantity("cheese"), 1);
        assert_eq!(state.ingredient_quantity("bacon"), 0);
        assert!(!state.ingredient_quantities().contains_key("bacon"));
        assert!(state.condiments().is_empty());
        assert_eq!(state.unit_count(), 1);
    }

    #[test]
    fn new_without_sizes_leaves_size_unset() {
        let mut entry = entry();
        entry.sizes.clear();

        assert!(SelectionState::new(&entry).selected_size().is_none());
    }

    #[test]
    fn required_ingredient_never_reaches_zero() {
        let entry = entry();
        let state = SelectionState::new(&entry)
            .set_ingredient_quantity(&entry, "patty", -1)
            .set_ingredient_quantity(&entry, "patty", -5);

        assert_eq!(state.ingredient_quantity("patty"), 1);
    }

    #[test]
    fn ingredient_quantity_is_capped() {
        let entry = entry();
        let state = SelectionState::new(&entry).set_ingredient_quantity(&entry, "cheese", 10);

        assert_eq!(state.ingredient_quantity("cheese"), 3);
    }

    #[test]
    fn optional_ingredient_can_be_removed() {
        let entry = entry();
        let state = SelectionState::new(&entry).set_ingredient_quantity(&entry, "cheese", -1);

        assert_eq!(state.ingredient_quantity("cheese"), 0);
    }

    #[test]
    fn unknown_ingredient_is_ignored() {
        let entry = entry();
        let before = SelectionState::new(&entry);
        let after = before.clone().set_ingredient_quantity(&entry, "pickles", 1);

        assert_eq!(before, after);
    }

    #[test]
    fn toggle_condiment_flips() {
        let entry = entry();
        let on = SelectionState::new(&entry).toggle_condiment(&entry, "ketchup");

        assert!(on.is_condiment_selected("ketchup"));

        let off = on.toggle_condiment(&entry, "ketchup");

        assert!(!off.is_condiment_selected("ketchup"));
        assert_eq!(off.condiments().get("ketchup"), Some(&false));
    }

    #[test]
    fn toggle_unknown_condiment_is_ignored() {
        let entry = entry();
        let state = SelectionState::new(&entry).toggle_condiment(&entry, "mayo");

        assert!(state.condiments().is_empty());
    }

    #[test]
    fn unit_count_is_clamped() {
        let entry = entry();
        let state = SelectionState::new(&entry);

        assert_eq!(state.clone().set_unit_count(0).unit_count(), 1);
        assert_eq!(state.clone().set_unit_count(3).unit_count(), 3);
        assert_eq!(state.set_unit_count(9).unit_count(), 5);
    }

    #[test]
    fn set_size_replaces_selection() {
        let entry = entry();
        let large = entry.sizes.get(1).cloned();
        let mut state = SelectionState::new(&entry);

        if let Some(large) = large {
            state = state.set_size(large);
        }

        assert_eq!(state.selected_size().map(|size| size.id.as_str()), Some("large"));
    }

    #[test]
    fn with_customizations_clamps_and_drops_unknown_ids() {
        let entry = entry();
        let mut customizations = Customizations::default();

        customizations.ingredients.insert("patty".to_string(), 0);
        customizations.ingredients.insert("bacon".to_string(), 9);
        customizations.ingredients.insert("pickles".to_string(), 2);
        customizations.condiments.insert("ketchup".to_string(), true);
        customizations.condiments.insert("mayo".to_string(), true);

        let state = SelectionState::new(&entry).with_customizations(&entry, &customizations);

        assert_eq!(state.ingredient_quantity("patty"), 1);
        assert_eq!(state.ingredient_quantity("bacon"), 2);
        assert_eq!(state.ingredient_quantity("cheese"), 0);
        assert!(!state.ingredient_quantities().contains_key("pickles"));
        assert!(state.is_condiment_selected("ketchup"));
        assert!(!state.condiments().contains_key("mayo"));
    }
}
