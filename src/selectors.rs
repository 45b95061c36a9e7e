//! Option Selectors
//!
//! The surfaces a user mutates a selection through. Sizes, sides and drinks are single-select,
//! condiments are multi-toggle; all four share [`OptionSelector`]. Ingredients use the
//! [`IngredientStepper`] instead, which knows about floors, caps and tiered prices.
//!
//! Options are always presented in catalog order.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{
        CatalogEntry, CatalogOption, CondimentOption, DrinkOption, IngredientOption, SideOption,
        SizeOption, find_by_id,
    },
    pricing::{PricingError, extra_charge},
    selection::SelectionState,
};

/// Errors raised when choosing an option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// The id is not one of the selector's options.
    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

/// Which options are currently chosen.
#[derive(Debug, Clone, Copy)]
pub enum Current<'s> {
    /// Single-select: at most one id
    Single(Option<&'s str>),

    /// Multi-toggle: every id toggled on
    Multi(&'s SelectionState<'s>),
}

/// One row of a selector.
#[derive(Debug, Clone, Copy)]
pub struct SelectorEntry<'o, T> {
    /// The catalog option
    pub option: &'o T,

    /// Whether it is currently chosen
    pub selected: bool,
}

/// A list of catalog options with the current choice.
#[derive(Debug, Clone, Copy)]
pub struct OptionSelector<'o, 's, T> {
    options: &'o [T],
    current: Current<'s>,
}

impl<'o, 's, T: CatalogOption> OptionSelector<'o, 's, T> {
    /// Create a selector over `options`.
    pub fn new(options: &'o [T], current: Current<'s>) -> Self {
        Self { options, current }
    }

    /// Options in catalog order, with their selected flag.
    pub fn entries(&self) -> impl Iterator<Item = SelectorEntry<'o, T>> + '_ {
        self.options.iter().map(|option| SelectorEntry {
            option,
            selected: self.is_selected(option.id()),
        })
    }

    /// Whether the option with this id is chosen.
    pub fn is_selected(&self, id: &str) -> bool {
        match self.current {
            Current::Single(current) => current == Some(id),
            Current::Multi(state) => state.is_condiment_selected(id),
        }
    }

    /// Resolve a chosen id to its option.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UnknownOption`] if the id is not in the list.
    pub fn choose(&self, id: &str) -> Result<&'o T, SelectorError> {
        find_by_id(self.options, id).ok_or_else(|| SelectorError::UnknownOption(id.to_string()))
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether there is nothing to choose from
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Size selector for an entry.
pub fn sizes<'o, 'a>(
    entry: &'o CatalogEntry<'a>,
    state: &'o SelectionState<'a>,
) -> OptionSelector<'o, 'o, SizeOption<'a>> {
    OptionSelector::new(
        &entry.sizes,
        Current::Single(state.selected_size().map(|size| size.id.as_str())),
    )
}

/// Side selector for an entry.
pub fn sides<'o, 'a>(
    entry: &'o CatalogEntry<'a>,
    state: &'o SelectionState<'a>,
) -> OptionSelector<'o, 'o, SideOption<'a>> {
    OptionSelector::new(
        &entry.sides,
        Current::Single(state.selected_side().map(|side| side.id.as_str())),
    )
}

/// Drink selector for an entry.
pub fn drinks<'o, 'a>(
    entry: &'o CatalogEntry<'a>,
    state: &'o SelectionState<'a>,
) -> OptionSelector<'o, 'o, DrinkOption<'a>> {
    OptionSelector::new(
        &entry.drinks,
        Current::Single(state.selected_drink().map(|drink| drink.id.as_str())),
    )
}

/// Condiment selector for an entry.
pub fn condiments<'o>(
    entry: &'o CatalogEntry<'_>,
    state: &'o SelectionState<'_>,
) -> OptionSelector<'o, 'o, CondimentOption> {
    OptionSelector::new(&entry.condiments, Current::Multi(state))
}

impl<'a> SelectionState<'a> {
    /// Choose a size by id.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UnknownOption`] if the entry has no such size.
    pub fn select_size(self, entry: &CatalogEntry<'a>, id: &str) -> Result<Self, SelectorError> {
        let size = entry
            .size(id)
            .ok_or_else(|| SelectorError::UnknownOption(id.to_string()))?;

        Ok(self.set_size(size.clone()))
    }

    /// Choose a side by id.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UnknownOption`] if the entry has no such side.
    pub fn select_side(self, entry: &CatalogEntry<'a>, id: &str) -> Result<Self, SelectorError> {
        let side = entry
            .side(id)
            .ok_or_else(|| SelectorError::UnknownOption(id.to_string()))?;

        Ok(self.set_side(side.clone()))
    }

    /// Choose a drink by id.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UnknownOption`] if the entry has no such drink.
    pub fn select_drink(self, entry: &CatalogEntry<'a>, id: &str) -> Result<Self, SelectorError> {
        let drink = entry
            .drink(id)
            .ok_or_else(|| SelectorError::UnknownOption(id.to_string()))?;

        Ok(self.set_drink(drink.clone()))
    }

    /// Toggle a condiment by id.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UnknownOption`] if the entry has no such condiment.
    pub fn select_condiment(self, entry: &CatalogEntry<'a>, id: &str) -> Result<Self, SelectorError> {
        if entry.condiment(id).is_none() {
            return Err(SelectorError::UnknownOption(id.to_string()));
        }

        Ok(self.toggle_condiment(entry, id))
    }
}

/// One ingredient row of the stepper.
#[derive(Debug, Clone)]
pub struct StepperRow<'o, 'a> {
    /// The catalog ingredient
    pub ingredient: &'o IngredientOption<'a>,

    /// Current quantity
    pub quantity: u32,

    /// Floor: 1 for required ingredients, otherwise 0
    pub min: u32,

    /// Cap
    pub max: u32,

    /// Charge for the units beyond the first at the current quantity
    pub extra_charge: Money<'a, Currency>,
}

impl StepperRow<'_, '_> {
    /// Whether the increment control is enabled.
    pub const fn can_increment(&self) -> bool {
        self.quantity < self.max
    }

    /// Whether the decrement control is enabled.
    pub const fn can_decrement(&self) -> bool {
        self.quantity > self.min
    }
}

/// Per-ingredient quantity stepper.
#[derive(Debug, Clone, Copy)]
pub struct IngredientStepper<'o, 'a> {
    entry: &'o CatalogEntry<'a>,
}

impl<'o, 'a> IngredientStepper<'o, 'a> {
    /// Create a stepper over an entry's ingredients.
    pub fn new(entry: &'o CatalogEntry<'a>) -> Self {
        Self { entry }
    }

    /// Rows in catalog order for the given selection.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if a tiered charge overflows.
    pub fn rows(&self, state: &SelectionState<'a>) -> Result<Vec<StepperRow<'o, 'a>>, PricingError> {
        self.entry
            .ingredients
            .iter()
            .map(|ingredient| {
                let quantity = state.ingredient_quantity(&ingredient.id);

                Ok(StepperRow {
                    ingredient,
                    quantity,
                    min: ingredient.min_quantity(),
                    max: ingredient.max_quantity(),
                    extra_charge: extra_charge(ingredient, quantity)?,
                })
            })
            .collect()
    }

    /// Add one unit, up to the cap.
    #[must_use]
    pub fn increment(&self, state: SelectionState<'a>, id: &str) -> SelectionState<'a> {
        state.set_ingredient_quantity(self.entry, id, 1)
    }

    /// Remove one unit, down to the floor.
    #[must_use]
    pub fn decrement(&self, state: SelectionState<'a>, id: &str) -> SelectionState<'a> {
        state.set_ingredient_quantity(self.entry, id, -1)
    }
}
