//! Catalog
//!
//! Immutable product descriptions as supplied by the catalog service. Option lists are kept in
//! catalog order; that order is the order users see them in.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised by a catalog service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No entry exists for the requested id.
    #[error("Catalog entry not found: {0}")]
    NotFound(String),
}

/// Source of catalog entries.
///
/// A missing entry is a terminal display state for the product screen; the engine itself never
/// fetches entries.
pub trait CatalogService<'a> {
    /// Look up a catalog entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no entry has the given id.
    fn get_entry(&self, id: &str) -> Result<&CatalogEntry<'a>, CatalogError>;
}

/// Common accessors shared by every kind of catalog option.
pub trait CatalogOption {
    /// Stable catalog id
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;
}

/// A size choice. The first size in the catalog is preselected.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeOption<'a> {
    /// Size id
    pub id: String,

    /// Size name
    pub name: String,

    /// Amount added to the base price when this size is chosen
    pub price_modifier: Money<'a, Currency>,
}

/// A side choice, mandatory for combos.
#[derive(Debug, Clone, PartialEq)]
pub struct SideOption<'a> {
    /// Side id
    pub id: String,

    /// Side name
    pub name: String,

    /// Amount added to the unit price
    pub extra_price: Money<'a, Currency>,
}

/// A drink choice, mandatory for combos.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkOption<'a> {
    /// Drink id
    pub id: String,

    /// Drink name
    pub name: String,

    /// Amount added to the unit price
    pub extra_price: Money<'a, Currency>,
}

/// An ingredient with a capped quantity and a tiered price.
///
/// The first unit is included in the base price; `extra_price` is charged for every unit
/// beyond the first.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientOption<'a> {
    /// Ingredient id
    pub id: String,

    /// Ingredient name
    pub name: String,

    /// Whether the line is blocked while this ingredient is at zero
    pub is_required: bool,

    /// Whether the ingredient starts at quantity 1
    pub is_default: bool,

    /// Largest allowed quantity, at least 1
    pub max_quantity: u32,

    /// Charge per unit beyond the first
    pub extra_price: Money<'a, Currency>,
}

impl IngredientOption<'_> {
    /// Smallest quantity the stepper may reach.
    pub const fn min_quantity(&self) -> u32 {
        if self.is_required { 1 } else { 0 }
    }

    /// Largest quantity the stepper may reach.
    ///
    /// Never below [`IngredientOption::min_quantity`], even for malformed catalog data.
    pub fn max_quantity(&self) -> u32 {
        self.max_quantity.max(self.min_quantity())
    }

    /// Quantity the ingredient starts at on a fresh selection.
    pub const fn initial_quantity(&self) -> u32 {
        if self.is_required || self.is_default {
            1
        } else {
            0
        }
    }

    /// Clamp a candidate quantity into this ingredient's allowed range.
    pub fn clamp_quantity(&self, quantity: i64) -> u32 {
        let clamped = quantity.clamp(
            i64::from(self.min_quantity()),
            i64::from(self.max_quantity()),
        );

        u32::try_from(clamped).unwrap_or(self.min_quantity())
    }
}

/// A free, toggleable condiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondimentOption {
    /// Condiment id
    pub id: String,

    /// Condiment name
    pub name: String,
}

macro_rules! impl_catalog_option {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CatalogOption for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

impl_catalog_option!(
    SizeOption<'_>,
    SideOption<'_>,
    DrinkOption<'_>,
    IngredientOption<'_>,
    CondimentOption,
);

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry<'a> {
    /// Product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Price before any option is applied
    pub base_price: Money<'a, Currency>,

    /// Combos require a side and a drink in addition to a size
    pub is_combo: bool,

    /// Sizes, in display order
    pub sizes: Vec<SizeOption<'a>>,

    /// Sides, in display order
    pub sides: Vec<SideOption<'a>>,

    /// Drinks, in display order
    pub drinks: Vec<DrinkOption<'a>>,

    /// Ingredients, in display order
    pub ingredients: Vec<IngredientOption<'a>>,

    /// Condiments, in display order
    pub condiments: Vec<CondimentOption>,
}

impl<'a> CatalogEntry<'a> {
    /// Create an entry with no options.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: Money<'a, Currency>,
        is_combo: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            is_combo,
            sizes: Vec::new(),
            sides: Vec::new(),
            drinks: Vec::new(),
            ingredients: Vec::new(),
            condiments: Vec::new(),
        }
    }

    /// Currency of the base price, which every amount on the entry is expected to share.
    pub fn currency(&self) -> &'a Currency {
        self.base_price.currency()
    }

    /// Find an ingredient by id.
    pub fn ingredient(&self, id: &str) -> Option<&IngredientOption<'a>> {
        self.ingredients.iter().find(|ingredient| ingredient.id == id)
    }

    /// Find a condiment by id.
    pub fn condiment(&self, id: &str) -> Option<&CondimentOption> {
        self.condiments.iter().find(|condiment| condiment.id == id)
    }

    /// Find a size by id.
    pub fn size(&self, id: &str) -> Option<&SizeOption<'a>> {
        find_by_id(&self.sizes, id)
    }

    /// Find a side by id.
    pub fn side(&self, id: &str) -> Option<&SideOption<'a>> {
        find_by_id(&self.sides, id)
    }

    /// Find a drink by id.
    pub fn drink(&self, id: &str) -> Option<&DrinkOption<'a>> {
        find_by_id(&self.drinks, id)
    }
}

/// Find an option by its catalog id.
pub fn find_by_id<'o, T: CatalogOption>(options: &'o [T], id: &str) -> Option<&'o T> {
    options.iter().find(|option| option.id() == id)
}

/// Find an option by its display name.
pub fn find_by_name<'o, T: CatalogOption>(options: &'o [T], name: &str) -> Option<&'o T> {
    options.iter().find(|option| option.name() == name)
}
