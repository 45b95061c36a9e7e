//! Pricing
//!
//! Turns a selection into a unit price, a subtotal and, with an optional coupon, a
//! [`PricingResult`]. Catalog amounts are whole minor units, so everything up to the subtotal is
//! exact; only the coupon discount introduces fractions, and it is rounded once.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{CatalogEntry, IngredientOption},
    coupons::{Coupon, compute_discount},
    discounts::DiscountError,
    selection::SelectionState,
};

/// Errors that can occur while pricing a selection.
#[derive(Debug, Error)]
pub enum PricingError {
    /// An amount did not fit in minor units.
    #[error("price calculation overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Errors bubbled up from the coupon discount.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Charge for one ingredient beyond its first, included unit.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientExtra<'a> {
    /// Ingredient id
    pub id: String,

    /// Quantity on the selection
    pub quantity: u32,

    /// `(quantity - 1) × extra_price`
    pub amount: Money<'a, Currency>,
}

/// The components of one unit's price.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitBreakdown<'a> {
    /// Catalog base price
    pub base: Money<'a, Currency>,

    /// Size modifier, zero without a size
    pub size: Money<'a, Currency>,

    /// Side extra, zero without a side
    pub side: Money<'a, Currency>,

    /// Drink extra, zero without a drink
    pub drink: Money<'a, Currency>,

    /// Ingredients charged beyond their first unit, in catalog order
    pub ingredient_extras: SmallVec<[IngredientExtra<'a>; 4]>,
}

impl<'a> UnitBreakdown<'a> {
    /// Sum of all components.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the components are in different currencies.
    pub fn unit_price(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.ingredient_extras.iter().try_fold(
            self.base.add(self.size)?.add(self.side)?.add(self.drink)?,
            |acc, extra| acc.add(extra.amount),
        )
    }
}

/// Tiered charge for an ingredient at a quantity: the first unit is free.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the charge does not fit in minor units.
pub fn extra_charge<'a>(
    ingredient: &IngredientOption<'a>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let chargeable = i64::from(quantity.saturating_sub(1));

    let minor = ingredient
        .extra_price
        .to_minor_units()
        .checked_mul(chargeable)
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, ingredient.extra_price.currency()))
}

/// Break the unit price of a selection into its components.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if an ingredient charge overflows.
pub fn unit_breakdown<'a>(
    entry: &CatalogEntry<'a>,
    state: &SelectionState<'a>,
) -> Result<UnitBreakdown<'a>, PricingError> {
    let currency = entry.currency();
    let zero = Money::from_minor(0, currency);

    let ingredient_extras: SmallVec<[IngredientExtra<'a>; 4]> = entry
        .ingredients
        .iter()
        .filter_map(|ingredient| {
            let quantity = state.ingredient_quantity(&ingredient.id);

            (quantity > 1).then(|| {
                extra_charge(ingredient, quantity).map(|amount| IngredientExtra {
                    id: ingredient.id.clone(),
                    quantity,
                    amount,
                })
            })
        })
        .collect::<Result<_, PricingError>>()?;

    Ok(UnitBreakdown {
        base: entry.base_price,
        size: state.selected_size().map_or(zero, |size| size.price_modifier),
        side: state.selected_side().map_or(zero, |side| side.extra_price),
        drink: state.selected_drink().map_or(zero, |drink| drink.extra_price),
        ingredient_extras,
    })
}

/// Price of a single unit.
///
/// # Errors
///
/// Returns a [`PricingError`] if an amount overflows or currencies are mixed.
pub fn unit_price<'a>(
    entry: &CatalogEntry<'a>,
    state: &SelectionState<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    Ok(unit_breakdown(entry, state)?.unit_price()?)
}

/// Unit price multiplied by the unit count.
///
/// # Errors
///
/// Returns a [`PricingError`] if an amount overflows or currencies are mixed.
pub fn compute_subtotal<'a>(
    entry: &CatalogEntry<'a>,
    state: &SelectionState<'a>,
) -> Result<Money<'a, Currency>, PricingError> {
    let unit = unit_price(entry, state)?;

    let minor = unit
        .to_minor_units()
        .checked_mul(i64::from(state.unit_count()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit.currency()))
}

/// Final numbers for one order line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingResult<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> PricingResult<'a> {
    /// Price before the coupon
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount taken off by the coupon
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable: subtotal minus discount
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Price a selection, applying the coupon if one is given.
///
/// # Errors
///
/// Returns a [`PricingError`] if an amount overflows, currencies are mixed, or the discount
/// cannot be calculated.
pub fn price_line<'a>(
    entry: &CatalogEntry<'a>,
    state: &SelectionState<'a>,
    coupon: Option<&Coupon<'a>>,
) -> Result<PricingResult<'a>, PricingError> {
    let subtotal = compute_subtotal(entry, state)?;
    let discount = compute_discount(coupon, subtotal)?;
    let total = subtotal.sub(discount)?;

    Ok(PricingResult {
        subtotal,
        discount,
        total,
    })
}
