//! Order Lines
//!
//! Composes validation, pricing, coupon evaluation and the customization codec into the payload
//! handed to the cart.

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{CartAggregate, CartError},
    catalog::CatalogEntry,
    codec,
    coupons::{Coupon, CouponStore},
    pricing::{PricingError, PricingResult, price_line},
    selection::SelectionState,
    validation::{ValidationError, validate},
};

/// Errors raised when building an order line.
#[derive(Debug, Error)]
pub enum OrderLineError {
    /// The selection is not submittable yet.
    #[error(transparent)]
    Incomplete(#[from] ValidationError),

    /// Errors bubbled up from pricing.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The cart refused the line.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A priced, validated order line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine<'a> {
    /// Catalog entry id
    pub product_id: String,

    /// Chosen size id
    pub size_id: String,

    /// Chosen side id, if any
    pub side_id: Option<String>,

    /// Chosen drink id, if any
    pub drink_id: Option<String>,

    /// Number of units
    pub unit_count: u32,

    /// Ingredient quantities and condiments, see [`codec`]
    pub serialized_customizations: String,

    /// Subtotal, discount and total for this line
    pub pricing: PricingResult<'a>,
}

/// Builds order lines for one catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct OrderLineBuilder<'e, 'a> {
    entry: &'e CatalogEntry<'a>,
    coupon: Option<&'e Coupon<'a>>,
}

impl<'e, 'a> OrderLineBuilder<'e, 'a> {
    /// Create a builder with no coupon.
    pub fn new(entry: &'e CatalogEntry<'a>) -> Self {
        Self {
            entry,
            coupon: None,
        }
    }

    /// Apply a coupon to every line built.
    #[must_use]
    pub fn with_coupon(self, coupon: Option<&'e Coupon<'a>>) -> Self {
        Self { coupon, ..self }
    }

    /// Apply whatever coupon the store currently holds.
    #[must_use]
    pub fn with_coupon_store<S: CouponStore<'a>>(self, store: &'e S) -> Self {
        self.with_coupon(store.active())
    }

    /// The entry lines are built for
    pub fn entry(&self) -> &'e CatalogEntry<'a> {
        self.entry
    }

    /// Price a selection without validating it, e.g. for a live price while editing.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the price cannot be calculated.
    pub fn quote(&self, state: &SelectionState<'a>) -> Result<PricingResult<'a>, PricingError> {
        price_line(self.entry, state, self.coupon)
    }

    /// Validate, price and serialize a selection.
    ///
    /// # Errors
    ///
    /// - [`OrderLineError::Incomplete`]: the selection is missing a required choice.
    /// - [`OrderLineError::Pricing`]: the price cannot be calculated.
    #[tracing::instrument(
        name = "order_line.build",
        skip_all,
        fields(
            product_id = %self.entry.id,
            coupon_id = tracing::field::Empty,
            unit_count = state.unit_count()
        )
    )]
    pub fn build(&self, state: &SelectionState<'a>) -> Result<OrderLine<'a>, OrderLineError> {
        if let Some(coupon) = self.coupon {
            tracing::Span::current().record("coupon_id", tracing::field::display(&coupon.id));
        }

        if let Err(err) = validate(self.entry, state) {
            debug!(error = %err, "selection is not submittable");

            return Err(err.into());
        }

        // Validation guarantees a size.
        let size_id = state
            .selected_size()
            .map(|size| size.id.clone())
            .unwrap_or_default();

        let pricing = self.quote(state)?;

        info!(total = %pricing.total(), "built order line");

        Ok(OrderLine {
            product_id: self.entry.id.clone(),
            size_id,
            side_id: state.selected_side().map(|side| side.id.clone()),
            drink_id: state.selected_drink().map(|drink| drink.id.clone()),
            unit_count: state.unit_count(),
            serialized_customizations: codec::serialize(state),
            pricing,
        })
    }

    /// Build a line and hand it to the cart.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderLineError`] if the line cannot be built or the cart refuses it. The cart
    /// is left untouched in either case.
    pub fn submit<C>(
        &self,
        cart: &mut C,
        state: &SelectionState<'a>,
    ) -> Result<C::LineId, OrderLineError>
    where
        C: CartAggregate<'a>,
        OrderLineError: From<C::Error>,
    {
        let line = self.build(state)?;

        Ok(cart.add_line(line)?)
    }
}
