//! Orderline prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartAggregate, CartError, LineKey},
    catalog::{
        CatalogEntry, CatalogError, CatalogOption, CatalogService, CondimentOption, DrinkOption,
        IngredientOption, SideOption, SizeOption,
    },
    codec::{Customizations, SerializationError},
    coupons::{ActiveCoupon, Coupon, CouponDiscount, CouponStore, DiscountType, compute_discount},
    discounts::DiscountError,
    edit::{CustomizationOutcome, EditRequest, RehydrationReport, rehydrate},
    fixtures::{Fixture, FixtureError},
    order_line::{OrderLine, OrderLineBuilder, OrderLineError},
    pricing::{PricingError, PricingResult, compute_subtotal, price_line, unit_price},
    receipt::{Receipt, ReceiptError},
    selection::{MAX_UNIT_COUNT, MIN_UNIT_COUNT, SelectionState},
    selectors::{IngredientStepper, OptionSelector, SelectorError},
    validation::{MissingSelection, ValidationError, is_submittable, missing_count},
};
