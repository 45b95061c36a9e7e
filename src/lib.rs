//! Orderline
//!
//! Orderline composes, validates and prices food-ordering order lines: a catalog entry plus the
//! user's size, side, drink, ingredient and condiment choices become a priced line for the cart,
//! optionally reduced by a coupon, and can be rebuilt from that line for editing.

pub mod cart;
pub mod catalog;
pub mod codec;
pub mod coupons;
pub mod discounts;
pub mod edit;
pub mod fixtures;
pub mod order_line;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod selection;
pub mod selectors;
pub mod validation;
