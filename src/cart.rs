//! Cart

use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::order_line::OrderLine;

new_key_type! {
    /// Cart line key
    pub struct LineKey;
}

/// Accepts submitted order lines.
pub trait CartAggregate<'a> {
    /// Handle returned for an added line
    type LineId;

    /// Reason a line was refused
    type Error;

    /// Add a line, returning its handle.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the aggregate refuses the line.
    fn add_line(&mut self, line: OrderLine<'a>) -> Result<Self::LineId, Self::Error>;
}

/// Errors related to cart lines or totals.
#[derive(Debug, Error)]
pub enum CartError {
    /// A line's currency differs from the cart currency (line currency, cart currency).
    #[error("Line has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The key does not refer to a line in this cart.
    #[error("No line for key {0:?}")]
    UnknownLine(LineKey),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// In-memory cart of priced order lines.
#[derive(Debug)]
pub struct Cart<'a> {
    lines: SlotMap<LineKey, OrderLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: SlotMap::with_key(),
            currency,
        }
    }

    /// Replace an existing line, e.g. after editing it. Returns the previous line.
    ///
    /// # Errors
    ///
    /// - [`CartError::UnknownLine`]: the key is not in the cart.
    /// - [`CartError::CurrencyMismatch`]: the new line is priced in another currency.
    pub fn replace_line(
        &mut self,
        key: LineKey,
        line: OrderLine<'a>,
    ) -> Result<OrderLine<'a>, CartError> {
        self.check_currency(&line)?;

        let slot = self.lines.get_mut(key).ok_or(CartError::UnknownLine(key))?;

        Ok(std::mem::replace(slot, line))
    }

    /// Remove a line, returning it if it was present.
    pub fn remove_line(&mut self, key: LineKey) -> Option<OrderLine<'a>> {
        self.lines.remove(key)
    }

    /// Get a line by key.
    pub fn line(&self, key: LineKey) -> Option<&OrderLine<'a>> {
        self.lines.get(key)
    }

    /// Iterate over the lines and their keys.
    pub fn lines(&self) -> impl Iterator<Item = (LineKey, &OrderLine<'a>)> {
        self.lines.iter()
    }

    /// Sum of the line totals, after each line's discount.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if there was a money arithmetic or currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        self.lines
            .values()
            .try_fold(Money::from_minor(0, self.currency), |acc, line| {
                acc.add(line.pricing.total()).map_err(CartError::from)
            })
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check_currency(&self, line: &OrderLine<'a>) -> Result<(), CartError> {
        let line_currency = line.pricing.total().currency();

        if line_currency == self.currency {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch(
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }
}

impl<'a> CartAggregate<'a> for Cart<'a> {
    type LineId = LineKey;
    type Error = CartError;

    /// Add a line after checking its currency.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the line is priced in another currency.
    fn add_line(&mut self, line: OrderLine<'a>) -> Result<LineKey, CartError> {
        self.check_currency(&line)?;

        Ok(self.lines.insert(line))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{
        catalog::{CatalogEntry, SizeOption},
        order_line::OrderLineBuilder,
        selection::SelectionState,
    };

    use super::*;

    fn line(minor: i64, currency: &'static Currency) -> TestResult<OrderLine<'static>> {
        let mut entry = CatalogEntry::new("toast", "Toast", Money::from_minor(minor, currency), false);

        entry.sizes = vec![SizeOption {
            id: "one".to_string(),
            name: "One Slice".to_string(),
            price_modifier: Money::from_minor(0, currency),
        }];

        let state = SelectionState::new(&entry);

        Ok(OrderLineBuilder::new(&entry).build(&state)?)
    }

    #[test]
    fn new_cart_is_empty() -> TestResult {
        let cart = Cart::new(GBP);

        assert!(cart.is_empty());
        assert_eq!(cart.currency(), GBP);
        assert_eq!(cart.subtotal()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn subtotal_sums_line_totals() -> TestResult {
        let mut cart = Cart::new(GBP);

        cart.add_line(line(250, GBP)?)?;
        cart.add_line(line(400, GBP)?)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.subtotal()?, Money::from_minor(650, GBP));

        Ok(())
    }

    #[test]
    fn add_line_rejects_other_currency() -> TestResult {
        let mut cart = Cart::new(GBP);

        let result = cart.add_line(line(250, USD)?);

        assert!(matches!(result, Err(CartError::CurrencyMismatch("USD", "GBP"))));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn replace_line_keeps_key() -> TestResult {
        let mut cart = Cart::new(GBP);
        let key = cart.add_line(line(250, GBP)?)?;

        let previous = cart.replace_line(key, line(300, GBP)?)?;

        assert_eq!(previous.pricing.total(), Money::from_minor(250, GBP));
        assert_eq!(
            cart.line(key).map(|line| line.pricing.total()),
            Some(Money::from_minor(300, GBP))
        );
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn replace_removed_line_errors() -> TestResult {
        let mut cart = Cart::new(GBP);
        let key = cart.add_line(line(250, GBP)?)?;

        assert!(cart.remove_line(key).is_some());
        assert!(matches!(
            cart.replace_line(key, line(300, GBP)?),
            Err(CartError::UnknownLine(_))
        ));

        Ok(())
    }
}
