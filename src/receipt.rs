//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::CatalogEntry,
    edit::{EditRequest, rehydrate},
    order_line::OrderLine,
    pricing::{PricingError, PricingResult, UnitBreakdown, unit_breakdown},
    selection::SelectionState,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing the selection.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One row of the unit breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRow<'a> {
    /// Component label, e.g. "Size"
    pub label: &'static str,

    /// Option name
    pub name: String,

    /// Quantity, shown for ingredients only
    pub quantity: Option<u32>,

    /// Amount added to the unit price
    pub amount: Money<'a, Currency>,
}

/// Itemised receipt for a single order line.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    rows: Vec<ReceiptRow<'a>>,
    unit_price: Money<'a, Currency>,
    unit_count: u32,
    pricing: PricingResult<'a>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt for a selection and its pricing.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the unit price cannot be calculated.
    pub fn from_selection(
        entry: &CatalogEntry<'a>,
        state: &SelectionState<'a>,
        pricing: PricingResult<'a>,
    ) -> Result<Self, ReceiptError> {
        let breakdown = unit_breakdown(entry, state)?;
        let unit_price = breakdown.unit_price()?;

        Ok(Self {
            rows: breakdown_rows(entry, state, breakdown),
            unit_price,
            unit_count: state.unit_count(),
            pricing,
        })
    }

    /// Build a receipt for an order line already in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the unit price cannot be calculated.
    pub fn from_line(entry: &CatalogEntry<'a>, line: &OrderLine<'a>) -> Result<Self, ReceiptError> {
        let (state, _report) = rehydrate(entry, &EditRequest::for_line(entry, line));

        Self::from_selection(entry, &state.set_unit_count(line.unit_count), line.pricing)
    }

    /// Unit breakdown rows
    pub fn rows(&self) -> &[ReceiptRow<'a>] {
        &self.rows
    }

    /// Price of one unit
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Number of units
    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    /// Subtotal, discount and total
    pub fn pricing(&self) -> PricingResult<'a> {
        self.pricing
    }

    /// Write the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Option", "Qty", "Price"]);

        for row in &self.rows {
            builder.push_record([
                row.label.to_string(),
                row.name.clone(),
                row.quantity.map(|qty| qty.to_string()).unwrap_or_default(),
                row.amount.to_string(),
            ]);
        }

        builder.push_record([
            "Unit".to_string(),
            String::new(),
            self.unit_count.to_string(),
            self.unit_price.to_string(),
        ]);

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);
        theme.insert_horizontal_line(self.rows.len() + 1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..4), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        let summary = [
            ("Subtotal:", self.pricing.subtotal()),
            ("Discount:", self.pricing.discount()),
            ("Total:", self.pricing.total()),
        ];

        let value_width = summary
            .iter()
            .map(|(_label, value)| value.to_string().len())
            .max()
            .unwrap_or_default();

        for (label, value) in summary {
            writeln!(out, " {label:<10}{:>value_width$}", value.to_string())
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn breakdown_rows<'a>(
    entry: &CatalogEntry<'a>,
    state: &SelectionState<'a>,
    breakdown: UnitBreakdown<'a>,
) -> Vec<ReceiptRow<'a>> {
    let mut rows = vec![ReceiptRow {
        label: "Item",
        name: entry.name.clone(),
        quantity: None,
        amount: breakdown.base,
    }];

    if let Some(size) = state.selected_size() {
        rows.push(ReceiptRow {
            label: "Size",
            name: size.name.clone(),
            quantity: None,
            amount: breakdown.size,
        });
    }

    if let Some(side) = state.selected_side() {
        rows.push(ReceiptRow {
            label: "Side",
            name: side.name.clone(),
            quantity: None,
            amount: breakdown.side,
        });
    }

    if let Some(drink) = state.selected_drink() {
        rows.push(ReceiptRow {
            label: "Drink",
            name: drink.name.clone(),
            quantity: None,
            amount: breakdown.drink,
        });
    }

    rows.extend(breakdown.ingredient_extras.into_iter().map(|extra| {
        let name = entry
            .ingredient(&extra.id)
            .map_or_else(|| extra.id.clone(), |ingredient| ingredient.name.clone());

        ReceiptRow {
            label: "Extra",
            name,
            quantity: Some(extra.quantity),
            amount: extra.amount,
        }
    }));

    rows
}
