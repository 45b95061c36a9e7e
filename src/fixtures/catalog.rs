//! Catalog Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    catalog::{
        CatalogEntry, CondimentOption, DrinkOption, IngredientOption, SideOption, SizeOption,
    },
    fixtures::FixtureError,
};

/// Wrapper for catalog entries in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of entry id -> entry fixture
    pub entries: FxHashMap<String, EntryFixture>,
}

/// Catalog Entry Fixture
#[derive(Debug, Deserialize)]
pub struct EntryFixture {
    /// Display name
    pub name: String,

    /// Base price (e.g., "5.00 GBP")
    pub base_price: String,

    /// Whether side and drink are mandatory
    #[serde(default)]
    pub combo: bool,

    /// Sizes in display order
    #[serde(default)]
    pub sizes: Vec<PricedOptionFixture>,

    /// Sides in display order
    #[serde(default)]
    pub sides: Vec<PricedOptionFixture>,

    /// Drinks in display order
    #[serde(default)]
    pub drinks: Vec<PricedOptionFixture>,

    /// Ingredients in display order
    #[serde(default)]
    pub ingredients: Vec<IngredientFixture>,

    /// Condiments in display order
    #[serde(default)]
    pub condiments: Vec<CondimentFixture>,
}

/// Size, side or drink fixture
#[derive(Debug, Deserialize)]
pub struct PricedOptionFixture {
    /// Option id
    pub id: String,

    /// Option name
    pub name: String,

    /// Price added to the unit (e.g., "0.80 GBP")
    #[serde(default = "zero_price")]
    pub price: String,
}

/// Ingredient fixture
#[derive(Debug, Deserialize)]
pub struct IngredientFixture {
    /// Ingredient id
    pub id: String,

    /// Ingredient name
    pub name: String,

    /// Must stay at quantity 1 or more
    #[serde(default)]
    pub required: bool,

    /// Starts at quantity 1
    #[serde(default)]
    pub default: bool,

    /// Quantity cap
    pub max_quantity: u32,

    /// Price per unit beyond the first (e.g., "0.50 GBP")
    #[serde(default = "zero_price")]
    pub extra_price: String,
}

/// Condiment fixture
#[derive(Debug, Deserialize)]
pub struct CondimentFixture {
    /// Condiment id
    pub id: String,

    /// Condiment name
    pub name: String,
}

fn zero_price() -> String {
    "0".to_string()
}

/// Parses prices for one entry, holding them to a single currency.
///
/// A bare amount such as `"0"` takes the entry's currency.
struct PriceParser {
    currency: &'static Currency,
}

impl PriceParser {
    fn parse<'a>(&self, s: &str) -> Result<Money<'a, Currency>, FixtureError> {
        if s.split_whitespace().count() == 1 {
            return Ok(Money::from_minor(parse_minor_units(s)?, self.currency));
        }

        let (minor_units, currency) = parse_price(s)?;

        if currency != self.currency {
            return Err(FixtureError::CurrencyMismatch(
                self.currency.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(Money::from_minor(minor_units, currency))
    }
}

impl EntryFixture {
    /// Currency of the base price, which every other price must share.
    ///
    /// # Errors
    ///
    /// Returns an error if the base price is malformed.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        parse_price(&self.base_price).map(|(_minor_units, currency)| currency)
    }

    /// Convert into a catalog entry with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed, currencies are mixed, or an ingredient has a
    /// zero `max_quantity`.
    pub fn into_entry<'a>(self, id: &str) -> Result<CatalogEntry<'a>, FixtureError> {
        let (base_minor, currency) = parse_price(&self.base_price)?;
        let prices = PriceParser { currency };

        let mut entry = CatalogEntry::new(
            id,
            self.name,
            Money::from_minor(base_minor, currency),
            self.combo,
        );

        entry.sizes = self
            .sizes
            .into_iter()
            .map(|size| {
                Ok(SizeOption {
                    price_modifier: prices.parse(&size.price)?,
                    id: size.id,
                    name: size.name,
                })
            })
            .collect::<Result<_, FixtureError>>()?;

        entry.sides = self
            .sides
            .into_iter()
            .map(|side| {
                Ok(SideOption {
                    extra_price: prices.parse(&side.price)?,
                    id: side.id,
                    name: side.name,
                })
            })
            .collect::<Result<_, FixtureError>>()?;

        entry.drinks = self
            .drinks
            .into_iter()
            .map(|drink| {
                Ok(DrinkOption {
                    extra_price: prices.parse(&drink.price)?,
                    id: drink.id,
                    name: drink.name,
                })
            })
            .collect::<Result<_, FixtureError>>()?;

        entry.ingredients = self
            .ingredients
            .into_iter()
            .map(|ingredient| {
                if ingredient.max_quantity == 0 {
                    return Err(FixtureError::InvalidIngredient(format!(
                        "{id}/{}: max_quantity must be at least 1",
                        ingredient.id
                    )));
                }

                Ok(IngredientOption {
                    extra_price: prices.parse(&ingredient.extra_price)?,
                    id: ingredient.id,
                    name: ingredient.name,
                    is_required: ingredient.required,
                    is_default: ingredient.default,
                    max_quantity: ingredient.max_quantity,
                })
            })
            .collect::<Result<_, FixtureError>>()?;

        entry.condiments = self
            .condiments
            .into_iter()
            .map(|condiment| CondimentOption {
                id: condiment.id,
                name: condiment.name,
            })
            .collect();

        Ok(entry)
    }
}

fn parse_minor_units(s: &str) -> Result<i64, FixtureError> {
    s.parse::<Decimal>()
        .ok()
        .and_then(|amount| amount.checked_mul(Decimal::new(100, 0)))
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = parse_minor_units(amount)?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the value is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = match trimmed.strip_suffix('%') {
        Some(percent_str) => percent_str
            .trim()
            .parse::<f64>()
            .map(|value| value / 100.0),
        None => trimmed.parse::<f64>(),
    }
    .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn entry_fixture(yaml: &str) -> TestResult<EntryFixture> {
        Ok(serde_norway::from_str(yaml)?)
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> TestResult {
        let (usd_minor, usd) = parse_price("1.00 USD")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_minor, 100);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_fractions_of_a_minor_unit() -> TestResult {
        assert!(matches!(
            parse_price("1.005 GBP"),
            Err(FixtureError::InvalidPrice(amount)) if amount == "1.005"
        ));
        assert_eq!(parse_price("1.050 GBP")?, (105, GBP));

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("15%")?, Percentage::from(0.15));
        assert_eq!(parse_percentage("0.15")?, Percentage::from(0.15));
        assert_eq!(parse_percentage("  100%  ")?, Percentage::from(1.0));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_and_negative() {
        assert!(matches!(
            parse_percentage("invalid"),
            Err(FixtureError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("-5%"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn entry_fixture_converts_in_order() -> TestResult {
        let fixture = entry_fixture(
            "name: Burger Combo
base_price: 5.00 GBP
combo: true
sizes:
  - { id: regular, name: Regular }
  - { id: large, name: Large, price: 1.00 GBP }
sides:
  - { id: onion-rings, name: Onion Rings, price: 0.80 GBP }
drinks:
  - { id: water, name: Water }
ingredients:
  - { id: cheese, name: Cheese, max_quantity: 3, extra_price: 0.50 GBP }
  - { id: patty, name: Beef Patty, required: true, max_quantity: 2, extra_price: 2.00 GBP }
condiments:
  - { id: ketchup, name: Ketchup }
",
        )?;

        let entry = fixture.into_entry("burger-combo")?;

        assert_eq!(entry.id, "burger-combo");
        assert!(entry.is_combo);
        assert_eq!(entry.base_price, Money::from_minor(500, GBP));
        assert_eq!(
            entry.sizes.iter().map(|size| size.id.as_str()).collect::<Vec<_>>(),
            vec!["regular", "large"]
        );
        assert_eq!(
            entry.size("regular").map(|size| size.price_modifier),
            Some(Money::from_minor(0, GBP))
        );
        assert_eq!(
            entry.ingredient("patty").map(|patty| (patty.is_required, patty.extra_price)),
            Some((true, Money::from_minor(200, GBP)))
        );
        assert_eq!(entry.condiments.len(), 1);

        Ok(())
    }

    #[test]
    fn entry_fixture_rejects_mixed_currencies() -> TestResult {
        let fixture = entry_fixture(
            "name: Toast
base_price: 2.00 GBP
sizes:
  - { id: one, name: One, price: 0.50 USD }
",
        )?;

        assert!(matches!(
            fixture.into_entry("toast"),
            Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "GBP" && found == "USD"
        ));

        Ok(())
    }

    #[test]
    fn entry_fixture_rejects_zero_max_quantity() -> TestResult {
        let fixture = entry_fixture(
            "name: Toast
base_price: 2.00 GBP
ingredients:
  - { id: butter, name: Butter, max_quantity: 0 }
",
        )?;

        assert!(matches!(
            fixture.into_entry("toast"),
            Err(FixtureError::InvalidIngredient(_))
        ));

        Ok(())
    }
}
