//! Fixtures
//!
//! YAML catalog and coupon sets, loaded from `<base>/catalog/<set>.yml` and
//! `<base>/coupons/<set>.yml`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    catalog::{CatalogEntry, CatalogError, CatalogService},
    coupons::Coupon,
};

pub mod catalog;
pub mod coupons;

new_key_type! {
    /// Catalog entry key
    pub struct EntryKey;
}

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid ingredient data
    #[error("Invalid ingredient: {0}")]
    InvalidIngredient(String),

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No catalog loaded yet
    #[error("No catalog loaded yet; currency unknown")]
    NoCurrency,

    /// Catalog entry not found
    #[error("Catalog entry not found: {0}")]
    EntryNotFound(String),

    /// Coupon not found
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// `SlotMap` to store entries with generated keys
    entries: SlotMap<EntryKey, CatalogEntry<'a>>,

    /// Entry id -> `SlotMap` key mapping for lookups
    entry_keys: FxHashMap<String, EntryKey>,

    /// Coupons by id
    coupons: FxHashMap<String, Coupon<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            entries: SlotMap::with_key(),
            entry_keys: FxHashMap::default(),
            coupons: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load catalog entries from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an entry is invalid, or if
    /// there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: catalog::CatalogFixture = serde_norway::from_str(&contents)?;

        let mut set_currency = self.currency;
        let mut entries = Vec::with_capacity(fixture.entries.len());

        for (id, entry_fixture) in fixture.entries {
            let currency = entry_fixture.currency()?;

            match set_currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => set_currency = Some(currency),
            }

            let entry = entry_fixture.into_entry(&id)?;

            entries.push((id, entry));
        }

        // Nothing is stored unless the whole file is valid.
        self.currency = set_currency;

        for (id, entry) in entries {
            if let Some(previous) = self.entry_keys.remove(&id) {
                self.entries.remove(previous);
            }

            let key = self.entries.insert(entry);

            self.entry_keys.insert(id, key);
        }

        Ok(self)
    }

    /// Load coupons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog is loaded yet, if the file cannot be read or parsed, or if
    /// a coupon is invalid or in another currency.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let currency = self.currency()?;
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: coupons::CouponsFixture = serde_norway::from_str(&contents)?;

        for (id, coupon_fixture) in fixture.coupons {
            let coupon = coupon_fixture.into_coupon(&id, currency)?;

            self.coupons.insert(id, coupon);
        }

        Ok(self)
    }

    /// Load a complete fixture set (catalog and coupons) with the same name
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_at("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_at(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_catalog(name)?.load_coupons(name)?;

        Ok(fixture)
    }

    /// Get a catalog entry by id
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not found.
    pub fn entry(&self, id: &str) -> Result<&CatalogEntry<'a>, FixtureError> {
        self.entry_keys
            .get(id)
            .and_then(|key| self.entries.get(*key))
            .ok_or_else(|| FixtureError::EntryNotFound(id.to_string()))
    }

    /// Get a coupon by id
    ///
    /// # Errors
    ///
    /// Returns an error if the coupon is not found.
    pub fn coupon(&self, id: &str) -> Result<&Coupon<'a>, FixtureError> {
        self.coupons
            .get(id)
            .ok_or_else(|| FixtureError::CouponNotFound(id.to_string()))
    }

    /// Iterate over all loaded catalog entries
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry<'a>> {
        self.entries.values()
    }

    /// Get the currency of the fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CatalogService<'a> for Fixture<'a> {
    fn get_entry(&self, id: &str) -> Result<&CatalogEntry<'a>, CatalogError> {
        self.entry(id)
            .map_err(|_err| CatalogError::NotFound(id.to_string()))
    }
}
