//! Orderline quote
//!
//! Prices a single order line from a fixture set and prints its receipt.

use std::{io, path::PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use orderline::{
    catalog::CatalogService,
    codec::{self, Customizations},
    edit::{EditRequest, rehydrate},
    fixtures::Fixture,
    order_line::OrderLineBuilder,
    receipt::Receipt,
    selection::{MAX_UNIT_COUNT, MIN_UNIT_COUNT, SelectionState},
    validation::missing_selections,
};

/// Order line quote configuration
#[derive(Debug, Parser)]
#[command(name = "orderline-quote", about = "Price an order line from a fixture set", long_about = None)]
struct QuoteConfig {
    /// Catalog entry id
    product: String,

    /// Fixture directory containing `catalog/` and `coupons/`
    #[arg(short, long, env = "ORDERLINE_FIXTURES", default_value = "./fixtures")]
    fixtures: PathBuf,

    /// Fixture set name
    #[arg(short = 'S', long, env = "ORDERLINE_SET", default_value = "diner")]
    set: String,

    /// Size name (defaults to the first size)
    #[arg(long)]
    size: Option<String>,

    /// Side name
    #[arg(long)]
    side: Option<String>,

    /// Drink name
    #[arg(long)]
    drink: Option<String>,

    /// Ingredient quantity as `id=quantity`, repeatable
    #[arg(short, long = "ingredient", value_parser = parse_ingredient)]
    ingredients: Vec<(String, u32)>,

    /// Condiment id to add, repeatable
    #[arg(short, long = "condiment")]
    condiments: Vec<String>,

    /// Number of units
    #[arg(
        short,
        long,
        default_value_t = MIN_UNIT_COUNT,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_UNIT_COUNT)..=i64::from(MAX_UNIT_COUNT))
    )]
    units: u32,

    /// Coupon id to apply
    #[arg(long, env = "ORDERLINE_COUPON")]
    coupon: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,
}

fn parse_ingredient(s: &str) -> Result<(String, u32), String> {
    let (id, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `id=quantity`, got `{s}`"))?;

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid quantity for `{id}`: {err}"))?;

    Ok((id.trim().to_string(), quantity))
}

fn main() -> anyhow::Result<()> {
    let config = QuoteConfig::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let fixture = Fixture::from_set_at(&config.fixtures, &config.set).with_context(|| {
        format!(
            "loading fixture set `{}` from {}",
            config.set,
            config.fixtures.display()
        )
    })?;

    let entry = fixture.get_entry(&config.product)?;

    let mut customizations = Customizations::from_state(&SelectionState::new(entry));

    for (id, quantity) in &config.ingredients {
        if entry.ingredient(id).is_none() {
            bail!("`{}` has no ingredient `{id}`", entry.id);
        }

        customizations.ingredients.insert(id.clone(), *quantity);
    }

    for id in &config.condiments {
        if entry.condiment(id).is_none() {
            bail!("`{}` has no condiment `{id}`", entry.id);
        }

        customizations.condiments.insert(id.clone(), true);
    }

    let request = EditRequest {
        size_name: config.size.clone(),
        side_name: config.side.clone(),
        drink_name: config.drink.clone(),
        serialized_customizations: Some(codec::encode(&customizations)),
    };

    let (state, report) = rehydrate(entry, &request);

    if let Some(unmatched) = report.unmatched.first() {
        bail!("`{}` has no {} named `{}`", entry.id, unmatched.kind, unmatched.name);
    }

    let state = state.set_unit_count(config.units);

    let coupon = config
        .coupon
        .as_deref()
        .map(|id| fixture.coupon(id))
        .transpose()?;

    let missing = missing_selections(entry, &state);

    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();

        info!(missing = missing.len(), "selection is incomplete");

        bail!("{} required selection(s) missing: {}", missing.len(), names.join(", "));
    }

    let line = OrderLineBuilder::new(entry).with_coupon(coupon).build(&state)?;

    info!(
        product_id = %line.product_id,
        customizations = %line.serialized_customizations,
        "quoted order line"
    );

    Receipt::from_selection(entry, &state, line.pricing)?.write_to(io::stdout().lock())?;

    Ok(())
}
