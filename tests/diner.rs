//! Integration tests against the `diner` fixture set.
//!
//! The burger combo is priced at £5.00 with a £1.00 large upgrade, £0.80 onion rings, free water
//! and cheese at £0.50 per portion beyond the first. The beef patty is required and starts at one.
//!
//! Two large burger combos with onion rings, water and triple cheese:
//!
//! - Unit: £5.00 + £1.00 + £0.80 + £0.00 + 2 × £0.50 = £7.80
//! - Subtotal: 2 × £7.80 = £15.60
//! - `SAVE15` (15%, capped at £1.50): £2.34 capped to £1.50, total £14.10

use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use orderline::{
    cart::{Cart, CartAggregate},
    catalog::{CatalogEntry, CatalogService},
    fixtures::Fixture,
    order_line::{OrderLineBuilder, OrderLineError},
    pricing::{compute_subtotal, price_line, unit_price},
    selection::SelectionState,
    selectors::IngredientStepper,
    validation::{ValidationError, is_submittable, missing_count},
};

fn large_combo<'a>(entry: &CatalogEntry<'a>) -> TestResult<SelectionState<'a>> {
    Ok(SelectionState::new(entry)
        .select_size(entry, "large")?
        .select_side(entry, "onion-rings")?
        .select_drink(entry, "water")?
        .set_ingredient_quantity(entry, "cheese", 3)
        .set_unit_count(2))
}

#[test]
fn two_large_combos_with_triple_cheese() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("burger-combo")?;
    let state = large_combo(entry)?;

    assert_eq!(state.ingredient_quantity("patty"), 1);
    assert_eq!(state.ingredient_quantity("lettuce"), 1);
    assert_eq!(unit_price(entry, &state)?, Money::from_minor(780, GBP));
    assert_eq!(compute_subtotal(entry, &state)?, Money::from_minor(1560, GBP));

    Ok(())
}

#[test]
fn capped_percentage_coupon() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("burger-combo")?;
    let state = large_combo(entry)?;

    let result = price_line(entry, &state, Some(fixture.coupon("SAVE15")?))?;

    assert_eq!(result.subtotal(), Money::from_minor(1560, GBP));
    assert_eq!(result.discount(), Money::from_minor(150, GBP));
    assert_eq!(result.total(), Money::from_minor(1410, GBP));

    Ok(())
}

#[test]
fn coupon_below_min_purchase_gives_nothing() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("toast")?;
    let state = SelectionState::new(entry).set_unit_count(2);

    let result = price_line(entry, &state, Some(fixture.coupon("FIVER")?))?;

    assert_eq!(result.subtotal(), Money::from_minor(300, GBP));
    assert_eq!(result.discount(), Money::from_minor(0, GBP));
    assert_eq!(result.total(), Money::from_minor(300, GBP));

    Ok(())
}

#[test]
fn fixed_coupon_at_min_purchase_applies() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("burger-combo")?;
    let state = SelectionState::new(entry)
        .select_side(entry, "fries")?
        .select_drink(entry, "water")?;

    let result = price_line(entry, &state, Some(fixture.coupon("FIVER")?))?;

    assert_eq!(result.subtotal(), Money::from_minor(500, GBP));
    assert_eq!(result.discount(), Money::from_minor(500, GBP));
    assert_eq!(result.total(), Money::from_minor(0, GBP));

    Ok(())
}

#[test]
fn combo_without_side_is_not_submittable() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("burger-combo")?;
    let state = SelectionState::new(entry)
        .select_size(entry, "regular")?
        .select_drink(entry, "cola")?;

    assert!(!is_submittable(entry, &state));
    assert_eq!(missing_count(entry, &state), 1);

    let mut cart = Cart::new(GBP);
    let result = OrderLineBuilder::new(entry).submit(&mut cart, &state);

    assert!(matches!(
        result,
        Err(OrderLineError::Incomplete(ValidationError::MissingSelections(_)))
    ));
    assert!(cart.is_empty());

    let state = state.select_side(entry, "fries")?;

    assert!(is_submittable(entry, &state));
    assert_eq!(missing_count(entry, &state), 0);

    Ok(())
}

#[test]
fn simple_item_needs_only_a_size() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("toast")?;
    let state = SelectionState::new(entry);

    assert!(is_submittable(entry, &state));
    assert_eq!(missing_count(entry, &state), 0);

    Ok(())
}

#[test]
fn stepper_never_removes_the_patty() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("burger-combo")?;
    let stepper = IngredientStepper::new(entry);
    let mut state = SelectionState::new(entry);

    for _ in 0..3 {
        state = stepper.decrement(state, "patty");
    }

    assert_eq!(state.ingredient_quantity("patty"), 1);

    let rows = stepper.rows(&state)?;
    let patty = rows.iter().find(|row| row.ingredient.id == "patty");

    assert!(patty.is_some_and(|row| !row.can_decrement() && row.can_increment()));

    Ok(())
}

#[test]
fn submitted_lines_add_up_in_the_cart() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let combo = fixture.get_entry("burger-combo")?;
    let toast = fixture.get_entry("toast")?;
    let mut cart = Cart::new(fixture.currency()?);

    OrderLineBuilder::new(combo)
        .with_coupon(Some(fixture.coupon("SAVE15")?))
        .submit(&mut cart, &large_combo(combo)?)?;

    let toast_line = OrderLineBuilder::new(toast).build(&SelectionState::new(toast))?;

    cart.add_line(toast_line)?;

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.subtotal()?, Money::from_minor(1560, GBP));

    Ok(())
}

#[test]
fn adding_ingredients_never_lowers_the_subtotal() -> TestResult {
    let fixture = Fixture::from_set("diner")?;
    let entry = fixture.get_entry("burger-combo")?;
    let stepper = IngredientStepper::new(entry);

    for ingredient in &entry.ingredients {
        let mut state = large_combo(entry)?;

        for _ in 0..=ingredient.max_quantity {
            let before = compute_subtotal(entry, &state)?;
            state = stepper.increment(state, &ingredient.id);
            let after = compute_subtotal(entry, &state)?;

            assert!(after.to_minor_units() >= before.to_minor_units());
        }
    }

    Ok(())
}
