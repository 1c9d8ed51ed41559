//! `quote`: price a cart without storing anything.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use bounce_core::{FieldErrors, PriceBreakdown};

use crate::cart::CartRequest;
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

use super::read_input;

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Cart request JSON file
    pub cart: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteOutput<'a> {
    prices: &'a PriceBreakdown,
    rental_days: i32,
    /// Validation problems still blocking submission, keyed by field.
    open_issues: FieldErrors,
}

pub fn run(args: QuoteArgs, config: &AppConfig, json: bool) -> CliResult<()> {
    let cart = CartRequest::from_json(&read_input(&args.cart)?)?;
    let checkout = cart.into_checkout(config.pricing.clone())?;

    let open_issues = bounce_core::validation::first_invalid_step(
        bounce_core::CheckoutStep::Review,
        checkout.state(),
        checkout.config(),
    )
    .map(|(_, errors)| errors)
    .unwrap_or_default();

    let prices = checkout.breakdown();

    if json {
        return render::print_json(&QuoteOutput {
            prices,
            rental_days: prices.rental_days,
            open_issues,
        });
    }

    if let Some(item) = checkout.primary_rental_item() {
        println!("Quote for {} ({} item(s))", item.name, checkout.state().rental_items.len());
    } else {
        println!("Quote");
    }
    render::print_breakdown(prices);

    if !open_issues.is_empty() {
        println!();
        println!("Not ready to submit:");
        render::print_errors(&open_issues);
    }

    Ok(())
}
