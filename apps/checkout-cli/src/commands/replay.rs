//! `replay`: run a script of reducer actions and show where it ends up.

use bounce_core::{Checkout, CheckoutAction, CheckoutState};
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::render;

use super::read_input;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSON array of actions, e.g. `[{"type": "NEXT_STEP"}]`
    pub actions: PathBuf,

    /// Validate the current step before each NEXT_STEP, like the wizard's
    /// Continue button
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ReplayArgs, config: &AppConfig, json: bool) -> CliResult<()> {
    let actions: Vec<CheckoutAction> = serde_json::from_str(&read_input(&args.actions)?)?;
    let state = replay(actions, config, args.strict)?;

    if json {
        return render::print_json(&state);
    }

    println!("Step: {}", state.current_step);
    println!(
        "Items: {} rental, {} extras selected",
        state.rental_items.len(),
        state.selected_extras().count()
    );
    if !state.errors.is_empty() {
        println!("Errors:");
        render::print_errors(&state.errors);
    }
    render::print_breakdown(&state.prices);

    Ok(())
}

/// Applies every action in order. Stops at the first rejected action.
pub fn replay(
    actions: Vec<CheckoutAction>,
    config: &AppConfig,
    strict: bool,
) -> CliResult<CheckoutState> {
    let mut checkout = Checkout::new(config.pricing.clone())?;

    for (index, action) in actions.into_iter().enumerate() {
        debug!(index, action = action.name(), "Replaying action");

        let result = match action {
            CheckoutAction::NextStep if strict => checkout.advance().map(|_| ()),
            other => checkout.dispatch(other),
        };

        if let Err(e) = result {
            warn!(index, error = %e, "Action rejected");
            return Err(CliError::InvalidInput(format!("action #{} rejected: {}", index + 1, e)));
        }
    }

    Ok(checkout.into_state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounce_core::{CheckoutStep, Money};

    fn actions(json: &str) -> Vec<CheckoutAction> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_replay_reaches_step_and_prices() {
        let state = replay(
            actions(
                r#"[
                {"type": "ADD_RENTAL_ITEM", "item": {"id": "a", "name": "Castle", "price": 20000}},
                {"type": "ADD_RENTAL_ITEM", "item": {"id": "b", "name": "Slide", "price": 10000}},
                {"type": "SET_DELIVERY_DATE", "date": "2024-06-01"},
                {"type": "SET_PICKUP_DATE", "date": "2024-06-01"},
                {"type": "NEXT_STEP"}
            ]"#,
            ),
            &AppConfig::default(),
            false,
        )
        .unwrap();

        assert_eq!(state.current_step, CheckoutStep::Details);
        assert_eq!(state.prices.bouncer_subtotal, Money::from_dollars(250));
    }

    #[test]
    fn test_strict_replay_stops_on_validation() {
        let state = replay(actions(r#"[{"type": "NEXT_STEP"}]"#), &AppConfig::default(), true)
            .unwrap();

        assert_eq!(state.current_step, CheckoutStep::Delivery);
        assert!(!state.errors.is_empty());
    }

    #[test]
    fn test_rejected_action_reports_position() {
        let err = replay(
            actions(r#"[{"type": "CLEAR_ERRORS"}, {"type": "TOGGLE_EXTRA", "id": "ghost"}]"#),
            &AppConfig::default(),
            false,
        )
        .unwrap_err();

        assert!(err.to_string().contains("action #2"));
    }
}
