//! # Checkout Reducer
//!
//! `apply_action(state, action, config) -> state'`
//!
//! ```text
//!   action ──► validate references ──► mutate copy ──► derived fields ──► state'
//!                    │                                 (discounts, overnight
//!                    └──► Err(CoreError), state          extra, prices)
//!                         untouched
//! ```
//!
//! Every action ends with a full price recomputation, so navigation and
//! validation always see current totals.

use tracing::debug;

use crate::checkout::{CheckoutAction, CheckoutState};
use crate::config::PricingConfig;
use crate::discount::apply_discounts;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::calculate_prices;
use crate::rental::RentalDuration;
use crate::types::{ExtraItem, OrderStatus, PaymentMethod, PaymentStatus, MAX_MIXER_TANKS};

/// Applies one action and returns the next state.
///
/// On `Err` the input state is unchanged.
pub fn apply_action(
    state: &CheckoutState,
    action: CheckoutAction,
    config: &PricingConfig,
) -> CoreResult<CheckoutState> {
    let name = action.name();
    let mut next = state.clone();

    reduce(&mut next, action, config)?;
    refresh_derived(&mut next, config);

    debug!(
        action = name,
        step = %next.current_step,
        total = %next.prices.total_amount,
        "Applied checkout action"
    );

    Ok(next)
}

fn reduce(state: &mut CheckoutState, action: CheckoutAction, config: &PricingConfig) -> CoreResult<()> {
    match action {
        // ---------------------------------------------------------------------
        // Rental items
        // ---------------------------------------------------------------------
        CheckoutAction::AddRentalItem { item } => {
            if state.rental_item(&item.id).is_some() {
                return Err(CoreError::DuplicateRentalItem(item.id));
            }
            if state.rental_items.len() >= config.max_rental_items {
                return Err(CoreError::TooManyRentalItems {
                    max: config.max_rental_items,
                });
            }
            state.rental_items.push(item);
        }

        CheckoutAction::RemoveRentalItem { id } => {
            let before = state.rental_items.len();
            state.rental_items.retain(|item| item.id != id);
            if state.rental_items.len() == before {
                return Err(CoreError::RentalItemNotFound(id));
            }
        }

        CheckoutAction::ClearRentalItems => state.rental_items.clear(),

        // ---------------------------------------------------------------------
        // Schedule
        // ---------------------------------------------------------------------
        CheckoutAction::SetDeliveryDate { date } => {
            state.delivery_date = date;
            sync_overnight_extra(state, config);
        }

        CheckoutAction::SetPickupDate { date } => {
            state.pickup_date = date;
            sync_overnight_extra(state, config);
        }

        CheckoutAction::SetDeliveryTime { time } => state.delivery_time = time,
        CheckoutAction::SetPickupTime { time } => state.pickup_time = time,

        CheckoutAction::SetDeliveryTimePreference { preference } => {
            state.delivery_time_preference = preference;
        }

        CheckoutAction::SetPickupTimePreference { preference } => {
            state.pickup_time_preference = preference;
        }

        // ---------------------------------------------------------------------
        // Extras and mixers
        // ---------------------------------------------------------------------
        CheckoutAction::SetExtras { extras } => {
            state.extras = extras
                .into_iter()
                .map(|extra| normalize_extra(extra, config))
                .collect();
            let selected: Vec<String> = state.selected_extras().map(|e| e.id.clone()).collect();
            state.mixers.retain(|mixer| selected.contains(&mixer.machine_id));
            sync_overnight_extra(state, config);
        }

        CheckoutAction::ToggleExtra { id } => {
            let extra = find_extra(state, &id)?;
            extra.selected = !extra.selected;
            if !extra.selected {
                state.mixers.retain(|mixer| mixer.machine_id != id);
            }
        }

        CheckoutAction::IncrementExtraQuantity { id } => {
            let extra = adjustable_extra(state, &id, config)?;
            extra.quantity = extra.quantity.saturating_add(1);
        }

        CheckoutAction::DecrementExtraQuantity { id } => {
            let extra = adjustable_extra(state, &id, config)?;
            extra.quantity = extra.quantity.saturating_sub(1).max(1);
        }

        CheckoutAction::SelectMixer { selection } => {
            check_tank(selection.tank)?;
            let machine_selected = state
                .extra(&selection.machine_id)
                .map(|extra| extra.selected)
                .unwrap_or(false);
            if !machine_selected {
                return Err(CoreError::MachineNotSelected(selection.machine_id));
            }

            let slot = state
                .mixers
                .iter()
                .position(|m| m.machine_id == selection.machine_id && m.tank == selection.tank);
            match slot {
                Some(i) => state.mixers[i] = selection,
                None => state.mixers.push(selection),
            }
        }

        CheckoutAction::ClearMixer { machine_id, tank } => {
            check_tank(tank)?;
            state
                .mixers
                .retain(|m| !(m.machine_id == machine_id && m.tank == tank));
        }

        // ---------------------------------------------------------------------
        // Customer and payment
        // ---------------------------------------------------------------------
        CheckoutAction::SetCustomerField { field, value } => state.customer.set(field, value),

        CheckoutAction::SetPaymentMethod { method } => {
            state.payment_method = method;
            if method == PaymentMethod::Cash {
                state.deposit_amount = Money::zero();
            }
        }

        CheckoutAction::SetDepositAmount { amount } => {
            state.deposit_amount = if state.payment_method == PaymentMethod::Cash {
                Money::zero()
            } else {
                amount.max(Money::zero())
            };
        }

        CheckoutAction::ApplyDiscount { amount } => state.discount_amount = amount,
        CheckoutAction::SetTermsAgreed { agreed } => state.terms_agreed = agreed,
        CheckoutAction::SetLoading { loading } => state.is_loading = loading,

        // ---------------------------------------------------------------------
        // Navigation
        // ---------------------------------------------------------------------
        CheckoutAction::NextStep => {
            state.current_step = config.steps.next_after(state.current_step);
            state.errors.clear();
        }

        CheckoutAction::PreviousStep => {
            state.current_step = config.steps.previous_before(state.current_step);
            state.errors.clear();
        }

        CheckoutAction::GoToStep { step } => {
            if !config.steps.contains(step) {
                return Err(CoreError::StepNotInFlow(step.to_string()));
            }
            state.current_step = step;
            state.errors.clear();
        }

        CheckoutAction::SetErrors { errors } => state.errors = errors,
        CheckoutAction::ClearErrors => state.errors.clear(),

        // ---------------------------------------------------------------------
        // Submission
        // ---------------------------------------------------------------------
        CheckoutAction::OrderSubmitted { order_id } => {
            state.order_id = Some(order_id);
            state.order_status = OrderStatus::Confirmed;
            state.order_error = None;
            state.is_loading = false;
        }

        CheckoutAction::PaymentSucceeded { transaction } => {
            state.paypal_transactions.push(transaction);
            state.payment_status = PaymentStatus::Paid;
            state.order_status = OrderStatus::Paid;
            state.payment_error = None;
            state.is_loading = false;
            state.is_complete = true;
        }

        CheckoutAction::PaymentFailed { message } => {
            state.payment_status = PaymentStatus::Failed;
            state.payment_error = Some(message);
            state.is_loading = false;
        }

        CheckoutAction::OrderFailed { message } => {
            state.order_error = Some(message);
            state.is_loading = false;
        }

        CheckoutAction::Reset => {
            let extras = std::mem::take(&mut state.extras);
            *state = CheckoutState::new(config);
            state.extras = extras
                .into_iter()
                .map(|mut extra| {
                    extra.selected = false;
                    extra.quantity = 1;
                    extra
                })
                .collect();
        }
    }

    Ok(())
}

/// Recomputes every derived field.
pub(crate) fn refresh_derived(state: &mut CheckoutState, config: &PricingConfig) {
    apply_discounts(&mut state.rental_items, config);
    state.prices = calculate_prices(state, config);
    state.specific_time_charge = state.prices.specific_time_charge;
}

/// Checks a state built outside the reducer against the limits the
/// reducer enforces action by action.
pub(crate) fn check_state(state: &CheckoutState, config: &PricingConfig) -> CoreResult<()> {
    if !config.steps.contains(state.current_step) {
        return Err(CoreError::StepNotInFlow(state.current_step.to_string()));
    }

    if state.rental_items.len() > config.max_rental_items {
        return Err(CoreError::TooManyRentalItems {
            max: config.max_rental_items,
        });
    }

    for (i, item) in state.rental_items.iter().enumerate() {
        if state.rental_items[..i].iter().any(|earlier| earlier.id == item.id) {
            return Err(CoreError::DuplicateRentalItem(item.id.clone()));
        }
    }

    for mixer in &state.mixers {
        check_tank(mixer.tank)?;
        let machine_selected = state
            .extra(&mixer.machine_id)
            .map(|extra| extra.selected)
            .unwrap_or(false);
        if !machine_selected {
            return Err(CoreError::MachineNotSelected(mixer.machine_id.clone()));
        }
    }

    Ok(())
}

/// Selects the overnight extra for one-night rentals and clears it otherwise.
fn sync_overnight_extra(state: &mut CheckoutState, config: &PricingConfig) {
    let overnight = RentalDuration::between(state.delivery_date, state.pickup_date).is_overnight();
    if let Some(extra) = state
        .extras
        .iter_mut()
        .find(|extra| extra.id == config.overnight_extra_id)
    {
        extra.selected = overnight;
    }
}

fn normalize_extra(mut extra: ExtraItem, config: &PricingConfig) -> ExtraItem {
    extra.quantity = if extra.id == config.multi_unit_extra_id {
        extra.quantity.max(1)
    } else {
        1
    };
    extra
}

fn find_extra<'a>(state: &'a mut CheckoutState, id: &str) -> CoreResult<&'a mut ExtraItem> {
    state
        .extras
        .iter_mut()
        .find(|extra| extra.id == id)
        .ok_or_else(|| CoreError::ExtraNotFound(id.to_string()))
}

fn adjustable_extra<'a>(
    state: &'a mut CheckoutState,
    id: &str,
    config: &PricingConfig,
) -> CoreResult<&'a mut ExtraItem> {
    if id != config.multi_unit_extra_id {
        // unknown ids still report as not found
        find_extra(state, id)?;
        return Err(CoreError::QuantityNotAdjustable(id.to_string()));
    }
    find_extra(state, id)
}

fn check_tank(tank: u8) -> CoreResult<()> {
    if (1..=MAX_MIXER_TANKS).contains(&tank) {
        Ok(())
    } else {
        Err(CoreError::InvalidTank {
            tank,
            max: MAX_MIXER_TANKS,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
