//! # Price Calculation
//!
//! Line-item aggregation and the fee/tax calculator.
//!
//! ## Order of Operations
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ rental items ─► discount allocator ─► × day multiplier ─┐            │
//! │ extras (qty) + mixers ─────────────► × day multiplier ─┤            │
//! │                                                         ▼            │
//! │ specific-time charge ─┐                                              │
//! │ delivery fee ─────────┼─────────────────────────────► subtotal       │
//! │ overnight fee ────────┘                                  │           │
//! │                                    tax = round(subtotal × tax rate)  │
//! │                 processing = round((subtotal + tax) × processing)    │
//! │                     (zero for cash payments)                         │
//! │             total = subtotal + tax + processing − discount           │
//! │             balance due = total − deposit                            │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fixed fees are charged once per occurrence and are never multiplied.
//! Rounding happens at the tax and processing steps only; every other step
//! is exact integer arithmetic on cents.
//!
//! Everything here is a pure function of the state and the configuration,
//! so the reducer recomputes on every action instead of caching.

use tracing::debug;

use crate::checkout::CheckoutState;
use crate::config::{PricingConfig, ProcessingFeeBase};
use crate::discount::allocate_discounts;
use crate::money::Money;
use crate::rental::{calculate_rental_days, RentalDuration};
use crate::types::{ExtraItem, PriceBreakdown, TimePreference};

// =============================================================================
// Line Items
// =============================================================================

/// Per-day priced totals, already multiplied by the day multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineItemTotals {
    pub bouncer_subtotal: Money,
    pub extras_total: Money,
}

/// Quantity that counts toward the price of an extra.
///
/// Only the multi-unit extra carries a quantity; every other extra is one
/// unit no matter what the field says.
pub fn billable_quantity(extra: &ExtraItem, config: &PricingConfig) -> u32 {
    if extra.id == config.multi_unit_extra_id {
        extra.quantity.max(1)
    } else {
        1
    }
}

/// True when the extra is covered by the flat overnight surcharge and must
/// not be priced on its own.
pub fn is_covered_by_overnight_fee(
    extra: &ExtraItem,
    duration: RentalDuration,
    config: &PricingConfig,
) -> bool {
    duration.is_overnight() && extra.id == config.overnight_extra_id
}

/// Sums rental items, selected extras and mixers for one rental duration.
pub fn aggregate_line_items(
    state: &CheckoutState,
    duration: RentalDuration,
    config: &PricingConfig,
) -> LineItemTotals {
    let multiplier = i64::from(duration.multiplier());

    let bouncer_subtotal: Money = allocate_discounts(&state.rental_items, config)
        .iter()
        .map(|item| item.discounted_price() * multiplier)
        .sum();

    let extras: Money = state
        .extras
        .iter()
        .filter(|extra| extra.selected)
        .filter(|extra| !is_covered_by_overnight_fee(extra, duration, config))
        .map(|extra| extra.price * billable_quantity(extra, config) * multiplier)
        .sum();

    let mixers: Money = state
        .mixers
        .iter()
        .filter(|mixer| mixer.is_priced())
        .map(|mixer| mixer.price * multiplier)
        .sum();

    LineItemTotals {
        bouncer_subtotal,
        extras_total: extras + mixers,
    }
}

// =============================================================================
// Fees and Tax
// =============================================================================

/// Fixed charge for each leg with a specific time preference.
pub fn specific_time_charge(
    delivery: TimePreference,
    pickup: TimePreference,
    config: &PricingConfig,
) -> Money {
    [delivery, pickup]
        .iter()
        .filter(|pref| **pref == TimePreference::Specific)
        .map(|_| config.specific_time_fee)
        .sum()
}

/// Applies fees, tax, processing, discount and deposit to the line totals.
pub fn compute_totals(
    state: &CheckoutState,
    totals: LineItemTotals,
    duration: RentalDuration,
    config: &PricingConfig,
) -> PriceBreakdown {
    let specific_time_charge = specific_time_charge(
        state.delivery_time_preference,
        state.pickup_time_preference,
        config,
    );
    let delivery_fee = config.delivery_fee;
    let overnight_fee = duration.overnight_fee(config);

    let subtotal = totals.bouncer_subtotal
        + totals.extras_total
        + specific_time_charge
        + delivery_fee
        + overnight_fee;

    let tax_amount = subtotal.apply_rate(config.tax_rate);

    let processing_fee = if state.payment_method.is_electronic() {
        let base = match config.processing_fee_base {
            ProcessingFeeBase::TaxInclusive => subtotal + tax_amount,
            ProcessingFeeBase::TaxExclusive => subtotal,
        };
        base.apply_rate(config.processing_rate)
    } else {
        Money::zero()
    };

    let total_amount = subtotal + tax_amount + processing_fee - state.discount_amount;
    let balance_due = total_amount - state.deposit_amount;

    PriceBreakdown {
        bouncer_subtotal: totals.bouncer_subtotal,
        extras_total: totals.extras_total,
        specific_time_charge,
        delivery_fee,
        overnight_fee,
        subtotal,
        tax_amount,
        processing_fee,
        discount_amount: state.discount_amount,
        total_amount,
        deposit_amount: state.deposit_amount,
        balance_due,
        day_multiplier: duration.multiplier(),
        rental_days: calculate_rental_days(state.delivery_date, state.pickup_date),
    }
}

/// Full price breakdown for a checkout state.
///
/// ## Example
/// ```rust
/// use bounce_core::checkout::CheckoutState;
/// use bounce_core::config::PricingConfig;
/// use bounce_core::money::Money;
/// use bounce_core::pricing::calculate_prices;
/// use bounce_core::types::RentalItem;
///
/// let config = PricingConfig::default();
/// let mut state = CheckoutState::new(&config);
/// state.rental_items.push(RentalItem::new("castle", "Castle", Money::from_dollars(100)));
///
/// let prices = calculate_prices(&state, &config);
/// assert_eq!(prices.subtotal, Money::from_dollars(100));
/// assert_eq!(prices.tax_amount, Money::from_cents(825));
/// ```
pub fn calculate_prices(state: &CheckoutState, config: &PricingConfig) -> PriceBreakdown {
    let days = calculate_rental_days(state.delivery_date, state.pickup_date);
    let duration = RentalDuration::classify(days);
    let totals = aggregate_line_items(state, duration, config);
    let breakdown = compute_totals(state, totals, duration, config);

    debug!(
        duration = %duration,
        subtotal = %breakdown.subtotal,
        total = %breakdown.total_amount,
        "Recomputed prices"
    );

    breakdown
}

// =============================================================================
// Unit Tests
// =============================================================================
